//! Integration tests for the Harbor HTTP client

use harbor_core::{
    ApiError, Boat, ErrorKind, LoginRequest, NewBoat, RecordingNavigator, SessionStore,
};
use harbor_http::{AuthService, BoatService, Gateway, Method, ReqwestTransport};
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Client {
    auth: AuthService,
    boats: BoatService,
    gateway: Gateway,
    session: SessionStore,
    navigator: Arc<RecordingNavigator>,
}

fn client(base_url: &str, location: &str) -> Client {
    let transport = Arc::new(ReqwestTransport::new(base_url).unwrap());
    let session = SessionStore::in_memory();
    let navigator = Arc::new(RecordingNavigator::at(location));
    let gateway = Gateway::new(transport, session.clone(), navigator.clone());

    Client {
        auth: AuthService::new(gateway.clone()),
        boats: BoatService::new(gateway.clone()),
        gateway,
        session,
        navigator,
    }
}

#[tokio::test]
async fn test_login_then_list_sends_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "admin", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "abc", "type": "Bearer"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boats"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Aurora", "description": "Sloop"},
            {"id": 2, "name": "Kestrel", "description": null}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/login");

    let token = client
        .auth
        .login(&LoginRequest::new("admin", "pw"))
        .await
        .unwrap();
    assert_eq!(token, "abc");
    assert_eq!(client.session.token().as_deref(), Some("abc"));
    assert!(client.auth.is_authenticated());

    let boats = client.boats.list().await.unwrap();
    assert_eq!(
        boats,
        vec![
            NewBoat::new("Aurora", "Sloop").with_id(1),
            NewBoat::new("Kestrel", "").with_id(2),
        ]
    );
}

#[tokio::test]
async fn test_login_is_sent_without_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t"})))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/login");
    client
        .auth
        .login(&LoginRequest::new("admin", "pw"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bad_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/login");
    let err = client
        .auth
        .login(&LoginRequest::new("admin", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.message(), "incorrect credentials");
    assert_eq!(err.status(), 401);
    assert!(!client.session.has_active_session());
    assert!(client.navigator.history().is_empty());
}

#[tokio::test]
async fn test_expired_session_is_cleared() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boats"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/boats");
    client.session.set_session("stale").unwrap();

    let err = client.boats.list().await.unwrap_err();
    assert_eq!(err.message(), "session expired, please reconnect");
    assert_eq!(err.kind(), ErrorKind::AuthRejected);
    assert!(!client.session.has_active_session());
    assert_eq!(client.navigator.history(), vec!["/login"]);
}

#[tokio::test]
async fn test_concurrent_rejections_clear_once_safely() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/boats");
    client.session.set_session("stale").unwrap();

    let (a, b) = tokio::join!(client.boats.get(1), client.boats.get(2));
    assert_eq!(a.unwrap_err().status(), 401);
    assert_eq!(b.unwrap_err().status(), 401);
    assert!(!client.session.has_active_session());
    // The second rejection finds the navigator already on the login page
    assert_eq!(client.navigator.history(), vec!["/login"]);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/boats"))
        .and(body_json(json!({"name": "A", "description": ""})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"name": "too short"})))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/boats");
    client.session.set_session("abc").unwrap();

    let err = client
        .boats
        .create(&NewBoat::new("A", ""))
        .await
        .unwrap_err();

    assert_eq!(err.message(), "please correct the validation errors");
    assert_eq!(err.status(), 400);
    let fields = err.field_errors().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["name"], "too short");
    assert!(client.session.has_active_session());
}

#[tokio::test]
async fn test_crud_round_trip() {
    let mock_server = MockServer::start().await;
    let created = json!({"id": 3, "name": "Osprey", "description": "Ketch"});
    let updated = json!({"id": 3, "name": "Osprey II", "description": "Ketch"});

    Mock::given(method("POST"))
        .and(path("/boats"))
        .and(body_json(json!({"name": "Osprey", "description": "Ketch"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boats/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&created))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/boats/3"))
        .and(body_json(&updated))
        .respond_with(ResponseTemplate::new(200).set_body_json(&updated))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/boats/3"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/boats");
    client.session.set_session("abc").unwrap();

    let boat = client
        .boats
        .create(&NewBoat::new("Osprey", "Ketch"))
        .await
        .unwrap();
    assert_eq!(boat.id, 3);

    let fetched = client.boats.get(3).await.unwrap();
    assert_eq!(fetched, boat);

    let renamed = Boat {
        name: "Osprey II".to_string(),
        ..fetched
    };
    let saved = client.boats.update(3, &renamed).await.unwrap();
    assert_eq!(saved, renamed);

    client.boats.delete(3).await.unwrap();
}

#[tokio::test]
async fn test_delete_204_has_no_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/boats/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/boats");
    let payload = client
        .gateway
        .perform_request(Method::DELETE, "/boats/1", None)
        .await
        .unwrap();
    assert_eq!(payload, None);
}

#[tokio::test]
async fn test_payload_is_returned_verbatim() {
    let mock_server = MockServer::start().await;
    let body = json!({"id": 9, "name": "Tern", "description": "", "owner": {"id": 1}});

    Mock::given(method("GET"))
        .and(path("/boats/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/boats");
    let payload = client
        .gateway
        .perform_request(Method::GET, "/boats/9", None)
        .await
        .unwrap();
    assert_eq!(payload, Some(body));
}

#[tokio::test]
async fn test_error_message_extraction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boats/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Boat not found"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boats/500"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            json!({"error": "Une erreur interne est survenue", "message": "db down"}),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boats/418"))
        .respond_with(ResponseTemplate::new(418).set_body_json(json!({"error": "teapot"})))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/boats");

    let err = client.boats.get(404).await.unwrap_err();
    assert_eq!(err.message(), "Boat not found");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = client.boats.get(500).await.unwrap_err();
    assert_eq!(err.message(), "db down");
    assert_eq!(err.status(), 500);

    let err = client.boats.get(418).await.unwrap_err();
    assert_eq!(err.message(), ApiError::UNKNOWN_ERROR);
    assert_eq!(err.status(), 418);
}

#[tokio::test]
async fn test_network_failure() {
    // Grab a free port and release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = client(&uri, "/boats");
    client.session.set_session("abc").unwrap();

    let err = client.boats.list().await.unwrap_err();
    assert_eq!(err.status(), 500);
    assert_eq!(err.message(), "an unknown error occurred");
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
    assert!(client.session.has_active_session());
    assert!(client.navigator.history().is_empty());
}

/// Serve one connection: answer with `status` and a body shorter than its
/// declared length, then hang up
async fn truncated_response_server(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!("HTTP/1.1 {status_line}\r\nContent-Length: 100\r\n\r\nshort");
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    uri
}

#[tokio::test]
async fn test_rejection_with_truncated_body_still_ends_session() {
    let uri = truncated_response_server("401 Unauthorized").await;

    let client = client(&uri, "/boats");
    client.session.set_session("stale").unwrap();

    let err = client.boats.list().await.unwrap_err();
    assert_eq!(err.status(), 401);
    assert_eq!(err.message(), "session expired, please reconnect");
    assert_eq!(err.kind(), ErrorKind::AuthRejected);
    assert!(!client.session.has_active_session());
    assert_eq!(client.navigator.history(), vec!["/login"]);
}

#[tokio::test]
async fn test_truncated_error_body_keeps_status() {
    let uri = truncated_response_server("404 Not Found").await;

    let client = client(&uri, "/boats");
    client.session.set_session("abc").unwrap();

    let err = client.boats.get(7).await.unwrap_err();
    assert_eq!(err.status(), 404);
    assert_eq!(err.message(), ApiError::UNKNOWN_ERROR);
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(client.session.has_active_session());
}

#[tokio::test]
async fn test_logout_is_local() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri(), "/boats");
    client.session.set_session("abc").unwrap();

    client.auth.logout().unwrap();
    client.auth.logout().unwrap();
    assert!(!client.auth.is_authenticated());
}
