//! Harbor HTTP client
//!
//! Every call to the boat backend goes through a [`Gateway`]: it attaches the
//! session token, turns any failure into an [`ApiError`], and ends the session
//! when the backend rejects it.

pub mod client;

pub use client::auth::AuthService;
pub use client::boats::BoatService;
pub use client::error::TransportError;
pub use client::gateway::Gateway;
pub use client::transport::{ReqwestTransport, ReqwestTransportBuilder};
pub use client::{ResponseBody, Transport, TransportRequest, TransportResponse};

pub use harbor_core::ApiError;
pub use reqwest::Method;
