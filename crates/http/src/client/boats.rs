//! Boat CRUD API service

use super::gateway::Gateway;
use harbor_core::{ApiError, Boat, NewBoat};
use reqwest::Method;

/// Typed access to the `/boats` resource
#[derive(Clone, Debug)]
pub struct BoatService {
    gateway: Gateway,
}

impl BoatService {
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// List every boat
    pub async fn list(&self) -> Result<Vec<Boat>, ApiError> {
        self.gateway
            .send_json::<(), _>(Method::GET, "/boats", None)
            .await
    }

    /// Fetch one boat
    pub async fn get(&self, id: i64) -> Result<Boat, ApiError> {
        self.gateway
            .send_json::<(), _>(Method::GET, &format!("/boats/{id}"), None)
            .await
    }

    /// Create a boat; the backend assigns its id
    pub async fn create(&self, boat: &NewBoat) -> Result<Boat, ApiError> {
        self.gateway
            .send_json(Method::POST, "/boats", Some(boat))
            .await
    }

    /// Replace the boat stored under `id` with `boat`
    pub async fn update(&self, id: i64, boat: &Boat) -> Result<Boat, ApiError> {
        self.gateway
            .send_json(Method::PUT, &format!("/boats/{id}"), Some(boat))
            .await
    }

    /// Delete a boat
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.gateway
            .perform_request(Method::DELETE, &format!("/boats/{id}"), None)
            .await
            .map(|_| ())
    }
}
