pub mod auth;
pub mod diet_plans;
pub mod health;
pub mod members;
pub mod membership;
pub mod models;

use serde::Serialize;
use utoipa::ToSchema;

/// Plain acknowledgement body used by the flows that only report an outcome.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
