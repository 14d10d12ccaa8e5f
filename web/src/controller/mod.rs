use serde::Serialize;
pub(crate) mod contract_controller;
pub(crate) mod health_check_controller;
pub(crate) mod meeting_controller;
pub(crate) mod user_controller;
pub(crate) mod webhook_controller;
pub(crate) mod zoom_controller;

/// Success envelope shared by the JSON endpoints: `{ "success": true, "data": ... }`.
/// Failures are rendered by [`crate::Error`] with `success: false`.
#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
