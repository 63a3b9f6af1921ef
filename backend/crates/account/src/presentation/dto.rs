//! Data Transfer Objects

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferenceDto {
    pub notifications_enabled: bool,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordResponse {
    pub success: bool,
}
