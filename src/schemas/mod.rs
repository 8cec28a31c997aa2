use std::collections::HashMap;

use serde::Serialize;

pub(crate) mod exam;

/// Body of every successful API response.
#[derive(Debug, Serialize)]
pub(crate) struct ApiResponse<T> {
    pub(crate) success: bool,
    pub(crate) data: T,
    pub(crate) message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub(crate) fn success(data: T, message: impl Into<String>) -> Self {
        Self { success: true, data, message: message.into() }
    }
}

/// Body of every failed API response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorEnvelope {
    pub(crate) success: bool,
    pub(crate) message: String,
    pub(crate) status_code: u16,
}

impl ErrorEnvelope {
    pub(crate) fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self { success: false, message: message.into(), status_code }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) exams_url: String,
}
