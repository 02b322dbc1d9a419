use serde::Deserialize;

/// `{"error": {...}}` envelope returned by every Google API on failure.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    /// Canonical status, e.g. `PERMISSION_DENIED`.
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    /// Legacy reason, e.g. `insufficientPermissions`.
    pub reason: Option<String>,
}

impl ErrorBody {
    /// Most specific code available: the first reason, then the status, then the HTTP code.
    pub fn most_specific_code(&self) -> String {
        self.errors
            .iter()
            .find_map(|e| e.reason.clone())
            .or_else(|| self.status.clone())
            .unwrap_or_else(|| self.code.to_string())
    }
}
