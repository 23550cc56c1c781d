//! Shared HTTP response helpers for the GitHub backend.
//!
//! Centralizes status-code checks (404 → [`StorageError::NotFound`],
//! 401/403 → [`StorageError::Unauthorized`], other non-success →
//! [`StorageError::Api`]) so request code stays focused on building requests.

use crate::error::StorageError;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success.
pub async fn check_response(
    resp: reqwest::Response,
    path: &str,
) -> Result<reqwest::Response, StorageError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(StorageError::NotFound {
            path: path.to_string(),
        });
    }

    let code = status.as_u16();
    let message = resp.text().await.unwrap_or_default();
    if code == 401 || code == 403 {
        return Err(StorageError::Unauthorized {
            status: code,
            message,
        });
    }
    Err(StorageError::Api {
        status: code,
        message,
    })
}
