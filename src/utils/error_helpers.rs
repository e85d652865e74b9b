//! Mapping of transport and HTTP failures onto [`ApiError`].
//!
//! The variant chosen here decides whether the retry executor tries again:
//! timeouts, 5xx and transport failures (status 0) are retried, everything
//! else is final.

use crate::error::ApiError;

fn timeout(endpoint: &str, timeout_secs: u64) -> ApiError {
    ApiError::Timeout {
        timeout_secs,
        endpoint: endpoint.to_string(),
    }
}

/// Request never produced a response
pub fn convert_request_error(error: reqwest::Error, endpoint: &str, timeout_secs: u64) -> ApiError {
    if error.is_timeout() {
        return timeout(endpoint, timeout_secs);
    }
    ApiError::Http {
        status: error.status().map(|s| s.as_u16()).unwrap_or(0),
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}

/// Non-success status with the response body as server message
pub fn convert_status_error(
    status: u16,
    endpoint: &str,
    body: String,
    timeout_secs: u64,
) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized {
            status,
            endpoint: endpoint.to_string(),
            server_message: body,
        },
        408 | 504 => timeout(endpoint, timeout_secs),
        _ => ApiError::Http {
            status,
            endpoint: endpoint.to_string(),
            message: body,
        },
    }
}

/// Successful status whose body did not decode; keeps the status so it is not retried
pub fn convert_json_error(error: reqwest::Error, endpoint: &str, status: u16) -> ApiError {
    ApiError::Http {
        status,
        endpoint: endpoint.to_string(),
        message: format!("Unexpected response body: {}", error),
    }
}
