use thiserror::Error;

/// Failures raised by calls to the decision service. Display strings are
/// shown to the user verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx status. The message is the response body text when the
    /// service sent one, else the status's reason phrase.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("Request failed: {reason}")]
    Request { reason: String },

    /// 2xx response whose body did not decode as the expected JSON shape.
    #[error("Malformed response: {reason}")]
    Malformed { reason: String },
}

impl ApiError {
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let message = if body.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        } else {
            body
        };
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Request {
            reason: err.to_string(),
        }
    }
}
