use reqwest::StatusCode;
use thiserror::Error;

/// Every way a backend call can fail. The display text is the detail a page
/// shows inline: the server's body for HTTP errors, the cause otherwise.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("{detail}")]
    Status { status: StatusCode, detail: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            match self {
                ApiError::Status { status, .. } => format!("Request failed with {status}"),
                _ => "Request failed".to_string(),
            }
        } else {
            msg
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_shows_server_detail() {
        let err = ApiError::Status {
            status: StatusCode::CONFLICT,
            detail: r#"{"error":"already voted"}"#.into(),
        };
        assert_eq!(err.message(), r#"{"error":"already voted"}"#);
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn empty_body_still_produces_message() {
        let err = ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            detail: String::new(),
        };
        assert_eq!(err.message(), "Request failed with 502 Bad Gateway");
    }
}
