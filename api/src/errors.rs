use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::upload::UploadKind;

/// Connect status codes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Code {
    Canceled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl Code {
    /// The code implied by an HTTP status when the error body carries none.
    #[must_use]
    pub const fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::Internal,
            401 => Self::Unauthenticated,
            403 => Self::PermissionDenied,
            404 => Self::Unimplemented,
            429 | 502 | 503 | 504 => Self::Unavailable,
            _ => Self::Unknown,
        }
    }

    /// Whether the server rejected the caller's credentials.
    #[must_use]
    pub const fn is_auth_failure(self) -> bool {
        matches!(self, Self::Unauthenticated | Self::PermissionDenied)
    }
}

/// Errors returned by every call made through an [`crate::ApiClient`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with an error status.
    #[error("[{code}] {message}")]
    Status { code: Code, message: String },
    /// An authenticated call was rejected, the session has been handed back to the login view.
    #[error("Authentication required ({code}), please log in again.")]
    AuthenticationRequired { code: Code },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// A file was refused before upload because of its type.
    #[error("Unsupported file type {mime:?} for {kind} upload")]
    UnsupportedMediaType { kind: UploadKind, mime: String },
}

impl ApiError {
    /// The Connect code of the error, if it came from the server.
    #[must_use]
    pub const fn code(&self) -> Option<Code> {
        match self {
            Self::Status { code, .. } | Self::AuthenticationRequired { code } => Some(*code),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(code: Code, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }

    /// Build the error for a non-2xx response from its status and body.
    ///
    /// Connect error bodies look like `{"code": "not_found", "message": "..."}`; when the body is
    /// missing or unreadable the code is derived from the HTTP status.
    #[must_use]
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct ErrorBody {
            code: Option<String>,
            message: Option<String>,
        }

        let ErrorBody { code, message } = serde_json::from_slice(body).unwrap_or_default();

        let code = code
            .and_then(|code| Code::from_str(&code).ok())
            .unwrap_or_else(|| Code::from_http_status(status));
        let message = message.unwrap_or_else(|| format!("HTTP status {status}"));

        Self::Status { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_str_eq};
    use rstest::rstest;

    #[rstest]
    #[case(400, Code::Internal)]
    #[case(401, Code::Unauthenticated)]
    #[case(403, Code::PermissionDenied)]
    #[case(404, Code::Unimplemented)]
    #[case(429, Code::Unavailable)]
    #[case(503, Code::Unavailable)]
    #[case(500, Code::Unknown)]
    #[case(418, Code::Unknown)]
    fn test_code_from_http_status(#[case] status: u16, #[case] expected: Code) {
        assert_eq!(Code::from_http_status(status), expected);
    }

    #[rstest]
    #[case::connect_body(
        500,
        r#"{"code":"unauthenticated","message":"email not verified"}"#,
        Code::Unauthenticated,
        "email not verified"
    )]
    #[case::unknown_code(400, r#"{"code":"teapot","message":"?"}"#, Code::Internal, "?")]
    #[case::empty_body(403, "", Code::PermissionDenied, "HTTP status 403")]
    #[case::html_body(502, "<html>bad gateway</html>", Code::Unavailable, "HTTP status 502")]
    fn test_error_from_response(
        #[case] status: u16,
        #[case] body: &str,
        #[case] code: Code,
        #[case] message: &str,
    ) {
        let ApiError::Status {
            code: actual_code,
            message: actual_message,
        } = ApiError::from_response(status, body.as_bytes())
        else {
            panic!("expected a status error");
        };
        assert_eq!(actual_code, code);
        assert_str_eq!(actual_message, message);
    }

    #[rstest]
    #[case(ApiError::status(Code::NotFound, "no such list"), "[not_found] no such list")]
    #[case(
        ApiError::AuthenticationRequired { code: Code::PermissionDenied },
        "Authentication required (permission_denied), please log in again."
    )]
    #[case(
        ApiError::UnsupportedMediaType { kind: UploadKind::Thumbnail, mime: "image/gif".into() },
        "Unsupported file type \"image/gif\" for thumbnail upload"
    )]
    fn test_error_display(#[case] error: ApiError, #[case] expected: &str) {
        assert_str_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_auth_failure_codes() {
        assert!(Code::Unauthenticated.is_auth_failure());
        assert!(Code::PermissionDenied.is_auth_failure());
        assert!(!Code::Internal.is_auth_failure());
        assert_eq!(
            ApiError::AuthenticationRequired {
                code: Code::Unauthenticated
            }
            .code(),
            Some(Code::Unauthenticated)
        );
        assert_eq!(ApiError::InvalidUrl("x".into()).code(), None);
    }
}
