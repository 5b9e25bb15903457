// Error type for everything that talks to the Mochi API.
//
// Every failing client operation returns an `ApiError`. Callers that only
// need "it failed" can treat it as opaque; diagnostics and tests can match
// on the variant to tell a rejected request from a broken connection.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status. The body is kept
    /// verbatim since Mochi puts its explanation there.
    #[error("API request failed with status code {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("API request could not be sent: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body is not the JSON we expected.
    #[error("Could not decode API response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// A request body that cannot be sent as form fields, or a URL that
    /// cannot be built.
    #[error("Could not encode request: {0}")]
    Encode(String),
}

impl ApiError {
    /// HTTP status code of the failed response, if the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body attached to the error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } | ApiError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_reports_code_and_body() {
        let err = ApiError::Status {
            status: 401,
            body: "{\"errors\":\"unauthorized\"}".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.body(), Some("{\"errors\":\"unauthorized\"}"));
        assert_eq!(
            err.to_string(),
            "API request failed with status code 401: {\"errors\":\"unauthorized\"}"
        );
    }

    #[test]
    fn decode_error_keeps_body_but_no_status() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = ApiError::Decode {
            source,
            body: "<html>".into(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), Some("<html>"));
    }

    #[test]
    fn encode_error_has_neither() {
        let err = ApiError::Encode("body must be a JSON object".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
    }
}
