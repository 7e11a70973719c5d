use serde::Deserialize;
use thiserror::Error;

/// Message shown when neither the server nor the transport said anything useful.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing the request.";

/// Result alias used by the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client-side error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, when present.
        message: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Persisted session state could not be read or written.
    #[error("session error: {0}")]
    Session(String),

    /// Input was rejected locally without a network call.
    #[error("{0}")]
    Validation(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ClientError {
    /// Builds an API error from a non-success response, keeping the body message.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ErrorBody>(body.as_str())
                .ok()
                .and_then(|body| body.message),
            Err(_) => None,
        };

        Self::Api { status, message }
    }

    /// Returns the HTTP status for API errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns whether the server rejected the request as a conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Returns whether the server requires a (new) login.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns the text to show an operator.
    ///
    /// Prefers the server's body message, then the transport error text, then
    /// [`GENERIC_ERROR_MESSAGE`].
    #[must_use]
    pub fn display_message(&self) -> String {
        let candidate = match self {
            Self::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Api { status, .. } => format!("Request failed with status code {status}"),
            Self::Transport(text)
            | Self::Decode(text)
            | Self::Session(text)
            | Self::Validation(text) => text.clone(),
        };

        if candidate.trim().is_empty() {
            return GENERIC_ERROR_MESSAGE.to_owned();
        }

        candidate
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::Decode(error.to_string());
        }

        Self::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientError, GENERIC_ERROR_MESSAGE};

    #[test]
    fn body_message_wins() {
        let error = ClientError::Api {
            status: 409,
            message: Some("role code 'QA_LEAD' already exists".to_owned()),
        };

        assert_eq!(error.display_message(), "role code 'QA_LEAD' already exists");
        assert!(error.is_conflict());
    }

    #[test]
    fn missing_body_message_falls_back_to_status_text() {
        let error = ClientError::Api {
            status: 500,
            message: Some("   ".to_owned()),
        };

        assert_eq!(
            error.display_message(),
            "Request failed with status code 500"
        );
    }

    #[test]
    fn transport_text_is_used_before_generic_message() {
        let error = ClientError::Transport("connection refused".to_owned());
        assert_eq!(error.display_message(), "connection refused");
        assert_eq!(error.status(), None);
    }

    #[test]
    fn empty_text_falls_back_to_generic_message() {
        let error = ClientError::Transport(String::new());
        assert_eq!(error.display_message(), GENERIC_ERROR_MESSAGE);
    }
}
