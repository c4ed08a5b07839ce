use thiserror::Error;
use walls_protocol::ParseError;

/// Message fragment the server uses when a bearer token is no longer valid
pub const TOKEN_EXPIRED_MESSAGE: &str = "Invalid or expired token";

const ALREADY_IN_QUEUE_MESSAGE: &str = "already in queue";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Credentials were rejected by the login endpoint
    #[error("Login failed: {0}")]
    Auth(String),

    /// Token was rejected and could not be refreshed
    #[error("Token expired: {0}")]
    TokenExpired(String),

    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response with the server-reported reason
    #[error("{message} ({status})")]
    Request { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] ParseError),
}

impl ClientError {
    /// Server-reported reason, if this error carries one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Request { message, .. } | Self::TokenExpired(message) | Self::Auth(message) => {
                Some(message)
            }
            _ => None,
        }
    }

    pub fn is_already_in_queue(&self) -> bool {
        self.server_message()
            .map(|m| m.to_lowercase().contains(ALREADY_IN_QUEUE_MESSAGE))
            .unwrap_or(false)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}
