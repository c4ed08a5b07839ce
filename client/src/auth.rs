use walls_protocol::{ApiRequest, Endpoint, LoginRequest, LoginResponse};

use crate::error::ClientError;
use crate::transport::Transport;

/// Exchange credentials for a bearer token.
///
/// Only 400/401/403 mean the credentials were refused; any other failure
/// status is reported as an ordinary request error.
pub async fn authenticate<T>(
    transport: &T,
    username: &str,
    password: &str,
) -> Result<String, ClientError>
where
    T: Transport + ?Sized,
{
    let body = LoginRequest { username, password };
    let request = ApiRequest::with_body(Endpoint::Login, &body)
        .map_err(|e| ClientError::Auth(format!("Failed to encode login request: {e}")))?;

    let response = transport.send(&request, None).await?;

    if !response.is_success() {
        let message = response.message();
        return Err(match response.status {
            400 | 401 | 403 => ClientError::Auth(message),
            status => ClientError::Request { status, message },
        });
    }

    let login: LoginResponse = walls_protocol::decode(response.body)?;

    tracing::debug!(username, "Obtained bearer token");
    Ok(login.token)
}
