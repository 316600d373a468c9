//! Transport seam and its HTTP implementation
//!
//! [`RpcTransport::call`] never fails: connection errors, HTTP errors, faults
//! and undecodable bodies all come back as a [`Response`] carrying
//! `StatusCode` and `StatusString`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use samurai_core::{SamuraiConfig, SamuraiError};

use crate::codec::{decode_response, encode_call, MethodResponse};
use crate::error::XmlRpcError;
use crate::response::{fault_codes, Response};
use crate::value::{Params, Value};

/// Remote procedure call transport
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Calls `method` with `params` as keyword arguments
    async fn call(&self, method: &str, params: Params) -> Response;
}

/// XML-RPC over HTTP(S) with basic authentication
pub struct HttpTransport {
    http_client: Client,
    endpoint: String,
    username: String,
    password: String,
}

impl HttpTransport {
    /// Creates a transport for a full endpoint URL
    ///
    /// # Arguments
    ///
    /// * `endpoint` - URL of the XML-RPC endpoint (e.g. "https://samurai.sipgate.net/RPC2")
    /// * `username` - Account username
    /// * `password` - Account password
    /// * `timeout` - Timeout for a whole request
    pub fn new(
        endpoint: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, SamuraiError> {
        let http_client = ClientBuilder::new()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| SamuraiError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Creates a transport talking HTTPS to the configured server
    pub fn from_config(config: &SamuraiConfig) -> Result<Self, SamuraiError> {
        config.validate()?;
        Self::new(
            &format!("https://{}", config.server_url),
            &config.username,
            &config.password,
            config.timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    #[instrument(skip(self, params), fields(method = %method))]
    async fn call(&self, method: &str, params: Params) -> Response {
        let body = match encode_call(method, &params) {
            Ok(body) => body,
            Err(e) => return Response::transport_failure(fault_codes::TRANSPORT_ERROR, e.to_string()),
        };

        debug!("Samurai request: method={}, {} bytes", method, body.len());

        let response = match self
            .http_client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Samurai transport error: {}", e);
                return Response::transport_failure(os_error_code(&e), e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!("Samurai HTTP error: status={}", status);
            return Response::transport_failure(
                status.as_u16() as i64,
                status.canonical_reason().unwrap_or("HTTP error"),
            );
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Response::transport_failure(
                    os_error_code(&e),
                    format!("Failed to read response body: {}", e),
                )
            }
        };

        debug!("Samurai response: {}", body);

        match decode_response(&body) {
            Ok(MethodResponse::Params(Value::Struct(fields))) => Response::reply(fields),
            Ok(MethodResponse::Params(other)) => Response::transport_failure(
                fault_codes::INVALID_RESPONSE,
                format!("Expected a struct, got {}", other.type_name()),
            ),
            Ok(MethodResponse::Fault { code, message }) => {
                warn!("Samurai fault {}: {}", code, message);
                Response::fault(code, message)
            }
            Err(XmlRpcError::Parse(message)) => {
                Response::transport_failure(fault_codes::PARSE_ERROR, message)
            }
            Err(e) => Response::transport_failure(fault_codes::INVALID_RESPONSE, e.to_string()),
        }
    }
}

/// OS error number behind a reqwest error, if there is one
fn os_error_code(err: &reqwest::Error) -> i64 {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(errno) = cause
            .downcast_ref::<std::io::Error>()
            .and_then(std::io::Error::raw_os_error)
        {
            return errno as i64;
        }
        source = cause.source();
    }
    fault_codes::TRANSPORT_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new(
            "https://samurai.sipgate.net/RPC2",
            "alice",
            "secret",
            Duration::from_secs(5),
        );
        assert!(transport.is_ok());
    }

    #[test]
    fn test_from_config_uses_https() {
        let config = SamuraiConfig::new("alice", "secret");
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.endpoint(), "https://samurai.sipgate.net/RPC2");
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let config = SamuraiConfig::new("alice", "secret").with_server_url("");
        assert!(HttpTransport::from_config(&config).is_err());
    }
}
