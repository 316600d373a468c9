//! Typed client over an [`RpcTransport`]
//!
//! Turns normalized transport responses into `Result`s: transport failures,
//! remote faults and unexpected status codes each get their own
//! [`SamuraiError`] variant.

use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

use samurai_core::{SamuraiConfig, SamuraiError, SamuraiResult};
use samurai_rpc::{
    fault_codes, HttpTransport, Params, Response, ResponseKind, RpcTransport, STATUS_OK,
};

/// Client for the Samurai API
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct SamuraiClient {
    transport: Arc<dyn RpcTransport>,
}

impl fmt::Debug for SamuraiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamuraiClient").finish_non_exhaustive()
    }
}

impl SamuraiClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// Creates a client talking XML-RPC over HTTPS to the configured server
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = SamuraiConfig::new("username", "password");
    /// let client = SamuraiClient::from_config(&config)?;
    /// let balance = client.balance().await?;
    /// ```
    pub fn from_config(config: &SamuraiConfig) -> SamuraiResult<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Calls a method and returns the response as the transport produced it
    #[instrument(skip(self, params), fields(method = %method))]
    pub async fn call_raw(&self, method: &str, params: Params) -> Response {
        self.transport.call(method, params).await
    }

    /// Calls a method and decodes a status-200 reply into `R`
    pub async fn call<R>(&self, method: &str, params: Params) -> SamuraiResult<R>
    where
        R: DeserializeOwned,
    {
        let (_, reply) = self.call_accepting(method, params, &[STATUS_OK]).await?;
        Ok(reply)
    }

    /// Like [`call`](Self::call), but with a custom set of success codes.
    ///
    /// Returns the accepted status code along with the decoded reply.
    #[instrument(skip(self, params), fields(method = %method))]
    pub async fn call_accepting<R>(
        &self,
        method: &str,
        params: Params,
        accepted: &[i64],
    ) -> SamuraiResult<(i64, R)>
    where
        R: DeserializeOwned,
    {
        let response = self.transport.call(method, params).await;
        let code = check_status(&response, accepted)?;

        debug!("Samurai reply accepted: method={}, status={}", method, code);

        let reply = serde_json::from_value(response.into_json()).map_err(|e| {
            SamuraiError::MalformedResponse(format!("{} reply: {}", method, e))
        })?;

        Ok((code, reply))
    }
}

/// Maps a response to its status code, or to the error it stands for
pub(crate) fn check_status(response: &Response, accepted: &[i64]) -> SamuraiResult<i64> {
    let message = response.status_string().unwrap_or_default().to_string();

    match response.kind() {
        ResponseKind::TransportFailure => {
            return Err(SamuraiError::Transport {
                code: response
                    .status_code()
                    .unwrap_or(fault_codes::TRANSPORT_ERROR),
                message,
            })
        }
        ResponseKind::Fault => {
            return Err(SamuraiError::Fault {
                code: response.status_code().unwrap_or_default(),
                message,
            })
        }
        ResponseKind::Reply => {}
    }

    let code = response
        .status_code()
        .ok_or_else(|| SamuraiError::MalformedResponse("missing StatusCode".to_string()))?;

    if accepted.contains(&code) {
        Ok(code)
    } else {
        Err(SamuraiError::Status { code, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use samurai_rpc::{MockRpcTransport, Value};
    use std::collections::BTreeMap;

    fn reply(code: i64) -> Response {
        let mut fields = BTreeMap::new();
        fields.insert("StatusCode".to_string(), Value::Int(code));
        fields.insert("StatusString".to_string(), Value::from("Method success"));
        Response::reply(fields)
    }

    #[test]
    fn test_client_creation() {
        let config = SamuraiConfig::new("alice", "secret");
        assert!(SamuraiClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_check_status_maps_kinds() {
        assert_eq!(check_status(&reply(200), &[200]).unwrap(), 200);
        assert_eq!(check_status(&reply(512), &[200, 512]).unwrap(), 512);

        match check_status(&reply(404), &[200]) {
            Err(SamuraiError::Status { code, message }) => {
                assert_eq!(code, 404);
                assert_eq!(message, "Method success");
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            check_status(&Response::fault(401, "Unauthorized"), &[200]),
            Err(SamuraiError::Fault { code: 401, .. })
        ));
        assert!(matches!(
            check_status(&Response::transport_failure(111, "Connection refused"), &[200]),
            Err(SamuraiError::Transport { code: 111, .. })
        ));
        assert!(matches!(
            check_status(&Response::reply(BTreeMap::new()), &[200]),
            Err(SamuraiError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_call_decodes_reply() {
        #[derive(serde::Deserialize)]
        struct Reply {
            #[serde(rename = "StatusString")]
            status_string: String,
        }

        let mut transport = MockRpcTransport::new();
        transport
            .expect_call()
            .withf(|method, params| method == "system.serverInfo" && params.is_empty())
            .times(1)
            .returning(|_, _| reply(200));

        let client = SamuraiClient::new(Arc::new(transport));
        let decoded: Reply = client.call("system.serverInfo", Params::new()).await.unwrap();
        assert_eq!(decoded.status_string, "Method success");
    }

    #[tokio::test]
    async fn test_call_reports_missing_fields() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Reply {
            #[serde(rename = "SessionID")]
            session_id: String,
        }

        let mut transport = MockRpcTransport::new();
        transport.expect_call().returning(|_, _| reply(200));

        let client = SamuraiClient::new(Arc::new(transport));
        let result: SamuraiResult<Reply> = client.call("samurai.SessionInitiate", Params::new()).await;
        assert!(matches!(result, Err(SamuraiError::MalformedResponse(_))));
    }
}
