use samurai_core::SamuraiResult;
use samurai_rpc::Response;

use crate::api::{SamuraiClient, SessionId, SessionStatus, Tos};

/// A voice, fax or text session started through a [`Uri`](super::Uri)
///
/// The status is never cached; every [`status`](Self::status) call asks the
/// server.
#[derive(Debug, Clone)]
pub struct Session {
    client: SamuraiClient,
    session_id: SessionId,
    tos: Tos,
}

impl Session {
    pub(crate) fn new(client: SamuraiClient, session_id: SessionId, tos: Tos) -> Self {
        Self {
            client,
            session_id,
            tos,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn tos(&self) -> Tos {
        self.tos
    }

    /// Current status; ended sessions report code 512
    pub async fn status(&self) -> SamuraiResult<SessionStatus> {
        self.client.session_status(&self.session_id).await
    }

    /// Requests the session to be closed
    ///
    /// The server response is handed back uninterpreted. Call
    /// [`status`](Self::status) afterwards to confirm the session ended.
    pub async fn close(&self) -> Response {
        self.client.session_close(&self.session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use samurai_rpc::{MockRpcTransport, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[test]
    fn test_status_is_queried_every_time() {
        let mut transport = MockRpcTransport::new();
        transport
            .expect_call()
            .withf(|method, params| {
                method == "samurai.SessionStatusGet"
                    && params.get("SessionID") == Some(&Value::from("s1"))
            })
            .times(2)
            .returning(|_, _| {
                let mut fields = BTreeMap::new();
                fields.insert("StatusCode".to_string(), Value::Int(200));
                fields.insert("SessionStatus".to_string(), Value::from("ringing"));
                Response::reply(fields)
            });

        let client = SamuraiClient::new(Arc::new(transport));
        let session = Session::new(client, SessionId::from("s1"), Tos::Voice);

        for _ in 0..2 {
            let status = tokio_test::block_on(session.status()).unwrap();
            assert_eq!(status.status, "ringing");
            assert!(!status.is_terminal());
        }
    }
}
