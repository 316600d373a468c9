//! Session calls: initiate, query status, close

use tracing::{info, instrument, warn};

use samurai_core::SamuraiResult;
use samurai_rpc::{Params, Response, STATUS_OK};

use super::client::SamuraiClient;
use super::types::*;

fn session_params(session_id: &SessionId) -> Params {
    let mut params = Params::new();
    params.insert("SessionID".to_string(), session_id.to_value());
    params
}

impl SamuraiClient {
    /// Starts a voice, fax or text session
    ///
    /// # Returns
    ///
    /// The server-assigned session ID
    #[instrument(skip(self, args), fields(tos = %args.tos, remote_uri = %args.remote_uri))]
    pub async fn session_initiate(&self, args: SessionInitiateArgs) -> SamuraiResult<SessionId> {
        let reply: SessionInitiateReply = self
            .call(methods::SESSION_INITIATE, args.into_params())
            .await?;

        info!("Samurai session initiated: session_id={}", reply.session_id);

        Ok(reply.session_id)
    }

    /// Current status of a session
    ///
    /// Status code 512 marks an ended session and is still a valid answer.
    #[instrument(skip(self))]
    pub async fn session_status(&self, session_id: &SessionId) -> SamuraiResult<SessionStatus> {
        let (code, reply): (i64, SessionStatusReply) = self
            .call_accepting(
                methods::SESSION_STATUS_GET,
                session_params(session_id),
                &[STATUS_OK, STATUS_SESSION_ENDED],
            )
            .await?;

        Ok(SessionStatus {
            code,
            status: reply.session_status,
        })
    }

    /// Asks the server to close a session
    ///
    /// The response is returned uninterpreted; query
    /// [`session_status`](Self::session_status) to confirm the session ended.
    #[instrument(skip(self))]
    pub async fn session_close(&self, session_id: &SessionId) -> Response {
        let response = self
            .call_raw(methods::SESSION_CLOSE, session_params(session_id))
            .await;

        if response.status_code() != Some(STATUS_OK) {
            warn!(
                "Samurai session close answered {:?}: {:?}",
                response.status_code(),
                response.status_string()
            );
        }

        response
    }
}
