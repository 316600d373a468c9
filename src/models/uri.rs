use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use samurai_core::{SamuraiError, SamuraiResult};

use crate::api::{Content, OwnUri, SamuraiClient, SessionId, SessionInitiateArgs, Tos};
use crate::models::Session;

/// A SIP URI assigned to the account by the service
///
/// Sessions are started from a URI and stay attached to it, keyed by their
/// server-assigned ID.
#[derive(Debug, Clone)]
pub struct Uri {
    client: SamuraiClient,
    sip_uri: String,
    tos: Vec<String>,
    alias: String,
    e164_out: String,
    e164_in: Vec<String>,
    sessions: BTreeMap<SessionId, Session>,
}

impl Uri {
    pub(crate) fn new(client: SamuraiClient, own_uri: OwnUri) -> Self {
        Self {
            client,
            sip_uri: own_uri.sip_uri,
            tos: own_uri.tos,
            alias: own_uri.uri_alias,
            e164_out: own_uri.e164_out,
            e164_in: own_uri.e164_in,
            sessions: BTreeMap::new(),
        }
    }

    pub fn sip_uri(&self) -> &str {
        &self.sip_uri
    }

    /// Services this URI supports, as reported by the server
    pub fn tos(&self) -> &[String] {
        &self.tos
    }

    pub fn supports(&self, tos: Tos) -> bool {
        self.tos.iter().any(|t| t == tos.as_str())
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Number presented on outgoing calls
    pub fn e164_out(&self) -> &str {
        &self.e164_out
    }

    /// Numbers routed to this URI
    pub fn e164_in(&self) -> &[String] {
        &self.e164_in
    }

    pub fn sessions(&self) -> &BTreeMap<SessionId, Session> {
        &self.sessions
    }

    pub fn session(&self, session_id: &SessionId) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// Starts a voice call to `remote_uri`
    pub async fn call(&mut self, remote_uri: &str) -> SamuraiResult<SessionId> {
        self.initiate(remote_uri, Tos::Voice, None).await
    }

    /// Sends the file at `path` as a fax to `remote_uri`
    ///
    /// The file is read completely before anything is sent; an unreadable
    /// file fails with [`SamuraiError::ResourceAccess`] and no request is made.
    pub async fn fax(&mut self, remote_uri: &str, path: impl AsRef<Path>) -> SamuraiResult<SessionId> {
        let path = path.as_ref();
        let document = tokio::fs::read(path)
            .await
            .map_err(|source| SamuraiError::ResourceAccess {
                path: path.to_path_buf(),
                source,
            })?;

        self.fax_bytes(remote_uri, document).await
    }

    /// Sends an already loaded document as a fax to `remote_uri`
    pub async fn fax_bytes(&mut self, remote_uri: &str, document: Vec<u8>) -> SamuraiResult<SessionId> {
        self.initiate(remote_uri, Tos::Fax, Some(Content::Binary(document)))
            .await
    }

    /// Sends a text message to `remote_uri`
    pub async fn text(&mut self, remote_uri: &str, message: &str) -> SamuraiResult<SessionId> {
        self.initiate(remote_uri, Tos::Text, Some(Content::Text(message.to_string())))
            .await
    }

    async fn initiate(
        &mut self,
        remote_uri: &str,
        tos: Tos,
        content: Option<Content>,
    ) -> SamuraiResult<SessionId> {
        let args = SessionInitiateArgs {
            local_uri: self.sip_uri.clone(),
            remote_uri: remote_uri.to_string(),
            tos,
            content,
        };

        let session_id = self.client.session_initiate(args).await.inspect_err(|e| {
            warn!("{} session from {} failed: {}", tos, self.sip_uri, e);
        })?;

        info!(
            "{} session {} started from {} to {}",
            tos, session_id, self.sip_uri, remote_uri
        );

        self.sessions.insert(
            session_id.clone(),
            Session::new(self.client.clone(), session_id.clone(), tos),
        );

        Ok(session_id)
    }
}
