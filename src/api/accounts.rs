//! Account level calls: server info, managed URIs and balance

use tracing::{info, instrument};

use samurai_core::SamuraiResult;
use samurai_rpc::{Params, Response};

use super::client::SamuraiClient;
use super::types::*;

impl SamuraiClient {
    /// Server status, exactly as returned
    #[instrument(skip(self))]
    pub async fn server_status(&self) -> Response {
        self.call_raw(methods::SERVER_INFO, Params::new()).await
    }

    /// Server name, version and vendor
    #[instrument(skip(self))]
    pub async fn server_info(&self) -> SamuraiResult<ServerInfo> {
        self.call(methods::SERVER_INFO, Params::new()).await
    }

    /// URIs managed by the account, in server order
    #[instrument(skip(self))]
    pub async fn own_uri_list(&self) -> SamuraiResult<Vec<OwnUri>> {
        let reply: OwnUriListReply = self
            .call(methods::OWN_URI_LIST_GET, Params::new())
            .await?;

        info!("Samurai returned {} own URIs", reply.own_uri_list.len());

        Ok(reply.own_uri_list)
    }

    /// Current account balance
    #[instrument(skip(self))]
    pub async fn balance(&self) -> SamuraiResult<CurrentBalance> {
        let reply: BalanceReply = self.call(methods::BALANCE_GET, Params::new()).await?;
        Ok(reply.current_balance)
    }
}
