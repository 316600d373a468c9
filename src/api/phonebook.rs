//! Phonebook calls

use tracing::instrument;

use samurai_core::SamuraiResult;
use samurai_rpc::{Params, Value};

use super::client::SamuraiClient;
use super::types::*;

impl SamuraiClient {
    /// IDs and hashes of all phonebook entries
    #[instrument(skip(self))]
    pub async fn phonebook_list(&self) -> SamuraiResult<Vec<PhonebookListEntry>> {
        let reply: PhonebookListReply = self
            .call(methods::PHONEBOOK_LIST_GET, Params::new())
            .await?;
        Ok(reply.phonebook_list)
    }

    /// Full entries for the given IDs
    ///
    /// # Arguments
    ///
    /// * `entry_ids` - IDs as returned by [`phonebook_list`](Self::phonebook_list)
    #[instrument(skip(self, entry_ids), fields(count = entry_ids.len()))]
    pub async fn phonebook_entries(&self, entry_ids: &[String]) -> SamuraiResult<Vec<PhonebookEntry>> {
        let mut params = Params::new();
        params.insert(
            "EntryIDList".to_string(),
            Value::Array(entry_ids.iter().cloned().map(Value::String).collect()),
        );

        let reply: PhonebookEntryReply = self.call(methods::PHONEBOOK_ENTRY_GET, params).await?;
        Ok(reply.entry_list)
    }
}
