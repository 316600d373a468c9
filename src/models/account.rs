use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use samurai_core::{normalize, NumberPlan, SamuraiConfig, SamuraiResult};
use samurai_rpc::{Response, RpcTransport};

use crate::api::{CurrentBalance, SamuraiClient, ServerInfo};
use crate::models::{Contact, Phonebook, Uri};
use crate::vcard::CardParser;

/// Snapshot of the account balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub amount: Decimal,
    pub currency: String,
    pub vat_percent: Option<Decimal>,
}

impl From<CurrentBalance> for Balance {
    fn from(current: CurrentBalance) -> Self {
        Self {
            amount: Decimal::from_f64(current.total_including_vat).unwrap_or(Decimal::ZERO),
            currency: current.currency,
            vat_percent: current.vat_percent.and_then(Decimal::from_f64),
        }
    }
}

/// One Samurai account and its local mirror of server state
///
/// Nothing is fetched on construction; the `update_*` methods pull server
/// state in. A failed update leaves the local state untouched and reports
/// why it failed.
#[derive(Debug)]
pub struct Account {
    username: String,
    number_plan: NumberPlan,
    client: SamuraiClient,
    phonebook: Phonebook,
    uris: Vec<Uri>,
    balance: Option<Balance>,
}

impl Account {
    /// Creates an account talking XML-RPC over HTTPS
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut account = Account::new(&SamuraiConfig::new("username", "password"))?;
    /// account.update_managed_uris().await?;
    /// ```
    pub fn new(config: &SamuraiConfig) -> SamuraiResult<Self> {
        let client = SamuraiClient::from_config(config)?;
        Ok(Self::with_client(&config.username, client).with_number_plan(config.number_plan.clone()))
    }

    /// Creates an account from `SAMURAI__*` environment variables
    pub fn from_env() -> SamuraiResult<Self> {
        let config = SamuraiConfig::load()?;
        Self::new(&config)
    }

    /// Creates an account on top of an existing transport
    pub fn with_transport(username: &str, transport: Arc<dyn RpcTransport>) -> Self {
        Self::with_client(username, SamuraiClient::new(transport))
    }

    fn with_client(username: &str, client: SamuraiClient) -> Self {
        Self {
            username: username.to_string(),
            number_plan: NumberPlan::default(),
            client,
            phonebook: Phonebook::new(),
            uris: Vec::new(),
            balance: None,
        }
    }

    pub fn with_number_plan(mut self, number_plan: NumberPlan) -> Self {
        self.number_plan = number_plan;
        self
    }

    /// Replaces the vCard parser; contacts fetched so far are dropped
    pub fn with_card_parser(mut self, parser: Arc<dyn CardParser>) -> Self {
        self.phonebook = Phonebook::with_parser(parser);
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn client(&self) -> &SamuraiClient {
        &self.client
    }

    pub fn number_plan(&self) -> &NumberPlan {
        &self.number_plan
    }

    /// Normalizes a telephone number with the account's number plan
    pub fn sip_uri_for(&self, number: &str) -> SamuraiResult<String> {
        normalize(number, &self.number_plan)
    }

    pub fn uris(&self) -> &[Uri] {
        &self.uris
    }

    pub fn uris_mut(&mut self) -> &mut [Uri] {
        &mut self.uris
    }

    /// First managed URI with the given SIP URI
    pub fn find_uri_mut(&mut self, sip_uri: &str) -> Option<&mut Uri> {
        self.uris.iter_mut().find(|uri| uri.sip_uri() == sip_uri)
    }

    pub fn phonebook(&self) -> &Phonebook {
        &self.phonebook
    }

    /// Last successfully fetched balance
    pub fn balance(&self) -> Option<&Balance> {
        self.balance.as_ref()
    }

    /// Raw server status response
    pub async fn server_status(&self) -> Response {
        self.client.server_status().await
    }

    pub async fn server_info(&self) -> SamuraiResult<ServerInfo> {
        self.client.server_info().await
    }

    /// Appends the URIs the server lists for this account
    ///
    /// Existing entries are kept, so calling this twice lists every URI twice.
    ///
    /// # Returns
    ///
    /// Number of URIs appended
    #[instrument(skip(self), fields(username = %self.username))]
    pub async fn update_managed_uris(&mut self) -> SamuraiResult<usize> {
        let own_uris = self
            .client
            .own_uri_list()
            .await
            .inspect_err(|e| warn!("URI list update failed: {}", e))?;

        let added = own_uris.len();
        for own_uri in own_uris {
            self.uris.push(Uri::new(self.client.clone(), own_uri));
        }

        info!("Managed URIs: {} appended, {} total", added, self.uris.len());

        Ok(added)
    }

    /// Appends all server phonebook entries to the local phonebook
    ///
    /// Entry IDs are listed first, then fetched in one batch. The phonebook
    /// only changes when both calls succeed and every card parses.
    ///
    /// # Returns
    ///
    /// Number of contacts appended
    #[instrument(skip(self), fields(username = %self.username))]
    pub async fn update_phonebook(&mut self) -> SamuraiResult<usize> {
        let listing = self
            .client
            .phonebook_list()
            .await
            .inspect_err(|e| warn!("Phonebook listing failed: {}", e))?;

        let entry_ids: Vec<String> = listing.into_iter().map(|entry| entry.entry_id).collect();

        let entries = self
            .client
            .phonebook_entries(&entry_ids)
            .await
            .inspect_err(|e| warn!("Phonebook entry fetch failed: {}", e))?;

        let mut contacts = Vec::with_capacity(entries.len());
        for entry in entries {
            let card = self
                .phonebook
                .parser()
                .parse(&entry.entry)
                .inspect_err(|e| warn!("Phonebook entry {} unparsable: {}", entry.entry_id, e))?;
            contacts.push(Contact {
                entry_id: entry.entry_id,
                entry_hash: entry.entry_hash,
                card,
            });
        }

        let added = contacts.len();
        self.phonebook.extend(contacts);

        info!("Phonebook: {} appended, {} total", added, self.phonebook.len());

        Ok(added)
    }

    /// Fetches the balance and overwrites the local snapshot
    ///
    /// On failure the previous snapshot is kept.
    #[instrument(skip(self), fields(username = %self.username))]
    pub async fn update_balance(&mut self) -> SamuraiResult<&Balance> {
        let current = self
            .client
            .balance()
            .await
            .inspect_err(|e| warn!("Balance update failed: {}", e))?;

        let balance = self.balance.insert(Balance::from(current));

        info!("Balance: {} {}", balance.amount, balance.currency);

        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use samurai_rpc::{MockRpcTransport, Value};
    use std::collections::BTreeMap;

    fn reply(code: i64, extra: Vec<(&str, Value)>) -> Response {
        let mut fields: BTreeMap<String, Value> = extra
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        fields.insert("StatusCode".to_string(), Value::Int(code));
        fields.insert("StatusString".to_string(), Value::from("Method success"));
        Response::reply(fields)
    }

    fn entry(id: &str) -> Value {
        let mut fields = BTreeMap::new();
        fields.insert("EntryID".to_string(), Value::from(id));
        fields.insert("EntryHash".to_string(), Value::from("h"));
        fields.insert(
            "Entry".to_string(),
            Value::from("BEGIN:VCARD\r\nVERSION:3.0\r\nFN:John Doe\r\nEND:VCARD\r\n"),
        );
        Value::Struct(fields)
    }

    #[test]
    fn test_balance_from_current_balance() {
        let balance = Balance::from(CurrentBalance {
            currency: "EUR".to_string(),
            total_including_vat: 3.5,
            vat_percent: None,
        });
        assert_eq!(balance.amount, Decimal::new(35, 1));
        assert_eq!(balance.currency, "EUR");
        assert_eq!(balance.vat_percent, None);
    }

    #[tokio::test]
    async fn test_update_phonebook_lists_then_fetches() {
        let mut seq = Sequence::new();
        let mut transport = MockRpcTransport::new();

        transport
            .expect_call()
            .withf(|method, params| method == "samurai.PhonebookListGet" && params.is_empty())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| reply(200, vec![("PhonebookList", Value::Array(vec![entry("7")]))]));
        transport
            .expect_call()
            .withf(|method, params| {
                method == "samurai.PhonebookEntryGet"
                    && params.get("EntryIDList") == Some(&Value::Array(vec![Value::from("7")]))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| reply(200, vec![("EntryList", Value::Array(vec![entry("7")]))]));

        let mut account = Account::with_transport("alice", Arc::new(transport));

        assert_eq!(account.update_phonebook().await.unwrap(), 1);
        assert_eq!(account.phonebook().contacts()[0].entry_id, "7");
    }

    #[tokio::test]
    async fn test_update_balance_error_keeps_none() {
        let mut transport = MockRpcTransport::new();
        transport
            .expect_call()
            .times(1)
            .returning(|_, _| Response::transport_failure(111, "Connection refused"));

        let mut account = Account::with_transport("alice", Arc::new(transport));

        assert!(account.update_balance().await.is_err());
        assert!(account.balance().is_none());
    }
}
