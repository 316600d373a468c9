use std::fmt;
use std::sync::Arc;

use samurai_core::SamuraiResult;

use crate::vcard::{Card, CardParser, VcardParser};

/// One phonebook entry as stored on the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub entry_id: String,
    /// Changes whenever the entry changes on the server
    pub entry_hash: String,
    pub card: Card,
}

/// Local copy of the account phonebook
///
/// Entries are kept in insertion order. Adding an entry ID that is already
/// present stores a second copy.
#[derive(Clone)]
pub struct Phonebook {
    parser: Arc<dyn CardParser>,
    contacts: Vec<Contact>,
}

impl fmt::Debug for Phonebook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Phonebook")
            .field("contacts", &self.contacts)
            .finish_non_exhaustive()
    }
}

impl Default for Phonebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Phonebook {
    pub fn new() -> Self {
        Self::with_parser(Arc::new(VcardParser))
    }

    pub fn with_parser(parser: Arc<dyn CardParser>) -> Self {
        Self {
            parser,
            contacts: Vec::new(),
        }
    }

    /// Parses `raw_card` and appends it
    pub fn add_contact(&mut self, entry_id: &str, entry_hash: &str, raw_card: &str) -> SamuraiResult<()> {
        let card = self.parser.parse(raw_card)?;
        self.contacts.push(Contact {
            entry_id: entry_id.to_string(),
            entry_hash: entry_hash.to_string(),
            card,
        });
        Ok(())
    }

    pub(crate) fn parser(&self) -> &dyn CardParser {
        self.parser.as_ref()
    }

    pub(crate) fn extend(&mut self, contacts: Vec<Contact>) {
        self.contacts.extend(contacts);
    }

    /// Parsed cards in insertion order, without entry IDs and hashes
    pub fn list(&self) -> Vec<&Card> {
        self.contacts.iter().map(|c| &c.card).collect()
    }

    /// Full records, including entry IDs and hashes
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// New phonebook with the contacts whose formatted name contains `fragment`
    pub fn search_name(&self, fragment: &str) -> Phonebook {
        Phonebook {
            parser: Arc::clone(&self.parser),
            contacts: self
                .contacts
                .iter()
                .filter(|c| {
                    c.card
                        .formatted_name()
                        .map_or(false, |name| name.contains(fragment))
                })
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
