//! vCard parsing for phonebook entries

use samurai_core::{SamuraiError, SamuraiResult};

/// Parses the vCard text of a phonebook entry
pub trait CardParser: Send + Sync {
    fn parse(&self, raw: &str) -> SamuraiResult<Card>;
}

/// One property line of a vCard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardProperty {
    /// Upper-cased property name, e.g. `FN` or `TEL`
    pub name: String,
    pub params: Vec<(String, Vec<String>)>,
    pub value: String,
}

/// A parsed contact card
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Card {
    properties: Vec<CardProperty>,
}

impl Card {
    pub fn new(properties: Vec<CardProperty>) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &[CardProperty] {
        &self.properties
    }

    /// First property with the given name (case-insensitive)
    pub fn property(&self, name: &str) -> Option<&CardProperty> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Value of `FN`
    pub fn formatted_name(&self) -> Option<&str> {
        self.property("FN").map(|p| p.value.as_str())
    }

    /// Values of all `TEL` properties
    pub fn telephones(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case("TEL"))
            .map(|p| p.value.as_str())
            .collect()
    }
}

/// [`CardParser`] backed by the `ical` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct VcardParser;

impl CardParser for VcardParser {
    fn parse(&self, raw: &str) -> SamuraiResult<Card> {
        let mut contacts = ical::VcardParser::new(raw.as_bytes());
        let contact = contacts
            .next()
            .ok_or_else(|| SamuraiError::Card("no vCard found".to_string()))?
            .map_err(|e| SamuraiError::Card(e.to_string()))?;

        let properties = contact
            .properties
            .into_iter()
            .map(|p| CardProperty {
                name: p.name.to_ascii_uppercase(),
                params: p.params.unwrap_or_default(),
                value: p.value.unwrap_or_default(),
            })
            .collect();

        Ok(Card::new(properties))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOHN: &str = "BEGIN:VCARD\r\n\
                        VERSION:3.0\r\n\
                        N:Doe;John;;;\r\n\
                        FN:John Doe\r\n\
                        TEL;TYPE=work:+4930123456\r\n\
                        TEL;TYPE=cell:+491701234567\r\n\
                        END:VCARD\r\n";

    #[test]
    fn test_parse_card() {
        let card = VcardParser.parse(JOHN).unwrap();
        assert_eq!(card.formatted_name(), Some("John Doe"));
        assert_eq!(card.telephones(), vec!["+4930123456", "+491701234567"]);
        assert_eq!(card.property("n").map(|p| p.value.as_str()), Some("Doe;John;;;"));
    }

    #[test]
    fn test_parse_empty_text_fails() {
        assert!(matches!(VcardParser.parse(""), Err(SamuraiError::Card(_))));
    }

    #[test]
    fn test_card_without_name() {
        let card = Card::new(vec![CardProperty {
            name: "TEL".to_string(),
            params: Vec::new(),
            value: "123".to_string(),
        }]);
        assert_eq!(card.formatted_name(), None);
        assert_eq!(card.telephones(), vec!["123"]);
    }
}
