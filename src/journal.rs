//! Append-only cellar journal.
//!
//! One entry per inventory-affecting action. Entries are written in the same
//! batch as the ledger change they describe (see [`crate::transaction`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JournalEntryType {
    In,
    Out,
    Move,
    Gift,
    Note,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: JournalEntryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wine_id: Option<String>,
    #[serde(default)]
    pub wine_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub user_id: String,
}

impl JournalEntry {
    fn base(
        entry_type: JournalEntryType,
        wine_id: Option<String>,
        wine_name: String,
        user_id: &str,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            entry_type,
            wine_id,
            wine_name,
            quantity: None,
            from_location: None,
            to_location: None,
            recipient: None,
            occasion: None,
            note: None,
            user_id: user_id.to_string(),
        }
    }

    pub fn stock_in(
        wine_id: &str,
        wine_name: String,
        quantity: u32,
        to_location: String,
        user_id: &str,
        date: DateTime<Utc>,
    ) -> Self {
        let mut entry = Self::base(
            JournalEntryType::In,
            Some(wine_id.to_string()),
            wine_name,
            user_id,
            date,
        );
        entry.quantity = Some(quantity);
        entry.to_location = Some(to_location);
        entry
    }

    pub fn stock_out(
        wine_id: &str,
        wine_name: String,
        from_location: String,
        user_id: &str,
        date: DateTime<Utc>,
    ) -> Self {
        let mut entry = Self::base(
            JournalEntryType::Out,
            Some(wine_id.to_string()),
            wine_name,
            user_id,
            date,
        );
        entry.quantity = Some(1);
        entry.from_location = Some(from_location);
        entry
    }

    pub fn moved(
        wine_id: &str,
        wine_name: String,
        from_location: String,
        to_location: String,
        user_id: &str,
        date: DateTime<Utc>,
    ) -> Self {
        let mut entry = Self::base(
            JournalEntryType::Move,
            Some(wine_id.to_string()),
            wine_name,
            user_id,
            date,
        );
        entry.quantity = Some(1);
        entry.from_location = Some(from_location);
        entry.to_location = Some(to_location);
        entry
    }

    #[allow(clippy::too_many_arguments)]
    pub fn gifted(
        wine_id: &str,
        wine_name: String,
        from_location: String,
        recipient: String,
        occasion: Option<String>,
        user_id: &str,
        date: DateTime<Utc>,
    ) -> Self {
        let mut entry = Self::base(
            JournalEntryType::Gift,
            Some(wine_id.to_string()),
            wine_name,
            user_id,
            date,
        );
        entry.quantity = Some(1);
        entry.from_location = Some(from_location);
        entry.recipient = Some(recipient);
        entry.occasion = occasion;
        entry
    }

    pub fn note(
        wine_id: Option<String>,
        wine_name: String,
        note: String,
        user_id: &str,
        date: DateTime<Utc>,
    ) -> Self {
        let mut entry = Self::base(JournalEntryType::Note, wine_id, wine_name, user_id, date);
        entry.note = Some(note);
        entry
    }
}

impl Collection for JournalEntry {
    const KEY: &'static str = "vf_cellar_journal";

    fn id(&self) -> &str {
        &self.id
    }
}
