//! Bottle records and their lifecycle.
//!
//! ```text
//! Active(A) ──move──▶ Active(B)
//! Active    ──consume──▶ Consumed   (terminal)
//! Active    ──gift────▶ Gifted     (terminal)
//! ```
//!
//! Consumed and gifted bottles stay in the ledger for history. The wire
//! shape keeps the `isConsumed` flag plus optional gift fields; `state()`
//! folds them back into a single [`BottleState`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CellarError, Result};
use crate::location::{BottleLocation, GridCell};
use crate::store::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BottleState {
    Active,
    Consumed,
    Gifted,
}

impl BottleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BottleState::Active => "active",
            BottleState::Consumed => "consumed",
            BottleState::Gifted => "gifted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottle {
    pub id: String,
    pub wine_id: String,
    #[serde(default)]
    pub location: BottleLocation,
    #[serde(default)]
    pub added_by_user_id: String,
    pub purchase_date: DateTime<Utc>,
    #[serde(default)]
    pub is_consumed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gifted_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_occasion: Option<String>,
}

impl Bottle {
    /// A fresh active bottle with a generated id.
    pub fn new(
        wine_id: impl Into<String>,
        location: BottleLocation,
        added_by_user_id: impl Into<String>,
        purchase_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            wine_id: wine_id.into(),
            location,
            added_by_user_id: added_by_user_id.into(),
            purchase_date,
            is_consumed: false,
            consumed_date: None,
            gifted_to: None,
            gift_occasion: None,
        }
    }

    pub fn state(&self) -> BottleState {
        match (self.is_consumed, &self.gifted_to) {
            (false, _) => BottleState::Active,
            (true, Some(_)) => BottleState::Gifted,
            (true, None) => BottleState::Consumed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == BottleState::Active
    }

    /// True when this bottle is active and sits exactly in `cell`.
    pub fn occupies(&self, cell: &GridCell) -> bool {
        self.is_active() && self.location.cell() == Some(cell)
    }

    /// Fails with `InvalidTransition` unless the bottle is active.
    pub fn ensure_active(&self, action: &'static str) -> Result<()> {
        match self.state() {
            BottleState::Active => Ok(()),
            state => Err(CellarError::InvalidTransition {
                bottle_id: self.id.clone(),
                state: state.as_str(),
                action,
            }),
        }
    }

    /// `Active → Active`, relocating the bottle.
    pub fn relocate(&mut self, location: BottleLocation) -> Result<()> {
        self.ensure_active("moved")?;
        self.location = location;
        Ok(())
    }

    /// `Active → Consumed`.
    pub fn consume(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.ensure_active("consumed")?;
        self.is_consumed = true;
        self.consumed_date = Some(at);
        Ok(())
    }

    /// `Active → Gifted`.
    pub fn gift(
        &mut self,
        recipient: impl Into<String>,
        occasion: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_active("gifted")?;
        self.is_consumed = true;
        self.consumed_date = Some(at);
        self.gifted_to = Some(recipient.into());
        self.gift_occasion = occasion;
        Ok(())
    }
}

impl Collection for Bottle {
    const KEY: &'static str = "vf_bottles";

    fn id(&self) -> &str {
        &self.id
    }
}
