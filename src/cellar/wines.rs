use crate::error::Result;
use crate::events::CellarEvent;
use crate::journal::JournalEntry;
use crate::transaction::CellarTransaction;
use crate::wine::{wine_name, Wine};

impl CellarTransaction {
    /// Insert or replace a wine by id. A blank id gets a generated one.
    pub fn save_wine(&mut self, mut wine: Wine) -> Result<Wine> {
        if wine.id.trim().is_empty() {
            wine.id = uuid::Uuid::new_v4().to_string();
        }
        let wines = self.wines_mut();
        match wines.iter().position(|w| w.id == wine.id) {
            Some(index) => wines[index] = wine.clone(),
            None => wines.push(wine.clone()),
        }
        self.emit(CellarEvent::WineSaved {
            wine_id: wine.id.clone(),
        });
        Ok(wine)
    }

    /// Remove the wine and hard-delete all of its bottles.
    pub fn delete_wine(&mut self, wine_id: &str) -> Result<bool> {
        if !self.wines().iter().any(|w| w.id == wine_id) {
            return Ok(false);
        }
        self.wines_mut().retain(|w| w.id != wine_id);

        let bottles = self.bottles_mut();
        let before = bottles.len();
        bottles.retain(|b| b.wine_id != wine_id);
        let removed_bottles = before - bottles.len();

        self.emit(CellarEvent::WineDeleted {
            wine_id: wine_id.to_string(),
            removed_bottles,
        });
        Ok(true)
    }

    pub fn add_note(&mut self, wine_id: Option<&str>, note: &str) -> Result<JournalEntry> {
        let name = wine_id
            .map(|id| wine_name(self.wines(), id))
            .unwrap_or_default();
        let entry = JournalEntry::note(
            wine_id.map(str::to_string),
            name,
            note.to_string(),
            self.user_id(),
            self.now(),
        );
        self.record(entry.clone());
        self.emit(CellarEvent::NoteAdded {
            entry_id: entry.id.clone(),
        });
        Ok(entry)
    }
}
