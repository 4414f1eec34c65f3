use crate::bottle::Bottle;
use crate::error::{CellarError, RecordKind, Result};
use crate::events::CellarEvent;
use crate::journal::JournalEntry;
use crate::location::{BottleLocation, GridCell};
use crate::occupancy;
use crate::transaction::CellarTransaction;
use crate::wine::wine_name;

fn journal_quantity(count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| CellarError::InvalidQuantity(count))
}

impl CellarTransaction {
    /// Fails unless `cell` names an existing rack, lies inside it and is free.
    pub fn ensure_vacant(&self, cell: &GridCell) -> Result<()> {
        let rack = self.rack(&cell.rack_id)?;
        if !rack.contains(cell) {
            return Err(CellarError::OutOfBounds {
                cell: cell.clone(),
                width: rack.width,
                height: rack.height,
            });
        }
        match occupancy::bottle_at(self.bottles(), cell) {
            Some(occupant) => Err(CellarError::Conflict {
                cell: cell.clone(),
                occupant: occupant.id.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Add `count` active bottles of `wine_id` at `location`.
    ///
    /// A grid cell takes exactly one bottle; unsorted and legacy locations
    /// take any number.
    pub fn add_bottles(
        &mut self,
        wine_id: &str,
        count: usize,
        location: BottleLocation,
    ) -> Result<Vec<Bottle>> {
        let name = self.wine(wine_id)?.name.clone();
        if count == 0 {
            return Ok(Vec::new());
        }
        let quantity = journal_quantity(count)?;
        if let BottleLocation::Placed(cell) = &location {
            if count > 1 {
                return Err(CellarError::MultiplePlacement {
                    cell: cell.clone(),
                    count,
                });
            }
            self.ensure_vacant(cell)?;
        }

        let (user_id, now) = (self.user_id().to_string(), self.now());
        let label = location.label(self.racks());
        let added: Vec<Bottle> = (0..count)
            .map(|_| Bottle::new(wine_id, location.clone(), &user_id, now))
            .collect();
        self.bottles_mut().extend(added.iter().cloned());
        self.record(JournalEntry::stock_in(
            wine_id,
            name,
            quantity,
            label,
            &user_id,
            now,
        ));
        self.emit(CellarEvent::BottlesAdded {
            wine_id: wine_id.to_string(),
            bottle_ids: added.iter().map(|b| b.id.clone()).collect(),
        });
        Ok(added)
    }

    pub fn add_bottle_at_location(&mut self, wine_id: &str, cell: GridCell) -> Result<Bottle> {
        let mut added = self.add_bottles(wine_id, 1, BottleLocation::Placed(cell))?;
        added
            .pop()
            .ok_or_else(|| CellarError::not_found(RecordKind::Bottle, wine_id))
    }

    /// Relocate an active bottle. The destination must be unsorted or a
    /// vacant cell; moving onto the bottle's own cell changes nothing.
    pub fn move_bottle(&mut self, bottle_id: &str, to: BottleLocation) -> Result<Bottle> {
        let index = self.bottle_index(bottle_id)?;
        let bottle = &self.bottles()[index];
        bottle.ensure_active("moved")?;
        if bottle.location == to {
            return Ok(bottle.clone());
        }
        match &to {
            BottleLocation::Placed(cell) => self.ensure_vacant(cell)?,
            BottleLocation::LegacyLabel(label) => {
                return Err(CellarError::InvalidLocation(label.clone()))
            }
            BottleLocation::Unsorted => {}
        }

        let bottle = &self.bottles()[index];
        let from = bottle.location.clone();
        let wine_id = bottle.wine_id.clone();
        let entry = JournalEntry::moved(
            &wine_id,
            wine_name(self.wines(), &wine_id),
            from.label(self.racks()),
            to.label(self.racks()),
            self.user_id(),
            self.now(),
        );

        let moved = &mut self.bottles_mut()[index];
        moved.relocate(to.clone())?;
        let moved = moved.clone();
        self.record(entry);
        self.emit(CellarEvent::BottleMoved {
            bottle_id: bottle_id.to_string(),
            from,
            to,
        });
        Ok(moved)
    }

    /// `Active → Consumed` for one named bottle of `wine_id`.
    pub fn consume_specific_bottle(&mut self, wine_id: &str, bottle_id: &str) -> Result<Bottle> {
        let index = self.wine_bottle_index(wine_id, bottle_id)?;
        self.bottles()[index].ensure_active("consumed")?;

        let entry = JournalEntry::stock_out(
            wine_id,
            wine_name(self.wines(), wine_id),
            self.bottles()[index].location.label(self.racks()),
            self.user_id(),
            self.now(),
        );
        let now = self.now();
        let consumed = &mut self.bottles_mut()[index];
        consumed.consume(now)?;
        let consumed = consumed.clone();
        self.record(entry);
        self.emit(CellarEvent::BottleConsumed {
            wine_id: wine_id.to_string(),
            bottle_id: bottle_id.to_string(),
        });
        Ok(consumed)
    }

    /// Consume any active bottle of `wine_id`, taking off-grid bottles first.
    pub fn consume_bottle(&mut self, wine_id: &str) -> Result<Option<Bottle>> {
        let mut active = self
            .bottles()
            .iter()
            .filter(|b| b.wine_id == wine_id && b.is_active());
        let chosen = active
            .clone()
            .find(|b| b.location.is_off_grid())
            .or_else(|| active.next())
            .map(|b| b.id.clone());

        match chosen {
            Some(bottle_id) => self.consume_specific_bottle(wine_id, &bottle_id).map(Some),
            None => Ok(None),
        }
    }

    /// `Active → Gifted`.
    pub fn gift_bottle(
        &mut self,
        wine_id: &str,
        bottle_id: &str,
        recipient: &str,
        occasion: Option<&str>,
    ) -> Result<Bottle> {
        let index = self.wine_bottle_index(wine_id, bottle_id)?;
        self.bottles()[index].ensure_active("gifted")?;

        let occasion = occasion.filter(|o| !o.trim().is_empty()).map(str::to_string);
        let entry = JournalEntry::gifted(
            wine_id,
            wine_name(self.wines(), wine_id),
            self.bottles()[index].location.label(self.racks()),
            recipient.to_string(),
            occasion.clone(),
            self.user_id(),
            self.now(),
        );
        let now = self.now();
        let gifted = &mut self.bottles_mut()[index];
        gifted.gift(recipient, occasion, now)?;
        let gifted = gifted.clone();
        self.record(entry);
        self.emit(CellarEvent::BottleGifted {
            wine_id: wine_id.to_string(),
            bottle_id: bottle_id.to_string(),
            recipient: recipient.to_string(),
        });
        Ok(gifted)
    }

    /// Put one bottle of `wine_id` into every vacant cell of the rack,
    /// row by row.
    pub fn fill_rack_with_wine(&mut self, rack_id: &str, wine_id: &str) -> Result<Vec<Bottle>> {
        let rack = self.rack(rack_id)?.clone();
        let name = self.wine(wine_id)?.name.clone();
        let vacant = occupancy::vacant_cells(&rack, self.bottles());
        if vacant.is_empty() {
            tracing::debug!(rack = %rack.id, "rack already full");
            return Ok(Vec::new());
        }
        let quantity = journal_quantity(vacant.len())?;

        let (user_id, now) = (self.user_id().to_string(), self.now());
        let added: Vec<Bottle> = vacant
            .into_iter()
            .map(|cell| Bottle::new(wine_id, cell.into(), &user_id, now))
            .collect();
        self.bottles_mut().extend(added.iter().cloned());
        self.record(JournalEntry::stock_in(
            wine_id,
            name,
            quantity,
            rack.name.clone(),
            &user_id,
            now,
        ));
        self.emit(CellarEvent::BottlesAdded {
            wine_id: wine_id.to_string(),
            bottle_ids: added.iter().map(|b| b.id.clone()).collect(),
        });
        Ok(added)
    }

    fn wine_bottle_index(&self, wine_id: &str, bottle_id: &str) -> Result<usize> {
        let index = self.bottle_index(bottle_id)?;
        if self.bottles()[index].wine_id != wine_id {
            return Err(CellarError::not_found(RecordKind::Bottle, bottle_id));
        }
        Ok(index)
    }
}
