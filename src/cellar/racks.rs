use crate::error::{CellarError, Result};
use crate::events::CellarEvent;
use crate::location::BottleLocation;
use crate::rack::{Rack, RackType};
use crate::transaction::CellarTransaction;

fn ensure_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(CellarError::InvalidDimensions { width, height });
    }
    Ok(())
}

impl CellarTransaction {
    pub fn create_rack(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        rack_type: RackType,
    ) -> Result<Rack> {
        ensure_dimensions(width, height)?;
        let rack = Rack {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            width,
            height,
            rack_type,
        };
        self.racks_mut().push(rack.clone());
        self.emit(CellarEvent::RackCreated {
            rack_id: rack.id.clone(),
        });
        Ok(rack)
    }

    pub fn rename_rack(&mut self, rack_id: &str, name: &str) -> Result<bool> {
        let Some(index) = self.racks().iter().position(|r| r.id == rack_id) else {
            return Ok(false);
        };
        self.racks_mut()[index].name = name.to_string();
        self.emit(CellarEvent::RackRenamed {
            rack_id: rack_id.to_string(),
            name: name.to_string(),
        });
        Ok(true)
    }

    /// Remove the rack and send its active bottles to the unsorted bucket.
    pub fn delete_rack(&mut self, rack_id: &str) -> Result<Vec<String>> {
        if !self.racks().iter().any(|r| r.id == rack_id) {
            return Ok(Vec::new());
        }
        self.racks_mut().retain(|r| r.id != rack_id);

        let mut relocated = Vec::new();
        for bottle in self.bottles_mut().iter_mut() {
            if bottle.is_active() && bottle.location.is_in_rack(rack_id) {
                bottle.location = BottleLocation::Unsorted;
                relocated.push(bottle.id.clone());
            }
        }
        self.emit(CellarEvent::RackDeleted {
            rack_id: rack_id.to_string(),
            relocated: relocated.clone(),
        });
        Ok(relocated)
    }
}
