//! Cellar commands registered on a [`Service`].

use serde::Deserialize;
use serde_json::{json, Value};

use super::context::Context;
use super::error::HandlerError;
use super::service::Service;
use crate::cellar::Cellar;
use crate::location::BottleLocation;
use crate::lock::LockManager;
use crate::rack::RackType;
use crate::store::Store;
use crate::wine::Wine;

pub const RACK_CREATE: &str = "rack.create";
pub const RACK_RENAME: &str = "rack.rename";
pub const RACK_DELETE: &str = "rack.delete";
pub const RACK_FILL: &str = "rack.fill";
pub const BOTTLE_PLACE: &str = "bottle.place";
pub const BOTTLE_MOVE: &str = "bottle.move";
pub const BOTTLE_CONSUME: &str = "bottle.consume";
pub const BOTTLE_GIFT: &str = "bottle.gift";
pub const WINE_SAVE: &str = "wine.save";
pub const WINE_DELETE: &str = "wine.delete";
pub const JOURNAL_NOTE: &str = "journal.note";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRack {
    name: String,
    width: u32,
    height: u32,
    #[serde(rename = "type", default)]
    rack_type: RackType,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameRack {
    rack_id: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RackRef {
    rack_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FillRack {
    rack_id: String,
    wine_id: String,
}

/// Body of `bottle.place` and `POST /api/bottles`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBottles {
    pub wine_id: String,
    #[serde(default = "one")]
    pub count: usize,
    #[serde(default)]
    pub location: BottleLocation,
}

fn one() -> usize {
    1
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveBottle {
    bottle_id: String,
    location: BottleLocation,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsumeBottle {
    wine_id: String,
    bottle_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GiftBottle {
    wine_id: String,
    bottle_id: String,
    recipient: String,
    occasion: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WineRef {
    wine_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddNote {
    wine_id: Option<String>,
    note: String,
}

/// The cellar acting as the session's user, or as its configured default.
pub fn acting<S, M>(ctx: &Context<'_, Cellar<S, M>>) -> Cellar<S, M>
where
    S: Store,
    M: LockManager,
{
    match ctx.session().user_id() {
        Some(user_id) => ctx.backend().for_user(user_id),
        None => ctx.backend().clone(),
    }
}

/// A [`Service`] exposing every cellar command.
pub fn cellar_service<S, M>(cellar: Cellar<S, M>) -> Service<Cellar<S, M>>
where
    S: Store + 'static,
    M: LockManager + 'static,
{
    Service::new(cellar)
        .command(
            RACK_CREATE,
            &["name", "width", "height"],
            |ctx| {
                let input = ctx.input::<CreateRack>()?;
                let rack =
                    acting(ctx).create_rack(&input.name, input.width, input.height, input.rack_type)?;
                Ok(serde_json::to_value(rack)?)
            },
        )
        .command(
            RACK_RENAME,
            &["rackId", "name"],
            |ctx| {
                let input = ctx.input::<RenameRack>()?;
                let renamed = acting(ctx).rename_rack(&input.rack_id, &input.name)?;
                Ok(json!({ "renamed": renamed }))
            },
        )
        .command(
            RACK_DELETE,
            &["rackId"],
            |ctx| {
                let input = ctx.input::<RackRef>()?;
                let relocated = acting(ctx).delete_rack(&input.rack_id)?;
                Ok(json!({ "relocated": relocated }))
            },
        )
        .command(
            RACK_FILL,
            &["rackId", "wineId"],
            |ctx| {
                let input = ctx.input::<FillRack>()?;
                let added = acting(ctx).fill_rack_with_wine(&input.rack_id, &input.wine_id)?;
                Ok(serde_json::to_value(added)?)
            },
        )
        .command(BOTTLE_PLACE, &["wineId"], place_bottles::<S, M>)
        .command(
            BOTTLE_MOVE,
            &["bottleId", "location"],
            |ctx| {
                let input = ctx.input::<MoveBottle>()?;
                let moved = acting(ctx).move_bottle(&input.bottle_id, input.location)?;
                Ok(serde_json::to_value(moved)?)
            },
        )
        .command(
            BOTTLE_CONSUME,
            &["wineId"],
            |ctx| {
                let input = ctx.input::<ConsumeBottle>()?;
                let cellar = acting(ctx);
                let consumed = match &input.bottle_id {
                    Some(bottle_id) => Some(cellar.consume_specific_bottle(&input.wine_id, bottle_id)?),
                    None => cellar.consume_bottle(&input.wine_id)?,
                };
                Ok(serde_json::to_value(consumed)?)
            },
        )
        .command(
            BOTTLE_GIFT,
            &["wineId", "bottleId", "recipient"],
            |ctx| {
                let input = ctx.input::<GiftBottle>()?;
                let gifted = acting(ctx).gift_bottle(
                    &input.wine_id,
                    &input.bottle_id,
                    &input.recipient,
                    input.occasion.as_deref(),
                )?;
                Ok(serde_json::to_value(gifted)?)
            },
        )
        .command(
            WINE_SAVE,
            &["name"],
            |ctx| {
                let wine = ctx.input::<Wine>()?;
                Ok(serde_json::to_value(acting(ctx).save_wine(wine)?)?)
            },
        )
        .command(
            WINE_DELETE,
            &["wineId"],
            |ctx| {
                let input = ctx.input::<WineRef>()?;
                let deleted = acting(ctx).delete_wine(&input.wine_id)?;
                Ok(json!({ "deleted": deleted }))
            },
        )
        .command(
            JOURNAL_NOTE,
            &["note"],
            |ctx| {
                let input = ctx.input::<AddNote>()?;
                let entry = acting(ctx).add_note(input.wine_id.as_deref(), &input.note)?;
                Ok(serde_json::to_value(entry)?)
            },
        )
}

fn place_bottles<S, M>(ctx: &Context<'_, Cellar<S, M>>) -> Result<Value, HandlerError>
where
    S: Store,
    M: LockManager,
{
    let input = ctx.input::<PlaceBottles>()?;
    let added = acting(ctx).add_bottles(&input.wine_id, input.count, input.location)?;
    Ok(serde_json::to_value(added)?)
}
