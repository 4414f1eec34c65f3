//! Command API over a [`crate::Cellar`].
//!
//! Commands are registered by name on a [`Service`] and dispatched with a
//! JSON payload plus a [`Session`] carrying the caller's identity. The
//! `http` feature adds an axum transport.
//!
//! ```ignore
//! use std::sync::Arc;
//! use cellar_map::api::{self, Session};
//!
//! let service = Arc::new(api::cellar_service(cellar));
//! let rack = service.dispatch(
//!     "rack.create",
//!     json!({ "name": "Cave", "width": 4, "height": 3 }),
//!     Session::for_user("alice"),
//! )?;
//!
//! // api::serve(service, "127.0.0.1:3000").await?;
//! ```

mod context;
mod error;
mod handlers;
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use handlers::{
    acting, cellar_service, PlaceBottles, BOTTLE_CONSUME, BOTTLE_GIFT, BOTTLE_MOVE,
    BOTTLE_PLACE, JOURNAL_NOTE, RACK_CREATE, RACK_DELETE, RACK_FILL, RACK_RENAME, WINE_DELETE,
    WINE_SAVE,
};
pub use service::Service;
pub use session::{Session, USER_ID_HEADER};

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};
