//! Error types for the cellar ledger and its persistence port.

use thiserror::Error;

use crate::location::GridCell;
use crate::lock::LockError;

/// What kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Rack,
    Bottle,
    Wine,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordKind::Rack => "rack",
            RecordKind::Bottle => "bottle",
            RecordKind::Wine => "wine",
        };
        f.write_str(name)
    }
}

/// Error type for store (persistence port) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A persisted collection could not be parsed, or a value could not be encoded.
    #[error("malformed collection {key}: {message}")]
    Serde { key: String, message: String },
    /// The backing medium failed.
    #[error("store io error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// The in-process guard around the backing medium was poisoned.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// Error type for every cellar operation.
#[derive(Debug, Error)]
pub enum CellarError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    /// The destination cell already holds an active bottle.
    #[error("cell {cell} is occupied by bottle {occupant}")]
    Conflict { cell: GridCell, occupant: String },

    /// More than one bottle was aimed at a single grid cell.
    #[error("cannot place {count} bottles into the single cell {cell}")]
    MultiplePlacement { cell: GridCell, count: usize },

    #[error("cell {cell} is outside rack {width}x{height}")]
    OutOfBounds {
        cell: GridCell,
        width: u32,
        height: u32,
    },

    /// The bottle is not in a state that allows the requested transition.
    #[error("bottle {bottle_id} is {state} and cannot be {action}")]
    InvalidTransition {
        bottle_id: String,
        state: &'static str,
        action: &'static str,
    },

    #[error("invalid destination: {0}")]
    InvalidLocation(String),

    #[error("rack dimensions must be at least 1x1 (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("cannot add {0} bottles in one operation")]
    InvalidQuantity(usize),

    #[error("architect mode is required to {0}")]
    ArchitectModeRequired(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lock(#[from] LockError),
}

impl CellarError {
    pub(crate) fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        CellarError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// True for errors that leave the ledger untouched because a precondition failed.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, CellarError::Store(_) | CellarError::Lock(_))
    }
}

pub type Result<T, E = CellarError> = std::result::Result<T, E>;
