//! Error types.
//!
//! Configuration problems surface while a grammar is being built ([`GrammarError`],
//! [`LoadError`]); nothing the engine does at run time is fatal. Output back-ends report
//! their own failures through [`RenderError`].

use thiserror::Error;

/// Rejected grammar definitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A second action was bound to a character that already has one.
    #[error("action already defined for symbol '{symbol}'")]
    DuplicateAction { symbol: char },

    /// The action name is not one of the recognized turtle actions.
    #[error("unknown turtle action: {name:?}")]
    UnknownAction { name: String },
}

/// Failures while loading a grammar description.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read grammar file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed grammar JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// One of the mandatory sections (`actions`, `axiom`, `rules`) is absent.
    #[error("missing mandatory field `{0}`")]
    MissingField(&'static str),

    /// A key of `actions` or `rules` is not exactly one character long.
    #[error("symbol keys must be a single character, got {0:?}")]
    InvalidSymbolKey(String),

    /// A key appears twice in the same section.
    #[error("key {key:?} appears more than once in `{section}`")]
    DuplicateKey { section: &'static str, key: String },

    /// A turtle parameter that is not finite, or a step that is not positive.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Failures while producing output.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("i/o error while rendering: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested round count could expand to more leaf evaluations than allowed.
    #[error("expansion may evaluate up to {bound} symbols, limit is {limit}")]
    TooLarge { bound: u128, limit: u128 },

    /// More rounds than the recursion may safely nest.
    #[error("{rounds} rounds exceed the recursion limit of {limit}")]
    TooDeep { rounds: u32, limit: u32 },

    /// A raster target with zero width or height.
    #[error("canvas must have non-zero dimensions, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
}
