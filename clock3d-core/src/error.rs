/// Error types for the clock core
use crate::scene::NodeId;

/// A font resource could not be fetched or decoded.
///
/// Cloneable so a single failed fetch can be observed by every label task
/// that was waiting on it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FontLoadError {
    /// The font source could not be read.
    #[error("failed to read font {id}: {message}")]
    Io {
        /// Font identifier that was requested.
        id: String,
        /// Underlying I/O failure.
        message: String,
    },

    /// The font file is not a valid typeface document.
    #[error("failed to decode font {id}: {message}")]
    Json {
        /// Font identifier that was requested.
        id: String,
        /// Decoder failure.
        message: String,
    },

    /// A glyph outline could not be parsed.
    #[error("malformed outline for glyph {glyph:?}: {message}")]
    Outline {
        /// Glyph whose outline is broken.
        glyph: String,
        /// Parser failure.
        message: String,
    },
}

/// Errors raised by clock model operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    /// A label set must hold either no labels or one per hour.
    #[error("label set must contain 0 or 12 labels, got {len}")]
    InvalidLabelSetLength {
        /// Length of the rejected label set.
        len: usize,
    },

    /// The numeral font failed to load.
    #[error(transparent)]
    FontLoad(#[from] FontLoadError),

    /// A scene node handle no longer refers to a live node.
    #[error("scene node {0:?} not found")]
    NodeNotFound(NodeId),

    /// A label mode name was not recognised.
    #[error("unknown label mode {0:?} (expected numeric, roman or none)")]
    UnknownLabelMode(String),
}
