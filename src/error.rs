//! Structured error taxonomy.
//!
//! Only the two data-facing error classes are represented here. Indicator
//! domain errors (e.g. subtracting from an empty accumulator) and
//! extract-from-empty are programmer-error/assertion-class conditions and
//! are checked with `debug_assert!` at the call site instead of surfacing
//! through this enum.

#[derive(Debug, Clone, thiserror::Error)]
pub enum WindowError {
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),
}

pub type Result<T> = std::result::Result<T, WindowError>;
