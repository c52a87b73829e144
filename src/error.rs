//! Error taxonomy shared by the map, its views and their cursors.

/// Contract violations reported by map, view and cursor operations.
///
/// Every error is detected eagerly at the offending call. Nothing is
/// retried; only `put_all` may have mutated the map before failing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// A source map enumerated a key it could not resolve to a value.
    #[error("absent key or value where a mapping was required")]
    NullArgument,
    /// `add`/`add_all` on a view; views cannot originate mappings.
    #[error("operation not supported by a map view")]
    Unsupported,
    /// Cursor `remove` without a preceding successful `next`.
    #[error("remove() called without a preceding next()")]
    InvalidState,
    /// Cursor `next` with no remaining elements.
    #[error("cursor has no remaining elements")]
    Exhausted,
    /// An element could not be stored in the destination array.
    #[error("array component type cannot hold a collection element")]
    ArrayTypeMismatch,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
