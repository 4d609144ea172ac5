use super::items::ItemKey;

/// Errors surfaced by the wrap layout to its host.
///
/// Extent estimation drift is not an error; estimates converge as items get
/// measured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// An index-based call referred to an item that does not exist.
    #[error("index {index} is out of range for a collection of {count} items")]
    InvalidArgument { index: usize, count: usize },

    /// More than one realized container resolved to the same item during
    /// arrangement. Row math is unsound when identity is ambiguous, so the
    /// pass is abandoned.
    #[error("item {key} at index {index} resolves to a container that is already placed")]
    InvariantViolation { key: ItemKey, index: usize },
}

pub type LayoutResult<T> = Result<T, LayoutError>;
