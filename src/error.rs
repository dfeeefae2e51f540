use core::fmt;

/// Error returned by container operations when they are misused or
/// misconfigured.
///
/// Expected misses (looking up a key that isn't present, removing a handle
/// that was already removed from a heap, etc.) are never reported through this
/// type: they are part of the normal return value of the operation.
///
/// None of these errors are meant to be retried. When an operation returns an
/// error, the container it was called on has not been modified.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A growth strategy returned a size smaller than the minimum that was
    /// requested from it.
    ///
    /// This indicates a broken custom [`GrowthStrategy`].
    ///
    /// [`GrowthStrategy`]: crate::GrowthStrategy
    GrowthFailure {
        /// The minimum size that was requested.
        requested: usize,
        /// The size that the strategy returned.
        granted: usize,
    },

    /// A handle was used which is not currently allocated: it was already
    /// released or was never handed out.
    InvalidHandle {
        /// Index of the offending handle.
        index: usize,
    },

    /// A sequence passed alongside another one doesn't have the expected
    /// length, or fewer sequences were given than were declared.
    ShapeMismatch {
        /// The expected length or count.
        expected: usize,
        /// The actual length or count.
        found: usize,
    },

    /// A sub-range extends past the end of the sequence it refers to.
    OutOfBounds {
        /// Exclusive end of the requested range.
        end: usize,
        /// Length of the sequence.
        len: usize,
    },

    /// An entry was removed from a list which it is not a member of.
    NotInList {
        /// Index of the list head.
        list: usize,
        /// Index of the entry.
        entry: usize,
    },

    /// A container was constructed with invalid parameters.
    InvalidConfig(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::GrowthFailure { requested, granted } => write!(
                f,
                "growth strategy returned {granted} which is less than the requested {requested}"
            ),
            Error::InvalidHandle { index } => write!(f, "handle {index} is not allocated"),
            Error::ShapeMismatch { expected, found } => {
                write!(f, "expected a length of {expected}, found {found}")
            }
            Error::OutOfBounds { end, len } => {
                write!(f, "range end {end} is out of bounds for length {len}")
            }
            Error::NotInList { list, entry } => {
                write!(f, "entry {entry} is not a member of list {list}")
            }
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl core::error::Error for Error {}
