//! Errors reported by the value model.

use core::fmt::{self, Debug, Display};
use core::result;
use serde::{de, ser};
use std::error;
use std::string::{String, ToString};

/// This type represents all the recoverable failures of the value model:
/// positional access beyond the end of a container, arena exhaustion,
/// container operations applied to the wrong kind of value, and errors
/// raised through the serde bridge.
pub struct Error {
    /// Boxed to keep `Result<T, Error>` one word wide on the happy path.
    err: Box<ErrorImpl>,
}

/// Alias for a `Result` with the error type `jsontree::Error`.
pub type Result<T> = result::Result<T, Error>;

impl Error {
    /// Categorizes the cause of this error.
    ///
    /// - `Category::OutOfRange` - positional access beyond the container size
    /// - `Category::Alloc` - the backing allocator could not satisfy a request
    /// - `Category::Type` - a container operation on a value of another kind
    /// - `Category::Data` - a custom message raised through serde
    pub fn classify(&self) -> Category {
        self.code().classify()
    }

    /// Returns true if this error was caused by an out-of-range positional
    /// access such as `Array::at`.
    pub fn is_out_of_range(&self) -> bool {
        self.classify() == Category::OutOfRange
    }

    /// Returns true if this error was caused by an allocation failure.
    pub fn is_alloc(&self) -> bool {
        self.classify() == Category::Alloc
    }

    /// Returns true if a container operation was applied to a value of the
    /// wrong kind, e.g. `push` on an object.
    pub fn is_type(&self) -> bool {
        self.classify() == Category::Type
    }

    /// Returns true if this error carries a custom message.
    pub fn is_data(&self) -> bool {
        self.classify() == Category::Data
    }

    pub(crate) fn code(&self) -> &ErrorCode {
        &self.err.code
    }

    #[cold]
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        Error::from(ErrorCode::IndexOutOfRange { index, len })
    }

    #[cold]
    pub(crate) fn alloc_failed(size: usize) -> Self {
        Error::from(ErrorCode::AllocFailed { size })
    }

    #[cold]
    pub(crate) fn not_an_array() -> Self {
        Error::from(ErrorCode::NotAnArray)
    }

    #[cold]
    pub(crate) fn not_an_object() -> Self {
        Error::from(ErrorCode::NotAnObject)
    }
}

/// Categorizes the cause of a `jsontree::Error`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Category {
    /// A positional accessor was given an index at or beyond the size of the
    /// container.
    OutOfRange,

    /// The allocator backing the value refused an allocation.
    Alloc,

    /// The value does not hold the kind of container the operation needs.
    Type,

    /// A custom message, usually raised while converting to or from another
    /// data format through serde.
    Data,
}

struct ErrorImpl {
    code: ErrorCode,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ErrorCode {
    /// Catchall for custom messages
    #[error("{0}")]
    Message(Box<str>),

    #[error("Invalid array subscript: index {index} is out of range for size {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Allocation of {size} bytes failed")]
    AllocFailed { size: usize },

    #[error("Not an array")]
    NotAnArray,

    #[error("Not an object")]
    NotAnObject,
}

impl ErrorCode {
    pub fn classify(&self) -> Category {
        match self {
            ErrorCode::Message(_) => Category::Data,
            ErrorCode::IndexOutOfRange { .. } => Category::OutOfRange,
            ErrorCode::AllocFailed { .. } => Category::Alloc,
            ErrorCode::NotAnArray | ErrorCode::NotAnObject => Category::Type,
        }
    }
}

impl From<ErrorCode> for Error {
    #[cold]
    fn from(code: ErrorCode) -> Self {
        Error {
            err: Box::new(ErrorImpl { code }),
        }
    }
}

impl error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.err.code, f)
    }
}

// Remove two layers of verbosity from the debug representation. Humans often
// end up seeing this representation because it is what unwrap() shows.
impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Error({:?}, category: {:?})",
            self.err.code.to_string(),
            self.classify()
        )
    }
}

impl de::Error for Error {
    #[cold]
    fn custom<T: Display>(msg: T) -> Error {
        make_error(msg.to_string())
    }

    #[cold]
    fn invalid_type(unexp: de::Unexpected, exp: &dyn de::Expected) -> Self {
        if let de::Unexpected::Unit = unexp {
            Error::custom(format_args!("invalid type: null, expected {}", exp))
        } else {
            Error::custom(format_args!("invalid type: {}, expected {}", unexp, exp))
        }
    }
}

impl ser::Error for Error {
    #[cold]
    fn custom<T: Display>(msg: T) -> Error {
        make_error(msg.to_string())
    }
}

#[cold]
pub(crate) fn make_error(msg: String) -> Error {
    Error::from(ErrorCode::Message(msg.into_boxed_str()))
}
