use thiserror::Error;

use crate::model::{OpId, Token};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The analysis itself is total: unknown operation shapes and unresolvable symbols are skipped
/// without producing an error. Errors are reserved for the construction of the semantic model
/// (dangling tokens, operation nodes attached twice), for configuration parsing, and for
/// cooperative cancellation.
///
/// # Error Categories
///
/// ## Model Construction Errors
/// - [`Error::InvalidToken`] - A token does not reference a symbol of the expected table
/// - [`Error::InvalidOperation`] - An operation id does not reference a node of the tree
/// - [`Error::Malformed`] - The operation tree or symbol graph is structurally inconsistent
///
/// ## Runtime Errors
/// - [`Error::Cancelled`] - The analysis was cancelled through a [`crate::CancellationToken`]
/// - [`Error::Config`] - An analyzer option could not be parsed
///
/// # Examples
///
/// ```rust
/// use copyscope::{Error, model::{SymbolTable, Token}};
///
/// let symbols = SymbolTable::new();
/// match symbols.type_symbol(Token::new(0x0200_0001)) {
///     Err(Error::InvalidToken(token)) => println!("no type at {}", token),
///     Err(e) => println!("other error: {}", e),
///     Ok(ty) => println!("found {}", ty.name),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The analysis of the current node was cancelled.
    ///
    /// Raised as soon as a [`crate::CancellationToken`] is observed to be cancelled during
    /// a recursive descent. No finding of the interrupted node is ever reported.
    #[error("Analysis was cancelled")]
    Cancelled,

    /// A token did not resolve to a symbol of the expected kind.
    ///
    /// Returned by the symbol table lookups and by the `add_*` methods when a referenced
    /// containing symbol does not exist.
    #[error("Invalid token - {0}")]
    InvalidToken(Token),

    /// An operation id did not resolve to a node of the operation tree.
    #[error("Invalid operation - {0}")]
    InvalidOperation(OpId),

    /// The semantic model is damaged and could not be used.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An analyzer option had an unrecognised value.
    #[error("Invalid configuration - {0}")]
    Config(String),
}
