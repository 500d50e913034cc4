//! Parse errors for the scene description format (§6.1, §7 "Parse").

use thiserror::Error;

/// A malformed scene description file. Unlike the loader's own referential/
/// structural errors (§7), a parse failure here is fatal to reading the
/// file at all — there is no partial scene to keep loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// An unexpected token or end of input at a given line.
    #[error("line {line}: unexpected token {found:?}, expected {expected}")]
    UnexpectedToken {
        /// 1-based line number.
        line: usize,
        /// The token actually found.
        found: String,
        /// What was expected instead.
        expected: &'static str,
    },
    /// A quoted string was never closed.
    #[error("line {line}: unterminated string literal")]
    UnterminatedString {
        /// 1-based line number.
        line: usize,
    },
    /// An object kind tag was not one of the reserved kinds (§6.1).
    #[error("line {line}: unknown object kind {kind:?}")]
    UnknownKind {
        /// 1-based line number.
        line: usize,
        /// The offending kind text.
        kind: String,
    },
    /// A `camera`/`technique` object was declared more than once.
    #[error("duplicate {kind} declaration (scene allows exactly one)")]
    DuplicateSingleton {
        /// Either `"camera"` or `"technique"`.
        kind: &'static str,
    },
}
