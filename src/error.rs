use thiserror::Error;

use crate::options::FieldKind;

/// Everything that can go wrong while resolving a locale or formatting
/// through it. Engine failures are carried through unchanged; nothing in
/// this crate retries or papers over them, and a failed field-table
/// computation is never cached.
#[derive(Debug, Error)]
pub enum FormatError {
    /// None of the configuration strings parsed as a locale the formatting
    /// engine accepts.
    #[error("formatting engine rejected locale {0:?}")]
    InvalidLocale(String),

    /// Data load or write failure inside the formatting engine.
    #[error("formatting engine error: {0}")]
    Engine(String),

    #[error("unknown time zone {0:?}")]
    UnknownZone(String),

    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The decomposed output contained no part of the requested kind. This
    /// means the field options were built without asking the engine to
    /// produce that field, which is a caller bug; returning an empty string
    /// instead would poison the name tables for the life of the process.
    #[error("formatted output has no {0:?} part")]
    MissingPart(FieldKind),

    /// Non-finite input to the number formatter.
    #[error("{0} cannot be formatted as a decimal")]
    InvalidNumber(f64),

    /// A field/width combination the engine has no rendition for, such as
    /// numeric weekday names.
    #[error("unsupported formatting options: {0}")]
    Unsupported(&'static str),
}
