//! Error types produced by the gallery pipeline.
//!
//! Errors are split by how far they are allowed to travel:
//!
//! | Error | Scope | Effect |
//! |-------|-------|--------|
//! | [`ParseError`] | Page | Aborts rendering of the whole page |
//! | [`SourceError`] | Page / config | Aborts the page, or startup when fetching configuration |
//! | [`RecordError`] | Row | Row degrades to an empty record, page continues |
//! | [`SaveError`] | Action | Isolated to one save trigger, user may retry |
//! | [`JumpError`] | Action | Warning shown, no navigation |
//!
//! Only [`ParseError`] and [`SourceError`] convert into [`GalleryError`]; row
//! and action errors have no `From` path into it.
use thiserror::Error;

/// Fatal problems with the tabular text as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// The header row has no cell equal to the required column name.
    #[error("column '{0}' not found in the data header")]
    MissingColumn(String),
}

/// Failure decoding the embedded JSON payload of one row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("JSON payload is not an object")]
    NotAnObject,
}

/// Failure fetching a text resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    /// The remote answered with a non-success status.
    #[error("HTTP {status} {reason}")]
    Http { status: u16, reason: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Transport(String),

    #[error("I/O error reading '{path}': {message}")]
    Io { path: String, message: String },
}

/// Failure of one save request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SaveError {
    #[error("no save endpoint configured")]
    MissingEndpoint,

    /// The endpoint answered, but not with a success status.
    #[error("save endpoint rejected the record: HTTP {0}")]
    Rejected(u16),

    #[error("save request failed: {0}")]
    Transport(String),

    #[error("could not encode record: {0}")]
    Encode(String),
}

/// Rejected jump-to-page input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum JumpError {
    #[error("'{0}' is not a page number")]
    NotANumber(String),

    #[error("page {value} is outside 1..={max}")]
    OutOfRange { value: i64, max: u32 },
}

/// Page-level failure: nothing of the gallery is rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GalleryError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        let err = GalleryError::from(ParseError::MissingColumn("data".into()));
        assert_eq!(err.to_string(), "column 'data' not found in the data header");

        let err = GalleryError::from(SourceError::Http {
            status: 404,
            reason: "Not Found".into(),
        });
        assert_eq!(err.to_string(), "HTTP 404 Not Found");

        assert_eq!(
            SaveError::Rejected(500).to_string(),
            "save endpoint rejected the record: HTTP 500"
        );
    }
}
