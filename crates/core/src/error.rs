use thiserror::Error;

/// Error type for flash image decomposition.
#[derive(Debug, Error)]
pub enum CarveError {
    /// A slice request exceeded the image bounds. Either the input is corrupt
    /// or a locator/sizer computed an impossible extent.
    #[error("byte range {start:#x}..{end:#x} is out of range for a {len:#x}-byte image")]
    OutOfRange { start: usize, end: usize, len: usize },

    /// A mandatory region anchor or magic number is missing. The image does
    /// not match the expected container format.
    #[error("signature not found: {0}")]
    SignatureNotFound(String),

    /// Two regions resolved to the same offset, which makes the layout
    /// ambiguous.
    #[error("regions \"{first}\" and \"{second}\" both start at offset {offset:#x}")]
    DuplicateOffset { offset: usize, first: String, second: String },

    /// A canonical payload differed from its known-good reference. Only raised
    /// when the caller requires verification to succeed.
    #[error(
        "verification mismatch for \"{region}\": expected {expected_len} bytes, \
         got {actual_len}, first difference at offset {first_diff:#x}"
    )]
    VerificationMismatch {
        region: String,
        expected_len: usize,
        actual_len: usize,
        first_diff: usize,
    },

    /// Underlying I/O error while reading the dump or reference files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for decomposition operations.
pub type CarveResult<T> = Result<T, CarveError>;
