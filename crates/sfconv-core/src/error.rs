//! Error types for container reading and writing.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type for container operations.
pub type SfResult<T> = Result<T, SfError>;

/// Machine-checkable classification of an [`SfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad tag or signature.
    Format,
    /// Unexpected end of stream.
    TruncatedFile,
    /// Non-monotonic indices, length-budget mismatch, section ordering.
    StructuralIntegrity,
    /// Encode/decode backend failure.
    Codec,
    /// Filesystem or stream failure.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format => write!(f, "format"),
            Self::TruncatedFile => write!(f, "truncated file"),
            Self::StructuralIntegrity => write!(f, "structural integrity"),
            Self::Codec => write!(f, "codec"),
            Self::Io => write!(f, "I/O"),
        }
    }
}

/// Errors that can occur while reading or writing a SoundFont container.
///
/// None of these are recoverable at the point they are raised: a failed read
/// yields no container, and a failed write leaves the output incomplete.
#[derive(Debug, Error)]
pub enum SfError {
    /// Bad tag or signature.
    #[error("format error: {message}")]
    Format {
        /// Error message.
        message: String,
    },

    /// The stream ended before the declared data.
    #[error("unexpected end of file: {context}")]
    Truncated {
        /// What was being read when the stream ended.
        context: String,
    },

    /// The container contradicts itself.
    #[error("structural integrity error: {message}")]
    Structure {
        /// Error message.
        message: String,
    },

    /// Codec backend failure.
    #[error("{codec} codec error: {message}")]
    Codec {
        /// Backend name.
        codec: &'static str,
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SfError {
    /// Creates a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Creates a truncated-file error.
    pub fn truncated(context: impl Into<String>) -> Self {
        Self::Truncated {
            context: context.into(),
        }
    }

    /// Creates a structural integrity error.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure {
            message: message.into(),
        }
    }

    /// Creates a codec error.
    pub fn codec(codec: &'static str, message: impl Into<String>) -> Self {
        Self::Codec {
            codec,
            message: message.into(),
        }
    }

    /// Maps a read failure, turning an early end of stream into [`SfError::Truncated`].
    pub(crate) fn from_read(err: io::Error, context: impl Into<String>) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::truncated(context)
        } else {
            Self::Io(err)
        }
    }

    /// Returns the error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SfError::Format { .. } => ErrorKind::Format,
            SfError::Truncated { .. } => ErrorKind::TruncatedFile,
            SfError::Structure { .. } => ErrorKind::StructuralIntegrity,
            SfError::Codec { .. } => ErrorKind::Codec,
            SfError::Io(_) => ErrorKind::Io,
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Format => "SF_001",
            ErrorKind::TruncatedFile => "SF_002",
            ErrorKind::StructuralIntegrity => "SF_003",
            ErrorKind::Codec => "SF_004",
            ErrorKind::Io => "SF_005",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_code() {
        let err = SfError::structure("generator indices not monotonic");
        assert_eq!(err.kind(), ErrorKind::StructuralIntegrity);
        assert_eq!(err.code(), "SF_003");
        assert!(err.to_string().contains("not monotonic"));
    }

    #[test]
    fn test_eof_maps_to_truncated() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let err = SfError::from_read(io_err, "shdr record");
        assert_eq!(err.kind(), ErrorKind::TruncatedFile);
        assert!(err.to_string().contains("shdr record"));
    }

    #[test]
    fn test_other_io_stays_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = SfError::from_read(io_err, "header");
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.code(), "SF_005");
    }

    #[test]
    fn test_codec_helper() {
        let err = SfError::codec("vorbis", "encoder rejected input");
        assert_eq!(err.kind(), ErrorKind::Codec);
        assert_eq!(err.to_string(), "vorbis codec error: encoder rejected input");
    }
}
