//! Failure causes reported by the upload pipeline.
//!
//! The upload pipeline owns the transport, crypto, and verification steps;
//! this module only models the shape of what comes back out of it when an
//! upload attempt fails.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote API error codes with a backup-specific meaning.
pub mod api_code {
    /// The account's storage quota is exhausted.
    pub const INSUFFICIENT_QUOTA: u32 = 200_001;
    /// The volume has no space left for the upload.
    pub const INSUFFICIENT_SPACE: u32 = 200_002;
    /// The account may not upload into the photos volume.
    pub const PHOTOS_UPLOAD_NOT_ALLOWED: u32 = 200_301;
}

/// HTTP status returned by the remote API when storage is exhausted.
pub const HTTP_INSUFFICIENT_STORAGE: u16 = 507;

/// The cause of a failed upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum UploadFailure {
    /// The remote API rejected the request.
    #[error("API error: {0}")]
    Api(ApiFailure),
    /// The network was unusable for the upload.
    #[error("Network error: {0}")]
    Network(NetworkFailure),
    /// Reading the local file failed.
    #[error("I/O error ({kind:?}): {message}")]
    Io {
        /// What went wrong.
        kind: IoFailureKind,
        /// Detail from the underlying error.
        message: String,
    },
    /// Encrypting or signing the content failed.
    #[error("Crypto error: {0}")]
    Crypto(String),
    /// Post-upload block verification failed.
    #[error("Verification error: {0}")]
    Verification(String),
    /// The platform denied access to the media item.
    #[error("Permission denied: {0}")]
    Permission(String),
    /// A record the upload depended on disappeared mid-flight.
    #[error("Missing element: {0}")]
    MissingElement(String),
    /// A failure with no relation to the backup (programming errors,
    /// cancellations, assertion failures).
    #[error("{0}")]
    Unrelated(String),
}

/// Details of a remote API rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("HTTP {status} (code {code:?}): {message}")]
pub struct ApiFailure {
    /// HTTP status code.
    pub status: u16,
    /// Application-level error code, if the response carried one.
    pub code: Option<u32>,
    /// Message from the response body.
    pub message: String,
}

/// Why the network was unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum NetworkFailure {
    /// No connection at all.
    #[error("network unavailable")]
    Unavailable,
    /// Only a metered connection is available but the upload requires an
    /// unmetered one.
    #[error("unmetered network required")]
    UnmeteredRequired,
}

/// Kinds of local I/O failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IoFailureKind {
    /// The source file no longer exists on the device.
    NotFound,
    /// The device has no space left for temporary upload blocks.
    NoSpaceLeft,
    /// A socket-level failure surfaced as I/O.
    Network,
    /// Anything else.
    Other,
}

impl UploadFailure {
    /// Shorthand for a missing source file.
    pub fn file_not_found(message: impl Into<String>) -> Self {
        Self::Io {
            kind: IoFailureKind::NotFound,
            message: message.into(),
        }
    }

    /// Shorthand for an API rejection.
    pub fn api(status: u16, code: Option<u32>, message: impl Into<String>) -> Self {
        Self::Api(ApiFailure {
            status,
            code,
            message: message.into(),
        })
    }
}

impl From<std::io::Error> for UploadFailure {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let kind = match err.kind() {
            ErrorKind::NotFound => IoFailureKind::NotFound,
            ErrorKind::StorageFull => IoFailureKind::NoSpaceLeft,
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::TimedOut
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable => IoFailureKind::Network,
            ErrorKind::PermissionDenied => return Self::Permission(err.to_string()),
            _ => IoFailureKind::Other,
        };
        Self::Io {
            kind,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            UploadFailure::from(missing),
            UploadFailure::Io {
                kind: IoFailureKind::NotFound,
                ..
            }
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert!(matches!(
            UploadFailure::from(denied),
            UploadFailure::Permission(_)
        ));

        let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "rst");
        assert!(matches!(
            UploadFailure::from(reset),
            UploadFailure::Io {
                kind: IoFailureKind::Network,
                ..
            }
        ));
    }
}
