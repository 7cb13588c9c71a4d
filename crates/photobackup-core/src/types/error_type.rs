//! Classified backup error types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of a failure that affects a folder's backup.
///
/// Variants are ordered so that a list of errors sorts with the conditions
/// needing user action first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackupErrorType {
    /// Media access permission is missing.
    Permission,
    /// The device ran out of local storage.
    LocalStorage,
    /// The remote storage quota is exhausted.
    DriveStorage,
    /// The account is not allowed to upload photos.
    PhotosUploadNotAllowed,
    /// No network connection.
    Connectivity,
    /// Only a metered connection is available and mobile data is disallowed.
    WifiConnectivity,
    /// Any other failure.
    Other,
}

impl BackupErrorType {
    /// All variants, in sort order.
    pub const ALL: [BackupErrorType; 7] = [
        Self::Permission,
        Self::LocalStorage,
        Self::DriveStorage,
        Self::PhotosUploadNotAllowed,
        Self::Connectivity,
        Self::WifiConnectivity,
        Self::Other,
    ];

    /// Whether this condition halts the whole folder until the user acts.
    pub fn stops_backup(&self) -> bool {
        matches!(
            self,
            Self::Permission | Self::LocalStorage | Self::DriveStorage | Self::PhotosUploadNotAllowed
        )
    }

    /// Whether the condition clears by itself once the environment recovers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity | Self::WifiConnectivity | Self::Other)
    }

    /// Return the type as an upper-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permission => "PERMISSION",
            Self::LocalStorage => "LOCAL_STORAGE",
            Self::DriveStorage => "DRIVE_STORAGE",
            Self::PhotosUploadNotAllowed => "PHOTOS_UPLOAD_NOT_ALLOWED",
            Self::Connectivity => "CONNECTIVITY",
            Self::WifiConnectivity => "WIFI_CONNECTIVITY",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for BackupErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackupErrorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown backup error type: {s}"))
    }
}
