//! Platform signals the backup depends on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grant state of the media access permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupPermissions {
    /// Access is granted.
    Granted,
    /// The user refused access.
    Denied,
    /// The user has not been asked yet.
    #[default]
    NotAsked,
}

impl BackupPermissions {
    /// Whether media may be read.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl fmt::Display for BackupPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
            Self::NotAsked => write!(f, "not_asked"),
        }
    }
}

/// Classification of the current network connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupConnectivity {
    /// An unmetered connection (Wi-Fi, Ethernet).
    Unmetered,
    /// A metered connection (mobile data).
    Metered,
    /// No connection.
    #[default]
    None,
}

impl BackupConnectivity {
    /// Whether any connection is available.
    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for BackupConnectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmetered => write!(f, "unmetered"),
            Self::Metered => write!(f, "metered"),
            Self::None => write!(f, "none"),
        }
    }
}
