//! Per-folder backup configuration.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use photobackup_core::types::id::FolderId;
use photobackup_core::types::signal::BackupConnectivity;

/// Which networks a folder's backup may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackupNetworkType {
    /// Only unmetered networks.
    Unmetered,
    /// Any connected network, mobile data included.
    Connected,
}

impl BackupNetworkType {
    /// Map the "use mobile data" toggle onto a network type.
    pub fn from_allow_mobile_data(allow: bool) -> Self {
        if allow { Self::Connected } else { Self::Unmetered }
    }

    /// Whether uploads may run on the given connection.
    pub fn permits(&self, connectivity: BackupConnectivity) -> bool {
        match (self, connectivity) {
            (_, BackupConnectivity::None) => false,
            (Self::Unmetered, BackupConnectivity::Metered) => false,
            _ => true,
        }
    }
}

impl fmt::Display for BackupNetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmetered => write!(f, "UNMETERED"),
            Self::Connected => write!(f, "CONNECTED"),
        }
    }
}

/// User-controlled settings for one folder's backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BackupConfiguration {
    /// The folder these settings apply to.
    pub folder_id: FolderId,
    /// Networks the backup may use.
    pub network_type: BackupNetworkType,
}

impl BackupConfiguration {
    /// Create a configuration.
    pub fn new(folder_id: FolderId, network_type: BackupNetworkType) -> Self {
        Self {
            folder_id,
            network_type,
        }
    }

    /// Whether the "use mobile data" toggle is on.
    pub fn allows_mobile_data(&self) -> bool {
        self.network_type == BackupNetworkType::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmetered_blocks_metered_connection() {
        let unmetered = BackupNetworkType::Unmetered;
        assert!(unmetered.permits(BackupConnectivity::Unmetered));
        assert!(!unmetered.permits(BackupConnectivity::Metered));
        assert!(!unmetered.permits(BackupConnectivity::None));

        let connected = BackupNetworkType::from_allow_mobile_data(true);
        assert!(connected.permits(BackupConnectivity::Metered));
        assert!(!connected.permits(BackupConnectivity::None));
    }
}
