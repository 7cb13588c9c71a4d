//! Last known value of every input to a folder's backup state.

use photobackup_core::types::error_type::BackupErrorType;
use photobackup_core::types::signal::{BackupConnectivity, BackupPermissions};
use photobackup_entity::bucket::BucketEntry;
use photobackup_entity::configuration::BackupNetworkType;
use photobackup_entity::state::{BackupState, BackupStatus};

use crate::error::service::merge;

/// One update from one input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// A binding exists for the folder.
    Enabled(bool),
    /// The destination folder exists.
    FolderExists(bool),
    /// Media permission.
    Permissions(BackupPermissions),
    /// Network connectivity.
    Connectivity(BackupConnectivity),
    /// Eligible buckets.
    Buckets(Vec<BucketEntry>),
    /// Folder network requirement.
    NetworkType(BackupNetworkType),
    /// Progress from file counts.
    Status(BackupStatus),
    /// Recorded error types.
    Errors(Vec<BackupErrorType>),
}

/// Latest value per input. A state can be derived once all are known.
#[derive(Debug, Default)]
pub struct Latest {
    enabled: Option<bool>,
    folder_exists: Option<bool>,
    permissions: Option<BackupPermissions>,
    connectivity: Option<BackupConnectivity>,
    has_default_bucket: Option<bool>,
    network_type: Option<BackupNetworkType>,
    status: Option<BackupStatus>,
    errors: Option<Vec<BackupErrorType>>,
}

impl Latest {
    /// Record an update. Bucket lists are reduced to whether they contain
    /// `default_bucket_name`.
    pub fn apply(&mut self, input: Input, default_bucket_name: &str) {
        match input {
            Input::Enabled(value) => self.enabled = Some(value),
            Input::FolderExists(value) => self.folder_exists = Some(value),
            Input::Permissions(value) => self.permissions = Some(value),
            Input::Connectivity(value) => self.connectivity = Some(value),
            Input::Buckets(buckets) => {
                self.has_default_bucket =
                    Some(buckets.iter().any(|bucket| bucket.is_named(default_bucket_name)))
            }
            Input::NetworkType(value) => self.network_type = Some(value),
            Input::Status(value) => self.status = Some(value),
            Input::Errors(value) => self.errors = Some(value),
        }
    }

    /// Derive the state, or `None` while an input has not reported yet.
    pub fn derive(&self) -> Option<BackupState> {
        let has_default_folder = self.folder_exists? && self.has_default_bucket?;
        let enabled = self.enabled?;
        let permissions = self.permissions?;
        let connectivity = self.connectivity?;
        let network_type = self.network_type?;
        let status = self.status?;
        let errors = self.errors.as_ref()?;

        if !enabled {
            return Some(BackupState::disabled(has_default_folder));
        }

        Some(BackupState {
            is_backup_enabled: true,
            has_default_folder,
            backup_status: Some(status),
            errors: merge(errors.iter().copied(), permissions, connectivity, network_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_inputs(enabled: bool) -> Latest {
        let mut latest = Latest::default();
        for input in [
            Input::Enabled(enabled),
            Input::FolderExists(true),
            Input::Permissions(BackupPermissions::Granted),
            Input::Connectivity(BackupConnectivity::Unmetered),
            Input::Buckets(vec![BucketEntry::new(1, "Camera")]),
            Input::NetworkType(BackupNetworkType::Unmetered),
            Input::Status(BackupStatus::Complete {
                total_backup_photos: 0,
            }),
            Input::Errors(vec![BackupErrorType::Other]),
        ] {
            latest.apply(input, "Camera");
        }
        latest
    }

    #[test]
    fn test_nothing_derived_until_every_input_reported() {
        let mut latest = Latest::default();
        latest.apply(Input::Enabled(true), "Camera");
        latest.apply(Input::FolderExists(true), "Camera");
        assert_eq!(latest.derive(), None);
    }

    #[test]
    fn test_disabled_hides_status_and_errors() {
        let state = all_inputs(false).derive().unwrap();
        assert_eq!(state, BackupState::disabled(true));
    }

    #[test]
    fn test_enabled_merges_errors() {
        let mut latest = all_inputs(true);
        latest.apply(Input::Connectivity(BackupConnectivity::Metered), "Camera");
        let state = latest.derive().unwrap();
        assert!(state.is_backup_enabled);
        assert_eq!(
            state.errors,
            vec![BackupErrorType::WifiConnectivity, BackupErrorType::Other]
        );
    }

    #[test]
    fn test_default_folder_needs_default_bucket() {
        let mut latest = all_inputs(true);
        latest.apply(
            Input::Buckets(vec![BucketEntry::new(2, "Screenshots")]),
            "Camera",
        );
        assert!(!latest.derive().unwrap().has_default_folder);
    }
}
