//! Persisted and synthesized backup errors.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use photobackup_core::error::AppError;
use photobackup_core::observe::QueryObservable;
use photobackup_core::traits::{ConnectivitySource, PermissionSource};
use photobackup_core::types::error_type::BackupErrorType;
use photobackup_core::types::id::FolderId;
use photobackup_core::types::signal::{BackupConnectivity, BackupPermissions};
use photobackup_entity::configuration::BackupNetworkType;
use photobackup_entity::error::BackupError;
use photobackup_entity::repository::BackupErrorRepository;

use crate::configuration::ConfigurationService;

/// Error history plus the transient problems visible right now.
#[derive(Clone)]
pub struct GetErrors {
    /// Error history.
    error_repo: Arc<dyn BackupErrorRepository>,
    /// Media permission.
    permissions: Arc<dyn PermissionSource>,
    /// Network connectivity.
    connectivity: Arc<dyn ConnectivitySource>,
    /// Folder network requirements.
    configuration: ConfigurationService,
}

impl GetErrors {
    /// Creates a new error use case.
    pub fn new(
        error_repo: Arc<dyn BackupErrorRepository>,
        permissions: Arc<dyn PermissionSource>,
        connectivity: Arc<dyn ConnectivitySource>,
        configuration: ConfigurationService,
    ) -> Self {
        Self {
            error_repo,
            permissions,
            connectivity,
            configuration,
        }
    }

    /// Error types affecting a folder right now, sorted and unique.
    pub async fn execute(&self, folder_id: FolderId) -> Result<Vec<BackupErrorType>, AppError> {
        let persisted = self.error_repo.get_errors(folder_id).await?;
        let configuration = self.configuration.get_configuration(folder_id).await?;
        Ok(merge(
            persisted.iter().map(|error| error.error_type),
            self.permissions.current(),
            self.connectivity.current(),
            configuration.network_type,
        ))
    }

    /// Recorded errors of a folder.
    pub async fn get_errors(&self, folder_id: FolderId) -> Result<Vec<BackupError>, AppError> {
        self.error_repo.get_errors(folder_id).await
    }

    /// Recorded errors now and after every change.
    pub fn observe_errors(&self, folder_id: FolderId) -> QueryObservable<Vec<BackupError>> {
        self.error_repo.observe_errors(folder_id)
    }

    /// Record an error against a folder.
    pub async fn add_error(
        &self,
        folder_id: FolderId,
        error_type: BackupErrorType,
    ) -> Result<(), AppError> {
        self.error_repo
            .insert_error(&BackupError::new(folder_id, error_type))
            .await?;
        info!(folder_id = %folder_id, %error_type, "Backup error recorded");
        Ok(())
    }

    /// Forget a folder's errors.
    pub async fn delete_errors(&self, folder_id: FolderId) -> Result<u64, AppError> {
        self.error_repo.delete_errors(folder_id).await
    }
}

/// Combine recorded error types with those implied by the current signals.
///
/// The result is sorted by type and contains each type once.
pub fn merge(
    persisted: impl IntoIterator<Item = BackupErrorType>,
    permissions: BackupPermissions,
    connectivity: BackupConnectivity,
    network_type: BackupNetworkType,
) -> Vec<BackupErrorType> {
    let mut errors: BTreeSet<BackupErrorType> = persisted.into_iter().collect();

    if !permissions.is_granted() {
        errors.insert(BackupErrorType::Permission);
    }
    match connectivity {
        BackupConnectivity::None => {
            errors.insert(BackupErrorType::Connectivity);
        }
        BackupConnectivity::Metered if !network_type.permits(connectivity) => {
            errors.insert(BackupErrorType::WifiConnectivity);
        }
        _ => {}
    }

    errors.into_iter().collect()
}
