//! Backup configuration lookup with configured defaults.

use std::sync::Arc;

use futures::StreamExt;
use tracing::info;

use photobackup_core::config::BackupConfig;
use photobackup_core::error::AppError;
use photobackup_core::observe::QueryObservable;
use photobackup_core::types::id::FolderId;
use photobackup_entity::configuration::{BackupConfiguration, BackupNetworkType};
use photobackup_entity::repository::BackupConfigurationRepository;

/// Reads and updates folder configurations.
///
/// A folder that was never configured gets the network type implied by
/// `[backup] allow_mobile_data`.
#[derive(Clone)]
pub struct ConfigurationService {
    /// Saved configurations.
    repo: Arc<dyn BackupConfigurationRepository>,
    /// Network type for unconfigured folders.
    default_network_type: BackupNetworkType,
}

impl ConfigurationService {
    /// Creates a new configuration service.
    pub fn new(repo: Arc<dyn BackupConfigurationRepository>, config: &BackupConfig) -> Self {
        Self {
            repo,
            default_network_type: BackupNetworkType::from_allow_mobile_data(
                config.allow_mobile_data,
            ),
        }
    }

    /// Effective configuration of a folder.
    pub async fn get_configuration(
        &self,
        folder_id: FolderId,
    ) -> Result<BackupConfiguration, AppError> {
        let saved = self.repo.get_configuration(folder_id).await?;
        Ok(self.or_default(folder_id, saved))
    }

    /// Effective configuration now and after every change.
    pub fn observe_configuration(
        &self,
        folder_id: FolderId,
    ) -> QueryObservable<BackupConfiguration> {
        let default_network_type = self.default_network_type;
        self.repo
            .observe_configuration(folder_id)
            .map(move |saved| {
                saved.map(|saved| {
                    saved.unwrap_or_else(|| {
                        BackupConfiguration::new(folder_id, default_network_type)
                    })
                })
            })
            .boxed()
    }

    /// Save a folder's network type.
    pub async fn update_configuration(
        &self,
        folder_id: FolderId,
        network_type: BackupNetworkType,
    ) -> Result<(), AppError> {
        self.repo
            .upsert_configuration(&BackupConfiguration::new(folder_id, network_type))
            .await?;
        info!(folder_id = %folder_id, %network_type, "Backup configuration updated");
        Ok(())
    }

    /// Save the "use mobile data" toggle.
    pub async fn set_allow_mobile_data(
        &self,
        folder_id: FolderId,
        allow: bool,
    ) -> Result<(), AppError> {
        self.update_configuration(folder_id, BackupNetworkType::from_allow_mobile_data(allow))
            .await
    }

    fn or_default(
        &self,
        folder_id: FolderId,
        saved: Option<BackupConfiguration>,
    ) -> BackupConfiguration {
        saved.unwrap_or_else(|| BackupConfiguration::new(folder_id, self.default_network_type))
    }
}
