//! Folder and file lifecycle operations.

mod helpers;

use helpers::{TestBackup, backup_file};

use photobackup_core::events::{BackupEvent, BackupStopReason, EventPayload};
use photobackup_core::types::error_type::BackupErrorType;
use photobackup_core::types::id::FolderId;
use photobackup_entity::configuration::BackupNetworkType;
use photobackup_entity::file::BackupFileState;
use photobackup_entity::folder::BackupFolder;
use photobackup_service::manager::BackupRunState;

#[tokio::test]
async fn test_delete_folders_clears_files_and_cancels_work() {
    let test = TestBackup::new().await;
    let folder_id = FolderId::new();
    test.services
        .folders
        .add_folder(BackupFolder::new(1, folder_id))
        .await
        .unwrap();
    test.services
        .folders
        .add_folder(BackupFolder::new(2, folder_id))
        .await
        .unwrap();
    test.services
        .files
        .set_files(vec![backup_file(folder_id, "a", BackupFileState::Idle)])
        .await
        .unwrap();
    let mut events = test.events.subscribe();

    test.services.folders.delete_folders(folder_id).await.unwrap();

    assert!(!test.services.folders.has_folders(folder_id).await.unwrap());
    assert!(test.services.files.get_files(folder_id).await.unwrap().is_empty());
    assert_eq!(test.scheduler.cancelled(), vec![folder_id]);
    assert_eq!(
        test.services.manager.run_state(folder_id),
        Some(BackupRunState::Stopped)
    );

    let mut payloads = Vec::new();
    while let Ok(event) = events.try_recv() {
        payloads.push(event.payload);
    }
    assert!(payloads.iter().any(|p| matches!(
        p,
        EventPayload::Backup(BackupEvent::Stopped {
            reason: BackupStopReason::Disabled,
            ..
        })
    )));
    assert!(payloads.iter().any(|p| matches!(
        p,
        EventPayload::Backup(BackupEvent::Disabled { .. })
    )));
}

#[tokio::test]
async fn test_set_files_keeps_progress_and_reset_failed_requeues() {
    let test = TestBackup::new().await;
    let folder_id = FolderId::new();
    let files = &test.services.files;

    files
        .set_files(vec![
            backup_file(folder_id, "a", BackupFileState::Idle),
            backup_file(folder_id, "b", BackupFileState::Idle),
        ])
        .await
        .unwrap();
    assert!(files.mark_as_enqueued(folder_id, "a").await.unwrap());
    assert!(files.mark_as_failed(folder_id, "b").await.unwrap());
    assert!(!files.mark_as_completed(folder_id, "missing").await.unwrap());

    let inserted = files
        .set_files(vec![
            backup_file(folder_id, "a", BackupFileState::Idle),
            backup_file(folder_id, "c", BackupFileState::Idle),
        ])
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    assert_eq!(files.reset_failed(folder_id).await.unwrap(), 1);
    let states: Vec<_> = files
        .get_files(folder_id)
        .await
        .unwrap()
        .into_iter()
        .map(|f| (f.uri_string, f.state))
        .collect();
    assert!(states.contains(&("a".to_string(), BackupFileState::Enqueued)));
    assert!(states.contains(&("b".to_string(), BackupFileState::Idle)));
    assert!(states.contains(&("c".to_string(), BackupFileState::Idle)));

    assert!(files.delete_file(folder_id, "c").await.unwrap());
    assert!(!files.delete_file(folder_id, "c").await.unwrap());
}

#[tokio::test]
async fn test_configuration_defaults_until_saved() {
    let test = TestBackup::new().await;
    let folder_id = FolderId::new();
    let configuration = &test.services.configuration;

    let default = configuration.get_configuration(folder_id).await.unwrap();
    assert_eq!(default.network_type, BackupNetworkType::Unmetered);

    configuration
        .update_configuration(folder_id, BackupNetworkType::Connected)
        .await
        .unwrap();
    let saved = configuration.get_configuration(folder_id).await.unwrap();
    assert!(saved.allows_mobile_data());
}

#[tokio::test]
async fn test_get_errors_merges_signals() {
    let test = TestBackup::new().await;
    let folder_id = FolderId::new();
    test.services
        .errors
        .add_error(folder_id, BackupErrorType::LocalStorage)
        .await
        .unwrap();
    test.services
        .connectivity
        .set(photobackup_core::types::signal::BackupConnectivity::None);

    let errors = test.services.errors.execute(folder_id).await.unwrap();
    assert_eq!(
        errors,
        vec![BackupErrorType::LocalStorage, BackupErrorType::Connectivity]
    );
    assert_eq!(test.services.errors.delete_errors(folder_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_restore_marks_persisted_folders_running() {
    let test = TestBackup::new().await;
    let folder_id = FolderId::new();
    test.services
        .folders
        .add_folder(BackupFolder::new(1, folder_id))
        .await
        .unwrap();

    // A fresh manager, as after a restart.
    let manager = photobackup_service::BackupManager::new(
        test.repos.folders.clone(),
        test.events.clone(),
    );
    assert_eq!(manager.restore().await.unwrap(), 1);
    assert!(manager.is_running(folder_id).await.unwrap());
}
