//! Upload failure recovery policy.

mod helpers;

use std::sync::Arc;

use helpers::{FailingErrors, TestBackup, backup_file};

use photobackup_core::events::{EventPayload, UploadError, UploadFileLink};
use photobackup_core::types::error_type::BackupErrorType;
use photobackup_core::types::failure::{NetworkFailure, UploadFailure, api_code};
use photobackup_core::types::id::FolderId;
use photobackup_entity::file::BackupFileState;
use photobackup_entity::folder::BackupFolder;
use photobackup_entity::repository::BackupFileRepository;
use photobackup_service::StopBackup;
use photobackup_service::manager::BackupRunState;

fn upload_error(folder_id: FolderId, uri: Option<&str>, cause: UploadFailure) -> UploadError {
    UploadError::new(
        UploadFileLink {
            id: 1,
            parent_folder_id: folder_id,
            uri_string: uri.map(str::to_string),
            name: "photo.jpg".to_string(),
        },
        cause,
    )
}

async fn enabled_folder(test: &TestBackup) -> FolderId {
    let folder_id = FolderId::new();
    test.services
        .folders
        .add_folder(BackupFolder::new(1, folder_id))
        .await
        .unwrap();
    test.services
        .files
        .set_files(vec![
            backup_file(folder_id, "uri1", BackupFileState::Enqueued),
            backup_file(folder_id, "uri2", BackupFileState::Enqueued),
        ])
        .await
        .unwrap();
    folder_id
}

#[tokio::test]
async fn test_file_not_found_deletes_record_without_stopping() {
    let test = TestBackup::new().await;
    let folder_id = enabled_folder(&test).await;

    test.services
        .upload_errors
        .on_error(&upload_error(
            folder_id,
            Some("uri1"),
            UploadFailure::file_not_found("gone"),
        ))
        .await;

    assert!(
        test.repos
            .files
            .get_file(folder_id, "uri1")
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(
        test.services.manager.run_state(folder_id),
        Some(BackupRunState::Running)
    );
    assert!(test.services.errors.get_errors(folder_id).await.unwrap().is_empty());
    assert_eq!(test.scheduler.notified(), vec![folder_id]);
}

#[tokio::test]
async fn test_drive_storage_stops_backup_and_records_error() {
    let test = TestBackup::new().await;
    let folder_id = enabled_folder(&test).await;

    test.services
        .upload_errors
        .on_error(&upload_error(
            folder_id,
            Some("uri1"),
            UploadFailure::api(422, Some(api_code::INSUFFICIENT_QUOTA), "quota"),
        ))
        .await;

    assert_eq!(
        test.services.manager.run_state(folder_id),
        Some(BackupRunState::Stopped)
    );
    let errors = test.services.errors.get_errors(folder_id).await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_type, BackupErrorType::DriveStorage);
    assert!(!errors[0].retryable);
    assert_eq!(test.scheduler.notified(), vec![folder_id]);
    assert!(test.scheduler.cancelled().is_empty());

    let file = test.repos.files.get_file(folder_id, "uri1").await.unwrap().unwrap();
    assert_eq!(file.state, BackupFileState::Enqueued);
}

#[tokio::test]
async fn test_concurrent_drive_storage_stops_once() {
    let test = TestBackup::new().await;
    let folder_id = enabled_folder(&test).await;
    let handler = Arc::clone(&test.services.upload_errors);
    let mut events = test.events.subscribe();

    let first = upload_error(
        folder_id,
        Some("uri1"),
        UploadFailure::api(422, Some(api_code::INSUFFICIENT_SPACE), "space"),
    );
    let second = upload_error(
        folder_id,
        Some("uri2"),
        UploadFailure::api(507, None, "insufficient storage"),
    );

    let (a, b) = {
        let h1 = Arc::clone(&handler);
        let h2 = Arc::clone(&handler);
        tokio::join!(
            tokio::spawn(async move { h1.on_error(&first).await }),
            tokio::spawn(async move { h2.on_error(&second).await }),
        )
    };
    a.unwrap();
    b.unwrap();

    assert_eq!(test.scheduler.notified().len(), 2);
    assert_eq!(test.services.errors.get_errors(folder_id).await.unwrap().len(), 1);

    let mut stops = 0;
    while let Ok(event) = events.try_recv() {
        if let EventPayload::Backup(photobackup_core::events::BackupEvent::Stopped { .. }) =
            event.payload
        {
            stops += 1;
        }
    }
    assert_eq!(stops, 1);
}

#[tokio::test]
async fn test_other_failure_marks_single_file_failed() {
    let test = TestBackup::new().await;
    let folder_id = enabled_folder(&test).await;

    test.services
        .upload_errors
        .on_error(&upload_error(
            folder_id,
            Some("uri2"),
            UploadFailure::Crypto("signature".to_string()),
        ))
        .await;

    let failed = test.repos.files.get_file(folder_id, "uri2").await.unwrap().unwrap();
    let untouched = test.repos.files.get_file(folder_id, "uri1").await.unwrap().unwrap();
    assert_eq!(failed.state, BackupFileState::Failed);
    assert_eq!(untouched.state, BackupFileState::Enqueued);
    assert_eq!(
        test.services.manager.run_state(folder_id),
        Some(BackupRunState::Running)
    );
}

#[tokio::test]
async fn test_other_failure_without_uri_changes_nothing() {
    let test = TestBackup::new().await;
    let folder_id = enabled_folder(&test).await;

    test.services
        .upload_errors
        .on_error(&upload_error(
            folder_id,
            None,
            UploadFailure::Verification("block mismatch".to_string()),
        ))
        .await;

    let counts = test.repos.files.count_by_state(folder_id).await.unwrap();
    assert_eq!(counts.failed, 0);
    assert_eq!(test.scheduler.notified(), vec![folder_id]);
}

#[tokio::test]
async fn test_connectivity_failure_only_notifies() {
    let test = TestBackup::new().await;
    let folder_id = enabled_folder(&test).await;

    test.services
        .upload_errors
        .on_error(&upload_error(
            folder_id,
            Some("uri1"),
            UploadFailure::Network(NetworkFailure::UnmeteredRequired),
        ))
        .await;

    assert_eq!(test.scheduler.notified(), vec![folder_id]);
    assert!(test.scheduler.cancelled().is_empty());
    assert!(test.services.errors.get_errors(folder_id).await.unwrap().is_empty());
    let file = test.repos.files.get_file(folder_id, "uri1").await.unwrap().unwrap();
    assert_eq!(file.state, BackupFileState::Enqueued);
}

#[tokio::test]
async fn test_unrelated_failure_is_ignored() {
    let test = TestBackup::new().await;
    let folder_id = enabled_folder(&test).await;
    let before = test.repos.files.get_files(folder_id).await.unwrap();

    test.services
        .upload_errors
        .on_error(&upload_error(
            folder_id,
            Some("uri1"),
            UploadFailure::Unrelated("cancelled".to_string()),
        ))
        .await;

    assert!(test.scheduler.notified().is_empty());
    assert!(test.scheduler.cancelled().is_empty());
    assert_eq!(test.repos.files.get_files(folder_id).await.unwrap(), before);
    assert!(test.services.errors.get_errors(folder_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_folder_without_backup_is_ignored() {
    let test = TestBackup::new().await;
    let folder_id = FolderId::new();

    test.services
        .upload_errors
        .on_error(&upload_error(
            folder_id,
            Some("uri1"),
            UploadFailure::api(507, None, "full"),
        ))
        .await;

    assert!(test.scheduler.notified().is_empty());
    assert_eq!(test.services.manager.run_state(folder_id), None);
}

#[tokio::test]
async fn test_scheduler_failure_is_swallowed() {
    let test = TestBackup::new().await;
    let folder_id = enabled_folder(&test).await;
    test.scheduler.fail();

    test.services
        .upload_errors
        .on_error(&upload_error(
            folder_id,
            Some("uri1"),
            UploadFailure::Permission("revoked".to_string()),
        ))
        .await;

    // The scheduler failure is logged and the stop still runs.
    assert_eq!(
        test.services.manager.run_state(folder_id),
        Some(BackupRunState::Stopped)
    );
    let errors = test.services.errors.get_errors(folder_id).await.unwrap();
    assert_eq!(errors[0].error_type, BackupErrorType::Permission);
}

#[tokio::test]
async fn test_unrecorded_stop_resumes_backup() {
    let test = TestBackup::new().await;
    let folder_id = enabled_folder(&test).await;
    let unrecorded = StopBackup::new(
        Arc::clone(&test.services.manager),
        Arc::new(FailingErrors),
    );

    assert!(
        unrecorded
            .execute(folder_id, BackupErrorType::DriveStorage)
            .await
            .is_err()
    );
    assert_eq!(
        test.services.manager.run_state(folder_id),
        Some(BackupRunState::Running)
    );

    // The next failure stops the folder and records why.
    assert!(
        test.services
            .stop_backup
            .execute(folder_id, BackupErrorType::DriveStorage)
            .await
            .unwrap()
    );
    let errors = test.services.errors.get_errors(folder_id).await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_type, BackupErrorType::DriveStorage);
}

#[tokio::test]
async fn test_listener_handles_published_failures() {
    let test = TestBackup::new().await;
    let folder_id = enabled_folder(&test).await;
    let listener = Arc::clone(&test.services.upload_errors).listen(&test.events);

    test.events.publish(upload_error(
        folder_id,
        Some("uri1"),
        UploadFailure::file_not_found("gone"),
    ));

    let deadline = tokio::time::Instant::now() + helpers::WAIT;
    while test.repos.files.get_file(folder_id, "uri1").await.unwrap().is_some() {
        assert!(tokio::time::Instant::now() < deadline, "file was not deleted");
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    listener.abort();
}
