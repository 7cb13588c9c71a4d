//! Mapping of upload failure causes onto backup reactions.

use photobackup_core::types::error_type::BackupErrorType;
use photobackup_core::types::failure::{
    ApiFailure, HTTP_INSUFFICIENT_STORAGE, IoFailureKind, NetworkFailure, UploadFailure, api_code,
};

/// What an upload failure means for the backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// The source file is gone; stop tracking it.
    NotFound,
    /// Media access was revoked.
    Permission,
    /// The device is out of space.
    LocalStorage,
    /// The remote quota is exhausted.
    DriveStorage,
    /// The account may not upload photos.
    PhotosUploadNotAllowed,
    /// No network.
    Connectivity,
    /// Only a metered network is available.
    WifiConnectivity,
    /// The file failed for a reason specific to it.
    Other,
}

impl FailureClass {
    /// The error type recorded for this class. `NotFound` records nothing.
    pub fn error_type(&self) -> Option<BackupErrorType> {
        match self {
            Self::NotFound => None,
            Self::Permission => Some(BackupErrorType::Permission),
            Self::LocalStorage => Some(BackupErrorType::LocalStorage),
            Self::DriveStorage => Some(BackupErrorType::DriveStorage),
            Self::PhotosUploadNotAllowed => Some(BackupErrorType::PhotosUploadNotAllowed),
            Self::Connectivity => Some(BackupErrorType::Connectivity),
            Self::WifiConnectivity => Some(BackupErrorType::WifiConnectivity),
            Self::Other => Some(BackupErrorType::Other),
        }
    }

    /// Whether the whole folder's backup must stop.
    pub fn stops_backup(&self) -> bool {
        self.error_type().is_some_and(|t| t.stops_backup())
    }
}

/// Whether a failure cause concerns the backup at all.
pub fn has_effect_on_backup(cause: &UploadFailure) -> bool {
    !matches!(cause, UploadFailure::Unrelated(_))
}

/// Classify a failure cause. `None` for causes with no bearing on backup.
pub fn classify(cause: &UploadFailure) -> Option<FailureClass> {
    let class = match cause {
        UploadFailure::Io { kind, .. } => match kind {
            IoFailureKind::NotFound => FailureClass::NotFound,
            IoFailureKind::NoSpaceLeft => FailureClass::LocalStorage,
            IoFailureKind::Network => FailureClass::Connectivity,
            IoFailureKind::Other => FailureClass::Other,
        },
        UploadFailure::Network(NetworkFailure::Unavailable) => FailureClass::Connectivity,
        UploadFailure::Network(NetworkFailure::UnmeteredRequired) => {
            FailureClass::WifiConnectivity
        }
        UploadFailure::Permission(_) => FailureClass::Permission,
        UploadFailure::Api(api) => classify_api(api),
        UploadFailure::Crypto(_)
        | UploadFailure::Verification(_)
        | UploadFailure::MissingElement(_) => FailureClass::Other,
        UploadFailure::Unrelated(_) => return None,
    };
    Some(class)
}

fn classify_api(api: &ApiFailure) -> FailureClass {
    match api.code {
        Some(api_code::INSUFFICIENT_QUOTA | api_code::INSUFFICIENT_SPACE) => {
            FailureClass::DriveStorage
        }
        Some(api_code::PHOTOS_UPLOAD_NOT_ALLOWED) => FailureClass::PhotosUploadNotAllowed,
        _ if api.status == HTTP_INSUFFICIENT_STORAGE => FailureClass::DriveStorage,
        _ => FailureClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io(kind: IoFailureKind) -> UploadFailure {
        UploadFailure::Io {
            kind,
            message: "io".to_string(),
        }
    }

    #[test]
    fn test_io_failures() {
        assert_eq!(classify(&io(IoFailureKind::NotFound)), Some(FailureClass::NotFound));
        assert_eq!(
            classify(&io(IoFailureKind::NoSpaceLeft)),
            Some(FailureClass::LocalStorage)
        );
        assert_eq!(
            classify(&io(IoFailureKind::Network)),
            Some(FailureClass::Connectivity)
        );
        assert_eq!(classify(&io(IoFailureKind::Other)), Some(FailureClass::Other));
    }

    #[test]
    fn test_api_failures() {
        let quota = UploadFailure::api(422, Some(api_code::INSUFFICIENT_QUOTA), "quota");
        let space = UploadFailure::api(422, Some(api_code::INSUFFICIENT_SPACE), "space");
        let http = UploadFailure::api(HTTP_INSUFFICIENT_STORAGE, None, "full");
        let photos = UploadFailure::api(422, Some(api_code::PHOTOS_UPLOAD_NOT_ALLOWED), "no");
        let other = UploadFailure::api(500, Some(2501), "server");

        assert_eq!(classify(&quota), Some(FailureClass::DriveStorage));
        assert_eq!(classify(&space), Some(FailureClass::DriveStorage));
        assert_eq!(classify(&http), Some(FailureClass::DriveStorage));
        assert_eq!(classify(&photos), Some(FailureClass::PhotosUploadNotAllowed));
        assert_eq!(classify(&other), Some(FailureClass::Other));
    }

    #[test]
    fn test_only_unrelated_has_no_effect() {
        let unrelated = UploadFailure::Unrelated("cancelled".to_string());
        assert!(!has_effect_on_backup(&unrelated));
        assert_eq!(classify(&unrelated), None);

        let crypto = UploadFailure::Crypto("bad key".to_string());
        assert!(has_effect_on_backup(&crypto));
        assert_eq!(classify(&crypto), Some(FailureClass::Other));
    }

    #[test]
    fn test_stopping_classes() {
        assert!(FailureClass::DriveStorage.stops_backup());
        assert!(FailureClass::Permission.stops_backup());
        assert!(!FailureClass::Connectivity.stops_backup());
        assert!(!FailureClass::Other.stops_backup());
        assert!(!FailureClass::NotFound.stops_backup());
    }
}
