//! Bucket enumeration gated on the media permission.

use std::sync::Arc;

use futures::StreamExt;
use tracing::debug;

use photobackup_core::error::AppError;
use photobackup_core::observe::QueryObservable;
use photobackup_core::traits::PermissionSource;
use photobackup_entity::bucket::BucketEntry;
use photobackup_entity::repository::BucketRepository;

/// Lists buckets the user can back up.
///
/// Without the media permission the list is empty rather than an error.
#[derive(Clone)]
pub struct GetAllBuckets {
    bucket_repo: Arc<dyn BucketRepository>,
    permissions: Arc<dyn PermissionSource>,
}

impl GetAllBuckets {
    /// Creates a new bucket use case.
    pub fn new(
        bucket_repo: Arc<dyn BucketRepository>,
        permissions: Arc<dyn PermissionSource>,
    ) -> Self {
        Self {
            bucket_repo,
            permissions,
        }
    }

    /// Buckets right now.
    pub async fn execute(&self) -> Result<Vec<BucketEntry>, AppError> {
        if !self.permissions.current().is_granted() {
            debug!("Media permission not granted, no buckets");
            return Ok(Vec::new());
        }
        self.bucket_repo.get_all().await
    }

    /// Buckets now and after every permission change.
    pub fn observe(&self) -> QueryObservable<Vec<BucketEntry>> {
        let bucket_repo = Arc::clone(&self.bucket_repo);
        self.permissions
            .observe()
            .then(move |permissions| {
                let bucket_repo = Arc::clone(&bucket_repo);
                async move {
                    if permissions.is_granted() {
                        bucket_repo.get_all().await
                    } else {
                        Ok(Vec::new())
                    }
                }
            })
            .boxed()
    }
}
