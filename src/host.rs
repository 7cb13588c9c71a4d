//! Host-side collaborators for running the backup services as a daemon.

use async_trait::async_trait;

use photobackup_core::result::AppResult;
use photobackup_entity::bucket::BucketEntry;
use photobackup_entity::repository::BucketRepository;

/// Media buckets announced by the host at startup.
#[derive(Debug, Clone)]
pub struct StaticBuckets {
    buckets: Vec<BucketEntry>,
}

impl StaticBuckets {
    /// Buckets named in order, numbered from 1.
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let buckets = names
            .into_iter()
            .zip(1..)
            .map(|(name, id)| BucketEntry::new(id, name))
            .collect();
        Self { buckets }
    }
}

#[async_trait]
impl BucketRepository for StaticBuckets {
    async fn get_all(&self) -> AppResult<Vec<BucketEntry>> {
        Ok(self.buckets.clone())
    }
}
