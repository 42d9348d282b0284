use std::sync::Arc;

use lettervideo_domain::{DomainError, JobHandle, KeyValueStore};

/// The single key under which the in-flight job id is stored.
pub const CURRENT_JOB_KEY: &str = "current_job_id";

/// Durable record of the job the client is tracking.
#[derive(Clone)]
pub struct PersistentJobHandle {
    store: Arc<dyn KeyValueStore>,
}

impl PersistentJobHandle {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Result<Option<JobHandle>, DomainError> {
        let value = self.store.get(CURRENT_JOB_KEY)?;
        Ok(value
            .map(|job_id| job_id.trim().to_string())
            .filter(|job_id| !job_id.is_empty())
            .map(JobHandle::new))
    }

    pub fn set(&self, handle: &JobHandle) -> Result<(), DomainError> {
        self.store.set(CURRENT_JOB_KEY, &handle.job_id)
    }

    pub fn clear(&self) -> Result<(), DomainError> {
        self.store.remove(CURRENT_JOB_KEY)
    }
}
