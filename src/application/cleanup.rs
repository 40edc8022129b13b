//! Tracking and release of share types created by scenarios

use std::sync::Mutex;

use tracing::{debug, warn};

use crate::application::services::ShareTypeService;
use crate::application::ApplicationResult;

/// Share types to delete when a scenario finishes.
#[derive(Debug, Default)]
pub struct ResourceCleanup {
    share_types: Mutex<Vec<String>>,
}

impl ResourceCleanup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a share type (name or ID) for deletion.
    pub fn track_share_type(&self, name_or_id: impl Into<String>) {
        let mut guard = self.share_types.lock().unwrap_or_else(|p| p.into_inner());
        guard.push(name_or_id.into());
    }

    /// Stop tracking a share type whose deletion was already confirmed.
    pub fn forget(&self, name_or_id: &str) {
        let mut guard = self.share_types.lock().unwrap_or_else(|p| p.into_inner());
        guard.retain(|tracked| tracked != name_or_id);
    }

    pub fn pending(&self) -> Vec<String> {
        self.share_types
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Delete tracked share types, newest first, and wait for each to vanish.
    ///
    /// A share type that is already gone counts as released. Every tracked
    /// resource is attempted; the first error is returned.
    pub fn cleanup(&self, service: &ShareTypeService) -> ApplicationResult<()> {
        let tracked: Vec<String> = {
            let mut guard = self.share_types.lock().unwrap_or_else(|p| p.into_inner());
            guard.drain(..).collect()
        };

        let mut first_err = None;
        for id in tracked.iter().rev() {
            debug!("cleanup: releasing share type {}", id);
            let released = match service.delete_share_type(id) {
                Ok(_) => service.wait_for_share_type_deletion(id),
                Err(e) if e.is_not_found() => Ok(()),
                Err(e) => Err(e),
            };
            if let Err(e) = released {
                warn!("cleanup: share type {}: {}", id, e);
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
