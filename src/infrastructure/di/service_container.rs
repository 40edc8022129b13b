//! Service container for dependency injection
//!
//! Wires the admin and user share type services from settings.

use std::sync::Arc;

use crate::application::services::ShareTypeService;
use crate::application::FunctionalContext;
use crate::config::{Credentials, Settings};
use crate::infrastructure::traits::{CommandRunner, RealCommandRunner};
use crate::infrastructure::CliClient;

/// Container holding settings and the command runner shared by all clients.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,
}

impl ServiceContainer {
    /// Create a new service container with the real process runner.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealCommandRunner))
    }

    /// Create a service container with a custom runner (for testing).
    pub fn with_deps(settings: Settings, cmd: Arc<dyn CommandRunner>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, cmd }
    }

    fn share_types_as(&self, credentials: &Credentials) -> ShareTypeService {
        let client = CliClient::new(self.cmd.clone(), &self.settings, credentials.clone());
        ShareTypeService::new(client, self.settings.waiter.clone())
    }

    /// Share type service acting as the privileged actor.
    pub fn admin_share_types(&self) -> ShareTypeService {
        self.share_types_as(&self.settings.admin)
    }

    /// Share type service acting as the non-privileged actor.
    pub fn user_share_types(&self) -> ShareTypeService {
        self.share_types_as(&self.settings.user)
    }

    /// Fresh scenario context with both actors.
    pub fn functional_context(&self) -> FunctionalContext {
        FunctionalContext::new(self.admin_share_types(), self.user_share_types())
    }
}
