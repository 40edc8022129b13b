//! Share type operations over the manila CLI
//!
//! Each operation renders a `manila type-*` command, runs it through the
//! [`CliClient`] and parses the printed table.

use std::time::Duration;

use tracing::{debug, instrument};

use crate::application::services::waiter::{self, DeletionCheck};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::WaiterConfig;
use crate::domain::{
    listing, rand_name, CliFlag, DomainError, ResourceType, ShareType, DEFAULT_NAME_PREFIX,
};
use crate::infrastructure::{CliClient, CmdOptions, InfraError};

/// stderr fragment printed by `type-delete` for an unknown share type.
pub const SHARE_TYPE_NOT_FOUND_MSG: &str = "No sharetype with a name or ID";

/// Service for share type lifecycle and access control.
#[derive(Debug, Clone)]
pub struct ShareTypeService {
    client: CliClient,
    waiter: WaiterConfig,
}

impl ShareTypeService {
    /// Create a new share type service.
    pub fn new(client: CliClient, waiter: WaiterConfig) -> Self {
        Self { client, waiter }
    }

    pub fn client(&self) -> &CliClient {
        &self.client
    }

    /// Run a raw manila action with default options.
    pub fn manila(&self, action: &str) -> ApplicationResult<String> {
        Ok(self.client.manila(action, "", "", CmdOptions::default())?)
    }

    /// Create a share type.
    ///
    /// # Arguments
    /// * `name` - Share type name; a random `manilaclient_functional_test-<n>` when `None`
    /// * `dhss` - driver_handles_share_servers, a bool or its string alias
    /// * `is_public` - visibility, a bool or its string alias
    ///
    /// # Returns
    /// The single row printed by `type-create`
    #[instrument(level = "debug", skip(self, dhss, is_public))]
    pub fn create_share_type(
        &self,
        name: Option<&str>,
        dhss: impl Into<CliFlag>,
        is_public: impl Into<CliFlag>,
    ) -> ApplicationResult<ShareType> {
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| rand_name(DEFAULT_NAME_PREFIX));
        let dhss = dhss.into();
        let is_public = is_public.into();

        let action = format!(
            "type-create {} {} --is-public {}",
            shell_words::quote(&name),
            shell_words::quote(dhss.as_str()),
            shell_words::quote(is_public.as_str())
        );
        let raw = self.manila(&action)?;

        let record = listing(&raw)?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::TableParse {
                line: 0,
                message: format!("type-create printed no share type for '{}'", name),
            })?;
        let share_type = ShareType::from_record(record)?;
        debug!(
            "create_share_type: id={}, name={}",
            share_type.id(),
            share_type.name()
        );
        Ok(share_type)
    }

    /// Delete a share type by name or ID.
    ///
    /// # Errors
    /// `DomainError::NotFound` when the CLI reports no such share type;
    /// other command failures are returned unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_share_type(&self, name_or_id: &str) -> ApplicationResult<String> {
        let action = format!("type-delete {}", shell_words::quote(name_or_id));
        match self.client.manila(&action, "", "", CmdOptions::default()) {
            Ok(out) => Ok(out),
            Err(e @ InfraError::CommandFailed { .. })
                if e.stderr().is_some_and(|s| s.contains(SHARE_TYPE_NOT_FOUND_MSG)) =>
            {
                debug!("delete_share_type: {} already gone", name_or_id);
                Err(DomainError::NotFound {
                    resource: format!("share type {}", name_or_id),
                }
                .into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List share types; all of them (`--all`) or only public ones.
    #[instrument(level = "debug", skip(self))]
    pub fn list_share_types(&self, list_all: bool) -> ApplicationResult<Vec<ShareType>> {
        let action = if list_all { "type-list --all" } else { "type-list" };
        let raw = self.manila(action)?;
        let share_types = listing(&raw)?
            .into_iter()
            .map(ShareType::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("list_share_types: found {}", share_types.len());
        Ok(share_types)
    }

    /// Whether no share type with this name or ID is listed anymore.
    ///
    /// There is no `type-show`, so this scans the full listing.
    pub fn is_share_type_deleted(&self, name_or_id: &str) -> ApplicationResult<bool> {
        let share_types = self.list_share_types(true)?;
        Ok(!share_types.iter().any(|st| st.matches(name_or_id)))
    }

    /// Poll until `res_id` of category `res_type` is deleted.
    ///
    /// `None` falls back to the configured build interval and timeout.
    pub fn wait_for_resource_deletion(
        &self,
        res_type: &str,
        res_id: &str,
        interval: Option<Duration>,
        timeout: Option<Duration>,
    ) -> ApplicationResult<()> {
        let interval = interval.unwrap_or_else(|| self.waiter.build_interval());
        let timeout = timeout.unwrap_or_else(|| self.waiter.build_timeout());
        waiter::wait_for_resource_deletion(self, res_type, res_id, interval, timeout)
    }

    /// Wait for share type deletion with the configured share type window.
    pub fn wait_for_share_type_deletion(&self, name_or_id: &str) -> ApplicationResult<()> {
        self.wait_for_resource_deletion(
            ResourceType::ShareType.as_str(),
            name_or_id,
            Some(self.waiter.share_type_interval()),
            Some(self.waiter.share_type_timeout()),
        )
    }

    /// Grant a project access to a private share type.
    #[instrument(level = "debug", skip(self))]
    pub fn add_share_type_access(&self, share_type: &str, project_id: &str) -> ApplicationResult<()> {
        let action = format!(
            "type-access-add {} {}",
            shell_words::quote(share_type),
            shell_words::quote(project_id)
        );
        self.manila(&action)?;
        Ok(())
    }

    /// Revoke a project's access to a private share type.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_share_type_access(
        &self,
        share_type: &str,
        project_id: &str,
    ) -> ApplicationResult<()> {
        let action = format!(
            "type-access-remove {} {}",
            shell_words::quote(share_type),
            shell_words::quote(project_id)
        );
        self.manila(&action)?;
        Ok(())
    }

    /// Project IDs allowed to use a share type.
    #[instrument(level = "debug", skip(self))]
    pub fn list_share_type_access(&self, share_type_id: &str) -> ApplicationResult<Vec<String>> {
        let action = format!("type-access-list {}", shell_words::quote(share_type_id));
        let raw = self.manila(&action)?;
        listing(&raw)?
            .into_iter()
            .map(|mut row| {
                row.remove("Project_ID").ok_or_else(|| {
                    ApplicationError::from(DomainError::MissingColumn {
                        column: "Project_ID".to_string(),
                    })
                })
            })
            .collect()
    }

    /// Raw `extra-specs-list` output.
    pub fn list_extra_specs(&self) -> ApplicationResult<String> {
        self.manila("extra-specs-list")
    }

    /// Resolve a project name to its ID through the openstack CLI.
    pub fn get_project_id(&self, name_or_id: &str) -> ApplicationResult<String> {
        Ok(self.client.get_project_id(name_or_id)?)
    }
}

impl DeletionCheck for ShareTypeService {
    fn is_deleted(&self, res_type: ResourceType, res_id: &str) -> ApplicationResult<bool> {
        match res_type {
            ResourceType::ShareType => self.is_share_type_deleted(res_id),
        }
    }
}
