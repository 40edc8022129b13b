//! Share type functional scenarios
//!
//! Each scenario drives the admin and user clients through a sequence of
//! CLI operations and checks the resulting listings. Share types created
//! through [`FunctionalContext::create_share_type`] are released on
//! [`FunctionalContext::cleanup`] or when the context is dropped.

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::application::cleanup::ResourceCleanup;
use crate::application::services::ShareTypeService;
use crate::application::ApplicationError;
use crate::domain::{dhss_extra_spec, rand_name, CliFlag, ShareType, DEFAULT_NAME_PREFIX};

/// Columns every `type-create` response must carry.
pub const CREATE_KEYS: [&str; 5] = [
    "ID",
    "Name",
    "Visibility",
    "is_default",
    "required_extra_specs",
];

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("assertion failed: {message}")]
    Assertion { message: String },
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

fn ensure(condition: bool, message: impl FnOnce() -> String) -> ScenarioResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::Assertion { message: message() })
    }
}

/// Which actor runs a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

/// Admin and user clients plus the resources created through them.
pub struct FunctionalContext {
    admin: ShareTypeService,
    user: ShareTypeService,
    resources: ResourceCleanup,
}

impl FunctionalContext {
    pub fn new(admin: ShareTypeService, user: ShareTypeService) -> Self {
        Self {
            admin,
            user,
            resources: ResourceCleanup::new(),
        }
    }

    pub fn admin(&self) -> &ShareTypeService {
        &self.admin
    }

    pub fn user(&self) -> &ShareTypeService {
        &self.user
    }

    pub fn client(&self, role: Role) -> &ShareTypeService {
        match role {
            Role::Admin => &self.admin,
            Role::User => &self.user,
        }
    }

    pub fn resources(&self) -> &ResourceCleanup {
        &self.resources
    }

    /// Create a share type as admin and track it for cleanup.
    pub fn create_share_type(
        &self,
        name: Option<&str>,
        dhss: impl Into<CliFlag>,
        is_public: impl Into<CliFlag>,
    ) -> ScenarioResult<ShareType> {
        let share_type = self.admin.create_share_type(name, dhss, is_public)?;
        self.resources.track_share_type(share_type.id());
        Ok(share_type)
    }

    /// Release every tracked resource.
    pub fn cleanup(&self) -> ScenarioResult<()> {
        Ok(self.resources.cleanup(&self.admin)?)
    }

    /// `type-list` succeeds for the given actor.
    pub fn share_type_list(&self, role: Role) -> ScenarioResult<()> {
        self.client(role).manila("type-list")?;
        Ok(())
    }

    /// `extra-specs-list` succeeds for admin.
    pub fn extra_specs_list(&self) -> ScenarioResult<()> {
        self.admin.list_extra_specs()?;
        Ok(())
    }

    pub fn share_type_listed_by(
        &self,
        share_type_id: &str,
        by_admin: bool,
        list_all: bool,
    ) -> ScenarioResult<bool> {
        let client = if by_admin { &self.admin } else { &self.user };
        let share_types = client.list_share_types(list_all)?;
        Ok(share_types.iter().any(|st| st.id() == share_type_id))
    }

    /// Check listing visibility matches `is_public`.
    pub fn verify_access(&self, share_type_id: &str, is_public: bool) -> ScenarioResult<()> {
        if is_public {
            let share_types = self.admin.list_share_types(false)?;
            ensure(share_types.iter().any(|st| st.id() == share_type_id), || {
                format!("public share type {} missing from public listing", share_type_id)
            })?;
            return Ok(());
        }

        ensure(!self.share_type_listed_by(share_type_id, false, true)?, || {
            format!("private share type {} listed for user", share_type_id)
        })?;
        ensure(self.share_type_listed_by(share_type_id, true, true)?, || {
            format!("private share type {} missing from admin --all listing", share_type_id)
        })?;
        ensure(!self.share_type_listed_by(share_type_id, true, false)?, || {
            format!("private share type {} listed by default", share_type_id)
        })
    }

    /// Create, inspect, delete and wait out a share type.
    #[instrument(level = "info", skip(self))]
    pub fn create_delete_share_type(&self, is_public: bool, dhss: bool) -> ScenarioResult<()> {
        let name = rand_name(DEFAULT_NAME_PREFIX);
        let dhss_expected = dhss_extra_spec(&CliFlag::from(dhss));

        let share_type = self.create_share_type(Some(name.as_str()), dhss, is_public)?;
        let st_id = share_type.id().to_string();

        for key in CREATE_KEYS {
            ensure(share_type.contains_key(key), || {
                format!("type-create response lacks column {}", key)
            })?;
        }
        ensure(share_type.name() == name, || {
            format!("expected name {}, got {}", name, share_type.name())
        })?;
        ensure(
            share_type.required_extra_specs() == Some(dhss_expected.as_str()),
            || {
                format!(
                    "expected required_extra_specs '{}', got {:?}",
                    dhss_expected,
                    share_type.required_extra_specs()
                )
            },
        )?;
        let visibility = share_type.visibility().unwrap_or_default().to_lowercase();
        let expected_visibility = if is_public { "public" } else { "private" };
        ensure(visibility == expected_visibility, || {
            format!("expected visibility {}, got {}", expected_visibility, visibility)
        })?;
        ensure(share_type.is_default() == Some("-"), || {
            format!("expected is_default '-', got {:?}", share_type.is_default())
        })?;

        self.verify_access(&st_id, is_public)?;

        self.admin.delete_share_type(&st_id)?;
        self.admin.wait_for_share_type_deletion(&st_id)?;
        self.resources.forget(&st_id);

        let share_types = self.admin.list_share_types(false)?;
        ensure(!share_types.iter().any(|st| st.id() == st_id), || {
            format!("deleted share type {} still listed", st_id)
        })?;

        info!("create_delete_share_type: {} released", st_id);
        Ok(())
    }

    /// Grant and revoke the user's project access to a private share type.
    #[instrument(level = "info", skip(self))]
    pub fn add_remove_access_to_private_share_type(&self) -> ScenarioResult<()> {
        let name = rand_name(DEFAULT_NAME_PREFIX);
        let is_public = false;

        let share_type = self.create_share_type(Some(name.as_str()), "False", is_public)?;
        let st_id = share_type.id().to_string();
        let user_project_id = self.admin.get_project_id(self.user.client().tenant_name())?;

        self.verify_access(&st_id, is_public)?;

        let access = self.admin.list_share_type_access(&st_id)?;
        ensure(!access.contains(&user_project_id), || {
            format!("project {} already in access list of {}", user_project_id, st_id)
        })?;

        self.admin.add_share_type_access(&st_id, &user_project_id)?;

        ensure(self.share_type_listed_by(&st_id, false, true)?, || {
            format!("share type {} not listed for user after access-add", st_id)
        })?;
        ensure(self.share_type_listed_by(&st_id, true, true)?, || {
            format!("share type {} not listed for admin after access-add", st_id)
        })?;
        let access = self.admin.list_share_type_access(&st_id)?;
        ensure(access.contains(&user_project_id), || {
            format!("project {} missing from access list of {}", user_project_id, st_id)
        })?;

        self.admin.remove_share_type_access(&st_id, &user_project_id)?;

        self.verify_access(&st_id, is_public)?;
        let access = self.admin.list_share_type_access(&st_id)?;
        ensure(!access.contains(&user_project_id), || {
            format!("project {} still in access list of {}", user_project_id, st_id)
        })
    }
}

impl Drop for FunctionalContext {
    fn drop(&mut self) {
        if self.resources.pending().is_empty() {
            return;
        }
        if let Err(e) = self.cleanup() {
            warn!("FunctionalContext: cleanup failed: {}", e);
        }
    }
}
