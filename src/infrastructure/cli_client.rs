//! Authenticated wrapper around OpenStack command-line clients
//!
//! Commands are assembled as `[prefix] <cli_dir>/<cmd> <auth flags> <flags> <action> <params>`,
//! split with POSIX shell rules, and run through a [`CommandRunner`].

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{Credentials, Settings};
use crate::infrastructure::traits::CommandRunner;
use crate::infrastructure::{InfraError, InfraResult};

/// Per-invocation behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CmdOptions {
    /// Return output instead of failing on a non-zero exit code
    pub fail_ok: bool,
    /// Append stderr to the returned output
    pub merge_stderr: bool,
}

/// CLI client bound to one set of credentials.
#[derive(Clone)]
pub struct CliClient {
    runner: Arc<dyn CommandRunner>,
    credentials: Credentials,
    auth_url: String,
    cli_dir: PathBuf,
    prefix: String,
    endpoint_type: String,
    insecure: bool,
}

impl std::fmt::Debug for CliClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliClient")
            .field("username", &self.credentials.username)
            .field("tenant_name", &self.credentials.tenant_name)
            .field("auth_url", &self.auth_url)
            .field("cli_dir", &self.cli_dir)
            .finish_non_exhaustive()
    }
}

fn split_words(part: &str) -> InfraResult<Vec<String>> {
    shell_words::split(part).map_err(|e| InfraError::InvalidCommand {
        command: part.to_string(),
        message: e.to_string(),
    })
}

/// Render argv for logs with the password value masked.
fn render_masked(argv: &[String]) -> String {
    let mut masked = Vec::with_capacity(argv.len());
    let mut hide_next = false;
    for arg in argv {
        if hide_next {
            masked.push("***".to_string());
            hide_next = false;
        } else {
            hide_next = arg == "--os-password";
            masked.push(arg.clone());
        }
    }
    shell_words::join(masked)
}

impl CliClient {
    /// Create a client acting as `credentials`.
    pub fn new(runner: Arc<dyn CommandRunner>, settings: &Settings, credentials: Credentials) -> Self {
        Self {
            runner,
            credentials,
            auth_url: settings.auth_url.clone(),
            cli_dir: settings.cli_dir.clone(),
            prefix: settings.prefix.clone(),
            endpoint_type: settings.endpoint_type.clone(),
            insecure: settings.insecure,
        }
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn tenant_name(&self) -> &str {
        &self.credentials.tenant_name
    }

    /// Run `manila <action>` with auth flags and `--endpoint-type`.
    pub fn manila(&self, action: &str, flags: &str, params: &str, opts: CmdOptions) -> InfraResult<String> {
        let flags = format!(
            "{} --endpoint-type {}",
            flags,
            shell_words::quote(&self.endpoint_type)
        );
        self.cmd_with_auth("manila", action, &flags, params, opts)
    }

    /// Run `openstack <action>` with auth flags.
    pub fn openstack(
        &self,
        action: &str,
        flags: &str,
        params: &str,
        opts: CmdOptions,
    ) -> InfraResult<String> {
        self.cmd_with_auth("openstack", action, flags, params, opts)
    }

    /// Resolve a project name (or ID) to its ID.
    pub fn get_project_id(&self, name_or_id: &str) -> InfraResult<String> {
        let project_id = self.openstack(
            "project show -f value -c id",
            "",
            &shell_words::quote(name_or_id),
            CmdOptions::default(),
        )?;
        Ok(project_id.trim().to_string())
    }

    /// Run `cmd` with the keystone credential flags prepended to `flags`.
    pub fn cmd_with_auth(
        &self,
        cmd: &str,
        action: &str,
        flags: &str,
        params: &str,
        opts: CmdOptions,
    ) -> InfraResult<String> {
        let mut auth = vec![
            "--os-username",
            self.credentials.username.as_str(),
            "--os-tenant-name",
            self.credentials.tenant_name.as_str(),
            "--os-password",
            self.credentials.password.as_str(),
            "--os-auth-url",
            self.auth_url.as_str(),
        ];
        if self.insecure {
            auth.push("--insecure");
        }
        let flags = format!("{} {}", shell_words::join(auth), flags);
        self.cmd(cmd, action, &flags, params, opts)
    }

    /// Run `cmd` from `cli_dir` without adding credentials.
    pub fn cmd(
        &self,
        cmd: &str,
        action: &str,
        flags: &str,
        params: &str,
        opts: CmdOptions,
    ) -> InfraResult<String> {
        let mut argv = split_words(&self.prefix)?;
        argv.push(self.cli_dir.join(cmd).to_string_lossy().to_string());
        argv.extend(split_words(flags)?);
        argv.extend(split_words(action)?);
        argv.extend(split_words(params)?);

        let rendered = render_masked(&argv);
        info!("running: '{}'", rendered);

        let (program, rest) = argv.split_first().ok_or_else(|| InfraError::InvalidCommand {
            command: rendered.clone(),
            message: "empty command line".to_string(),
        })?;
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        let output = self
            .runner
            .run(program, &args)
            .map_err(|e| InfraError::io(format!("run {}", rendered), e))?;
        debug!(
            "cmd: exit_code={:?}, stdout_len={}, stderr_len={}",
            output.exit_code,
            output.stdout.len(),
            output.stderr.len()
        );

        if !opts.fail_ok && !output.success() {
            return Err(InfraError::CommandFailed {
                command: rendered,
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        let mut text = output.stdout;
        if opts.merge_stderr {
            text.push_str(&output.stderr);
        }
        Ok(text)
    }
}
