//! In-memory stand-in for the `manila` and `openstack` CLIs.
//!
//! Keeps share types, their access lists and projects in memory and prints
//! the same ASCII tables the real clients print. Deleted share types keep
//! showing up in `type-list --all` for `delete_lag` listings.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use manila_functional::config::{Credentials, Settings, WaiterConfig};
use manila_functional::infrastructure::traits::{CommandOutput, CommandRunner};
use manila_functional::ServiceContainer;

pub const ADMIN_PROJECT_ID: &str = "5a6b0e2c0a7d4d43b0c1d1f7e3f0a001";
pub const USER_PROJECT_ID: &str = "9f1e4c7b2d8a4e0f8c3b6a5d4e2f1002";

#[derive(Debug, Clone)]
pub struct FakeShareType {
    pub id: String,
    pub name: String,
    pub public: bool,
    pub dhss: String,
    pub access: Vec<String>,
    /// `Some(n)`: deleted, still listed by the next `n` `--all` listings
    pub pending_delete: Option<usize>,
}

#[derive(Debug, Default)]
struct FakeState {
    share_types: Vec<FakeShareType>,
    projects: BTreeMap<String, String>,
    delete_lag: usize,
    stuck_deletes: bool,
    next_id: u32,
    calls: Vec<String>,
}

/// Parsed command line of one fake invocation.
#[derive(Debug, Default)]
struct Invocation {
    username: String,
    tenant_name: String,
    endpoint_type: Option<String>,
    positional: Vec<String>,
}

impl Invocation {
    fn parse(args: &[&str]) -> Self {
        let mut inv = Invocation::default();
        let mut it = args.iter();
        while let Some(arg) = it.next() {
            match *arg {
                "--os-username" => inv.username = it.next().unwrap_or(&"").to_string(),
                "--os-tenant-name" => inv.tenant_name = it.next().unwrap_or(&"").to_string(),
                "--endpoint-type" => inv.endpoint_type = it.next().map(|s| s.to_string()),
                "--os-password" | "--os-auth-url" => {
                    it.next();
                }
                "--insecure" => {}
                other => inv.positional.push(other.to_string()),
            }
        }
        inv
    }

    fn is_admin(&self) -> bool {
        self.username == "admin"
    }
}

/// Render rows the way the OpenStack CLIs do.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let delimiter: String = std::iter::once("+".to_string())
        .chain(widths.iter().map(|w| format!("{}+", "-".repeat(w + 2))))
        .collect();
    let line = |cells: Vec<&str>| -> String {
        let mut out = String::from("|");
        for (cell, w) in cells.iter().zip(&widths) {
            out.push_str(&format!(" {:<width$} |", cell, width = *w));
        }
        out
    };

    let mut out = vec![delimiter.clone(), line(headers.to_vec()), delimiter.clone()];
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.push(delimiter);
    out.join("\n") + "\n"
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Some(false),
        _ => None,
    }
}

fn capitalized(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

const SHARE_TYPE_HEADERS: [&str; 6] = [
    "ID",
    "Name",
    "Visibility",
    "is_default",
    "required_extra_specs",
    "optional_extra_specs",
];

fn share_type_row(st: &FakeShareType) -> Vec<String> {
    vec![
        st.id.clone(),
        st.name.clone(),
        if st.public { "public" } else { "private" }.to_string(),
        "-".to_string(),
        format!("driver_handles_share_servers : {}", st.dhss),
        String::new(),
    ]
}

pub struct FakeCloud {
    state: Mutex<FakeState>,
}

impl FakeCloud {
    pub fn new() -> Arc<Self> {
        Self::with_delete_lag(0)
    }

    /// Deleted share types stay listed for `lag` `--all` listings.
    pub fn with_delete_lag(lag: usize) -> Arc<Self> {
        let mut projects = BTreeMap::new();
        projects.insert("admin".to_string(), ADMIN_PROJECT_ID.to_string());
        projects.insert("demo".to_string(), USER_PROJECT_ID.to_string());
        Arc::new(Self {
            state: Mutex::new(FakeState {
                projects,
                delete_lag: lag,
                ..FakeState::default()
            }),
        })
    }

    /// Deleted share types never disappear.
    pub fn stuck() -> Arc<Self> {
        let cloud = Self::new();
        cloud.state.lock().unwrap().stuck_deletes = true;
        cloud
    }

    pub fn seed_share_type(&self, name: &str, public: bool) -> String {
        let mut st = self.state.lock().unwrap();
        st.next_id += 1;
        let id = format!("00000000-0000-0000-0000-{:012}", st.next_id);
        st.share_types.push(FakeShareType {
            id: id.clone(),
            name: name.to_string(),
            public,
            dhss: "False".to_string(),
            access: Vec::new(),
            pending_delete: None,
        });
        id
    }

    pub fn share_types(&self) -> Vec<FakeShareType> {
        self.state.lock().unwrap().share_types.clone()
    }

    /// Every invocation as `program args...`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, needle: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(needle)).count()
    }

    fn manila(&self, st: &mut FakeState, inv: &Invocation) -> CommandOutput {
        let pos: Vec<&str> = inv.positional.iter().map(String::as_str).collect();
        let caller_project = st.projects.get(&inv.tenant_name).cloned().unwrap_or_default();

        match pos.as_slice() {
            ["type-list", rest @ ..] => {
                let all = rest.contains(&"--all");
                let admin = inv.is_admin();
                let mut rows = Vec::new();
                for share_type in st.share_types.iter_mut() {
                    let visible = if all {
                        share_type.public || admin || share_type.access.contains(&caller_project)
                    } else {
                        share_type.public
                    };
                    if visible {
                        rows.push(share_type_row(share_type));
                    }
                    if all {
                        if let Some(left) = share_type.pending_delete.as_mut() {
                            *left = left.saturating_sub(1);
                        }
                    }
                }
                if !st.stuck_deletes {
                    st.share_types.retain(|s| s.pending_delete != Some(0));
                }
                CommandOutput::ok(render_table(&SHARE_TYPE_HEADERS, &rows))
            }
            ["type-create", name, dhss, "--is-public", is_public] => {
                if !inv.is_admin() {
                    return CommandOutput::failed(
                        1,
                        "ERROR: Policy doesn't allow share_type:create to be performed.",
                    );
                }
                let (Some(dhss), Some(public)) = (parse_bool(dhss), parse_bool(is_public)) else {
                    return CommandOutput::failed(1, "ERROR: Invalid boolean value");
                };
                if st.share_types.iter().any(|s| s.name == *name) {
                    return CommandOutput::failed(
                        1,
                        format!("ERROR: Share Type {} already exists.", name),
                    );
                }
                st.next_id += 1;
                let share_type = FakeShareType {
                    id: format!("00000000-0000-0000-0000-{:012}", st.next_id),
                    name: name.to_string(),
                    public,
                    dhss: capitalized(dhss),
                    access: Vec::new(),
                    pending_delete: None,
                };
                let headers = &SHARE_TYPE_HEADERS[..5];
                let mut row = share_type_row(&share_type);
                row.truncate(5);
                st.share_types.push(share_type);
                CommandOutput::ok(render_table(headers, &[row]))
            }
            ["type-delete", name_or_id] => {
                let lag = st.delete_lag;
                let found = st.share_types.iter().position(|s| {
                    s.pending_delete.is_none() && (s.id == *name_or_id || s.name == *name_or_id)
                });
                match found {
                    Some(idx) => {
                        st.share_types[idx].pending_delete = Some(lag);
                        if lag == 0 && !st.stuck_deletes {
                            st.share_types.remove(idx);
                        }
                        CommandOutput::ok("")
                    }
                    None => CommandOutput::failed(
                        1,
                        format!(
                            "ERROR: No sharetype with a name or ID of '{}' exists.",
                            name_or_id
                        ),
                    ),
                }
            }
            [action @ ("type-access-add" | "type-access-remove"), target, project] => {
                let Some(share_type) = st
                    .share_types
                    .iter_mut()
                    .find(|s| s.id == *target || s.name == *target)
                else {
                    return CommandOutput::failed(1, "ERROR: No sharetype found");
                };
                if share_type.public {
                    return CommandOutput::failed(
                        1,
                        "ERROR: Invalid share type: Type access modification is not applicable to public share type.",
                    );
                }
                if *action == "type-access-add" {
                    if !share_type.access.iter().any(|p| p.as_str() == *project) {
                        share_type.access.push(project.to_string());
                    }
                } else {
                    share_type.access.retain(|p| p.as_str() != *project);
                }
                CommandOutput::ok("")
            }
            ["type-access-list", target] => {
                let Some(share_type) = st
                    .share_types
                    .iter()
                    .find(|s| s.id == *target || s.name == *target)
                else {
                    return CommandOutput::failed(1, "ERROR: No sharetype found");
                };
                if share_type.public {
                    return CommandOutput::failed(
                        1,
                        "ERROR: Failed to get access list for public share type.",
                    );
                }
                let rows: Vec<Vec<String>> = share_type
                    .access
                    .iter()
                    .map(|p| vec![share_type.id.clone(), p.clone()])
                    .collect();
                CommandOutput::ok(render_table(&["Share_type_ID", "Project_ID"], &rows))
            }
            ["extra-specs-list"] => {
                let rows: Vec<Vec<String>> = st
                    .share_types
                    .iter()
                    .map(|s| {
                        vec![
                            s.id.clone(),
                            s.name.clone(),
                            format!("driver_handles_share_servers : {}", s.dhss),
                        ]
                    })
                    .collect();
                CommandOutput::ok(render_table(&["ID", "Name", "all_extra_specs"], &rows))
            }
            _ => CommandOutput::failed(
                2,
                format!("error: argument <subcommand>: invalid choice: {:?}", pos),
            ),
        }
    }

    fn openstack(&self, st: &mut FakeState, inv: &Invocation) -> CommandOutput {
        let pos: Vec<&str> = inv.positional.iter().map(String::as_str).collect();
        match pos.as_slice() {
            ["project", "show", "-f", "value", "-c", "id", name_or_id] => st
                .projects
                .iter()
                .find(|(name, id)| name.as_str() == *name_or_id || id.as_str() == *name_or_id)
                .map(|(_, id)| CommandOutput::ok(format!("{}\n", id)))
                .unwrap_or_else(|| {
                    CommandOutput::failed(
                        1,
                        format!("No project with a name or ID of '{}' exists.", name_or_id),
                    )
                }),
            _ => CommandOutput::failed(2, "openstack: unknown command"),
        }
    }
}

impl CommandRunner for FakeCloud {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let mut st = self.state.lock().unwrap();
        st.calls.push(format!("{} {}", cmd, args.join(" ")));
        let inv = Invocation::parse(args);

        if cmd.ends_with("/manila") {
            Ok(self.manila(&mut st, &inv))
        } else if cmd.ends_with("/openstack") {
            Ok(self.openstack(&mut st, &inv))
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such executable: {}", cmd),
            ))
        }
    }
}

/// Settings pointing at the fake cloud with an instant deletion waiter.
pub fn fake_settings() -> Settings {
    Settings {
        cli_dir: PathBuf::from("/fake/bin"),
        auth_url: "http://keystone.fake:5000/v2.0".into(),
        admin: Credentials {
            username: "admin".into(),
            tenant_name: "admin".into(),
            password: "admin-secret".into(),
        },
        user: Credentials {
            username: "demo".into(),
            tenant_name: "demo".into(),
            password: "demo-secret".into(),
        },
        waiter: WaiterConfig {
            build_interval_secs: 0,
            build_timeout_secs: 1,
            share_type_interval_secs: 0,
            share_type_timeout_secs: 1,
        },
        ..Settings::default()
    }
}

pub fn container(cloud: &Arc<FakeCloud>) -> ServiceContainer {
    ServiceContainer::with_deps(fake_settings(), cloud.clone())
}
