//! Domain entities: share type records, resource categories, CLI values

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::{DomainError, DomainResult};

/// One parsed table row, keyed by column header.
pub type Record = BTreeMap<String, String>;

/// Extra spec every share type carries.
pub const DHSS_EXTRA_SPEC: &str = "driver_handles_share_servers";

/// Prefix used for generated resource names.
pub const DEFAULT_NAME_PREFIX: &str = "manilaclient_functional_test";

/// Resource categories the deletion waiter knows how to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    ShareType,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::ShareType => "share_type",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "share_type" => Ok(ResourceType::ShareType),
            other => Err(DomainError::InvalidResource {
                res_type: other.to_string(),
            }),
        }
    }
}

/// A boolean-ish CLI argument.
///
/// The manila CLI spells booleans `True`/`False`; string aliases
/// (`"false"`, `"0"`, ...) are passed through untouched so the CLI
/// can validate them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliFlag(String);

impl CliFlag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<bool> for CliFlag {
    fn from(value: bool) -> Self {
        CliFlag(if value { "True" } else { "False" }.to_string())
    }
}

impl From<&str> for CliFlag {
    fn from(value: &str) -> Self {
        CliFlag(value.to_string())
    }
}

impl From<String> for CliFlag {
    fn from(value: String) -> Self {
        CliFlag(value)
    }
}

impl fmt::Display for CliFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Share type as reported by `type-create` / `type-list`.
///
/// Wraps the raw record; `ID` and `Name` are guaranteed present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareType {
    record: Record,
}

impl ShareType {
    /// Build from a parsed table row, validating the identifying columns.
    pub fn from_record(record: Record) -> DomainResult<Self> {
        for column in ["ID", "Name"] {
            if !record.contains_key(column) {
                return Err(DomainError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }
        Ok(Self { record })
    }

    pub fn id(&self) -> &str {
        self.record.get("ID").map(String::as_str).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.record.get("Name").map(String::as_str).unwrap_or_default()
    }

    /// `Visibility` column; older CLI releases print it lowercase.
    pub fn visibility(&self) -> Option<&str> {
        self.get("Visibility").or_else(|| self.get("visibility"))
    }

    pub fn is_public(&self) -> Option<bool> {
        self.visibility().map(|v| v.eq_ignore_ascii_case("public"))
    }

    pub fn is_default(&self) -> Option<&str> {
        self.get("is_default")
    }

    pub fn required_extra_specs(&self) -> Option<&str> {
        self.get("required_extra_specs")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.record.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.record.contains_key(key)
    }

    /// Matches either the ID or the name.
    pub fn matches(&self, name_or_id: &str) -> bool {
        self.id() == name_or_id || self.name() == name_or_id
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

/// Rendering of the DHSS extra spec in `required_extra_specs`.
pub fn dhss_extra_spec(dhss: &CliFlag) -> String {
    format!("{} : {}", DHSS_EXTRA_SPEC, dhss)
}

/// Random resource name: `<prefix>-<n>` with `n` uniform in `1..=0x7fffffff`.
pub fn rand_name(prefix: &str) -> String {
    let n = loop {
        if let Some(n) = name_suffix(uuid::Uuid::new_v4().as_u128()) {
            break n;
        }
    };
    format!("{}-{}", prefix, n)
}

/// Low 31 bits of `bits`; zero is rejected so the caller draws again.
fn name_suffix(bits: u128) -> Option<u32> {
    match (bits as u32) & 0x7fff_ffff {
        0 => None,
        n => Some(n),
    }
}
