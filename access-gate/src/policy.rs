//! Declarative role policy.
//!
//! The policy resource is YAML of the shape:
//!
//! ```yaml
//! admin_email: ops-admin@example.com
//! roles:
//!   admin:     { tabs: all }
//!   viewer:    { tabs: [Overview, Engine Health] }
//!   no_access: { tabs: [] }
//! ```
//!
//! Parsing is strict: a missing `roles` map, a missing `no_access` entry, or an
//! entry without a usable `tabs` value rejects the whole document. There is no
//! partially-populated policy.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reserved role for callers without access.
pub const NO_ACCESS_ROLE: &str = "no_access";

/// Contact used when the policy does not name an administrator.
pub const DEFAULT_ADMIN_EMAIL: &str = "maintenance-admin@example.com";

/// Keyword granting every regular view.
const ALL_TABS_KEYWORD: &str = "all";

/// Error types for policy loading.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Resource could not be read
    #[error("Policy unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// Resource is not valid YAML for the policy shape
    #[error("Policy parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Top-level `roles` map is absent
    #[error("Policy has no `roles` map")]
    MissingRoles,

    /// Reserved `no_access` role is absent
    #[error("Policy has no `no_access` role")]
    MissingNoAccess,

    /// A role's `tabs` is neither a list nor the keyword `all`
    #[error("Role `{role}` has invalid tabs")]
    InvalidTabs { role: String },
}

/// Which views a role is granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabGrant {
    /// Every regular view
    All,
    /// Named views (config order, not display order)
    Named(Vec<String>),
}

/// A role entry in the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEntry {
    /// Granted views
    pub tabs: TabGrant,
}

/// Validated role policy snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    roles: HashMap<String, RoleEntry>,
    admin_email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPolicy {
    #[serde(default)]
    roles: Option<HashMap<String, RawRoleEntry>>,
    #[serde(default)]
    admin_email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRoleEntry {
    #[serde(default)]
    tabs: Option<RawTabs>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTabs {
    Keyword(String),
    Names(Vec<String>),
}

impl RolePolicy {
    /// Parse and validate a policy document.
    pub fn from_yaml(yaml: &str) -> Result<Self, PolicyError> {
        let raw: RawPolicy = serde_yaml::from_str(yaml)?;
        let raw_roles = raw.roles.ok_or(PolicyError::MissingRoles)?;

        let mut roles = HashMap::with_capacity(raw_roles.len());
        for (role, entry) in raw_roles {
            let tabs = match entry.tabs {
                Some(RawTabs::Names(names)) => TabGrant::Named(names),
                Some(RawTabs::Keyword(word)) if word.trim().eq_ignore_ascii_case(ALL_TABS_KEYWORD) => {
                    TabGrant::All
                }
                _ => return Err(PolicyError::InvalidTabs { role }),
            };
            roles.insert(role, RoleEntry { tabs });
        }

        if !roles.contains_key(NO_ACCESS_ROLE) {
            return Err(PolicyError::MissingNoAccess);
        }

        Ok(Self {
            roles,
            admin_email: raw.admin_email.filter(|e| !e.trim().is_empty()),
        })
    }

    /// Look up a role entry.
    pub fn role(&self, name: &str) -> Option<&RoleEntry> {
        self.roles.get(name)
    }

    /// The reserved `no_access` entry. Always present after validation.
    pub fn no_access(&self) -> Option<&RoleEntry> {
        self.roles.get(NO_ACCESS_ROLE)
    }

    /// Configured role names.
    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Administrator contact, falling back to [`DEFAULT_ADMIN_EMAIL`].
    pub fn admin_email(&self) -> &str {
        self.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL)
    }
}

/// Where policy snapshots are read from.
///
/// Implementations must not cache: each call reflects the resource as it is now.
pub trait PolicySource: Send + Sync {
    /// Read and validate the current policy.
    fn load(&self) -> Result<RolePolicy, PolicyError>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// Policy read from a YAML file on every call.
#[derive(Debug, Clone)]
pub struct FilePolicySource {
    path: PathBuf,
}

impl FilePolicySource {
    /// Create a source for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The policy file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PolicySource for FilePolicySource {
    fn load(&self) -> Result<RolePolicy, PolicyError> {
        let text = std::fs::read_to_string(&self.path)?;
        RolePolicy::from_yaml(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Policy held in memory as YAML text.
#[derive(Debug, Clone)]
pub struct StaticPolicySource {
    yaml: String,
}

impl StaticPolicySource {
    /// Create a source from YAML text.
    pub fn new(yaml: impl Into<String>) -> Self {
        Self { yaml: yaml.into() }
    }
}

impl PolicySource for StaticPolicySource {
    fn load(&self) -> Result<RolePolicy, PolicyError> {
        RolePolicy::from_yaml(&self.yaml)
    }

    fn describe(&self) -> String {
        "static policy".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: &str = r#"
admin_email: boss@example.com
roles:
  admin:
    tabs: all
  viewer:
    tabs: [Overview, Engine Health]
  no_access:
    tabs: []
"#;

    #[test]
    fn test_parse_valid_policy() {
        let policy = RolePolicy::from_yaml(POLICY).unwrap();
        assert_eq!(policy.role("admin").unwrap().tabs, TabGrant::All);
        assert_eq!(
            policy.role("viewer").unwrap().tabs,
            TabGrant::Named(vec!["Overview".to_string(), "Engine Health".to_string()])
        );
        assert_eq!(policy.no_access().unwrap().tabs, TabGrant::Named(vec![]));
        assert_eq!(policy.admin_email(), "boss@example.com");
    }

    #[test]
    fn test_missing_roles() {
        let err = RolePolicy::from_yaml("admin_email: a@b.c\n").unwrap_err();
        assert!(matches!(err, PolicyError::MissingRoles));
    }

    #[test]
    fn test_missing_no_access() {
        let err = RolePolicy::from_yaml("roles:\n  viewer:\n    tabs: [Overview]\n").unwrap_err();
        assert!(matches!(err, PolicyError::MissingNoAccess));
    }

    #[test]
    fn test_bad_keyword_rejected() {
        let yaml = "roles:\n  viewer:\n    tabs: everything\n  no_access:\n    tabs: []\n";
        let err = RolePolicy::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidTabs { role } if role == "viewer"));
    }

    #[test]
    fn test_missing_tabs_rejected() {
        let yaml = "roles:\n  no_access: {}\n";
        let err = RolePolicy::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidTabs { .. }));
    }

    #[test]
    fn test_unparseable() {
        let err = RolePolicy::from_yaml("roles: [unclosed").unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }

    #[test]
    fn test_admin_email_fallback() {
        let policy = RolePolicy::from_yaml("roles:\n  no_access:\n    tabs: []\n").unwrap();
        assert_eq!(policy.admin_email(), DEFAULT_ADMIN_EMAIL);
    }
}
