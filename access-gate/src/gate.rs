//! View gate decisions.

use tracing::{debug, warn};

use crate::policy::{PolicySource, RolePolicy, TabGrant, NO_ACCESS_ROLE};
use crate::types::{Identity, View, ViewSet};

/// Decide which views an identity may see under a policy snapshot.
///
/// - No identity resolves as the `no_access` role.
/// - A role missing from the policy falls back to the `no_access` entry.
/// - `no_access` only ever sees the request-access view, whatever its `tabs` say.
/// - No policy snapshot (unavailable or invalid) fails closed to an empty set.
pub fn resolve(identity: Option<&Identity>, policy: Option<&RolePolicy>) -> ViewSet {
    let requested_role = identity
        .map(|i| i.role.trim())
        .filter(|r| !r.is_empty())
        .unwrap_or(NO_ACCESS_ROLE);

    let Some(policy) = policy else {
        return ViewSet::empty(requested_role);
    };

    let (role, entry) = match policy.role(requested_role) {
        Some(entry) => (requested_role, entry),
        None => match policy.no_access() {
            Some(entry) => {
                debug!(role = %requested_role, "Role not in policy, using no_access");
                (NO_ACCESS_ROLE, entry)
            }
            None => return ViewSet::empty(NO_ACCESS_ROLE),
        },
    };

    if role == NO_ACCESS_ROLE {
        return ViewSet::request_access_only(role);
    }

    match &entry.tabs {
        TabGrant::All => ViewSet::all_regular(role),
        TabGrant::Named(names) => {
            let views = names.iter().filter_map(|name| {
                let view = View::from_name(name);
                if view.is_none() {
                    warn!(role = %role, tab = %name, "Ignoring unknown view in policy");
                }
                view
            });
            ViewSet::from_regular(role, views)
        }
    }
}

/// Gate that reads a fresh policy snapshot for every decision.
pub struct AccessGate<S: PolicySource> {
    source: S,
}

impl<S: PolicySource> AccessGate<S> {
    /// Create a gate over a policy source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying policy source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load the current policy, logging why it is unavailable.
    pub fn snapshot(&self) -> Option<RolePolicy> {
        match self.source.load() {
            Ok(policy) => Some(policy),
            Err(e) => {
                warn!(
                    source = %self.source.describe(),
                    error = %e,
                    "Role policy unavailable, failing closed"
                );
                None
            }
        }
    }

    /// Resolve an identity against the current policy.
    pub fn decide(&self, identity: Option<&Identity>) -> ViewSet {
        let policy = self.snapshot();
        resolve(identity, policy.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::StaticPolicySource;

    const POLICY: &str = r#"
roles:
  admin:
    tabs: all
  viewer:
    tabs: [Overview]
  engineer:
    tabs: [Engine Health, Overview, Warp Drive]
  no_access:
    tabs: [Overview, Admin]
"#;

    fn policy() -> RolePolicy {
        RolePolicy::from_yaml(POLICY).unwrap()
    }

    #[test]
    fn test_viewer_sees_only_listed_view() {
        let id = Identity::new("v@example.com", "viewer");
        let set = resolve(Some(&id), Some(&policy()));
        assert_eq!(set.views(), &[View::Overview]);
    }

    #[test]
    fn test_all_tabs() {
        let id = Identity::new("a@example.com", "admin");
        let set = resolve(Some(&id), Some(&policy()));
        assert_eq!(set.views(), &View::REGULAR);
    }

    #[test]
    fn test_no_access_ignores_tabs() {
        let id = Identity::new("n@example.com", "no_access");
        let set = resolve(Some(&id), Some(&policy()));
        assert_eq!(set.views(), &[View::RequestAccess]);
    }

    #[test]
    fn test_unknown_and_missing_role_fall_back() {
        let unknown = Identity::new("u@example.com", "contractor");
        assert_eq!(
            resolve(Some(&unknown), Some(&policy())).views(),
            &[View::RequestAccess]
        );
        assert_eq!(resolve(None, Some(&policy())).views(), &[View::RequestAccess]);
        let blank = Identity::new("b@example.com", "  ");
        assert_eq!(resolve(Some(&blank), Some(&policy())).role, "no_access");
    }

    #[test]
    fn test_canonical_order_and_unknown_names() {
        let id = Identity::new("e@example.com", "engineer");
        let set = resolve(Some(&id), Some(&policy()));
        assert_eq!(set.views(), &[View::Overview, View::EngineHealth]);
    }

    #[test]
    fn test_no_policy_fails_closed() {
        let id = Identity::new("a@example.com", "admin");
        let set = resolve(Some(&id), None);
        assert!(set.is_empty());
        assert!(set.shows_request_access());
    }

    #[test]
    fn test_gate_fails_closed_on_bad_policy() {
        let gate = AccessGate::new(StaticPolicySource::new("roles:\n  admin:\n    tabs: all\n"));
        let id = Identity::new("a@example.com", "admin");
        assert!(gate.decide(Some(&id)).is_empty());
    }

    #[test]
    fn test_gate_reads_policy() {
        let gate = AccessGate::new(StaticPolicySource::new(POLICY));
        let id = Identity::new("v@example.com", "viewer");
        assert!(gate.decide(Some(&id)).contains(View::Overview));
    }
}
