//! Core types for view gating.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::policy::NO_ACCESS_ROLE;

/// Email recorded for callers without a resolved identity.
pub const ANONYMOUS_EMAIL: &str = "unknown";

/// A dashboard view.
///
/// Declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum View {
    /// Fleet-wide KPI cards and anomaly alerts
    Overview,
    /// CNC tool-wear and failure analysis
    CncAnalysis,
    /// Turbofan remaining-useful-life tracking
    EngineHealth,
    /// Phase fault and transformer monitoring
    ElectricalMonitor,
    /// Heater voltage degradation
    HeaterHealth,
    /// Audit trail browser
    AuditLog,
    /// Administration
    Admin,
    /// Shown to callers without access
    RequestAccess,
}

impl View {
    /// Regular views in canonical order. Excludes [`View::RequestAccess`].
    pub const REGULAR: [View; 7] = [
        View::Overview,
        View::CncAnalysis,
        View::EngineHealth,
        View::ElectricalMonitor,
        View::HeaterHealth,
        View::AuditLog,
        View::Admin,
    ];

    /// Name used in the policy resource and in the UI.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::CncAnalysis => "CNC Analysis",
            Self::EngineHealth => "Engine Health",
            Self::ElectricalMonitor => "Electrical Monitor",
            Self::HeaterHealth => "Heater Health",
            Self::AuditLog => "Audit Log",
            Self::Admin => "Admin",
            Self::RequestAccess => "Request Access",
        }
    }

    /// Look up a regular view by its policy name.
    ///
    /// `Request Access` is never grantable through a policy, so it is not matched.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::REGULAR.into_iter().find(|v| v.name() == name)
    }

    /// Whether this is a regular (grantable) view.
    pub fn is_regular(&self) -> bool {
        *self != Self::RequestAccess
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved caller identity, immutable for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Caller email
    pub email: String,
    /// Role name as assigned by the identity resolver
    pub role: String,
}

impl Identity {
    /// Create an identity.
    pub fn new(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: role.into(),
        }
    }
}

/// Per-request context passed explicitly into every gate and audit call.
///
/// Session values such as the current conversation id stay with the caller;
/// this only carries who is calling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Caller identity, `None` for anonymous requests
    pub identity: Option<Identity>,
}

impl RequestContext {
    /// Context for an identified caller.
    pub fn identified(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Context for an anonymous caller.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Email to record for this caller.
    pub fn email(&self) -> &str {
        self.identity
            .as_ref()
            .map(|i| i.email.as_str())
            .unwrap_or(ANONYMOUS_EMAIL)
    }

    /// Role to record for this caller.
    pub fn role(&self) -> &str {
        self.identity
            .as_ref()
            .map(|i| i.role.as_str())
            .unwrap_or(NO_ACCESS_ROLE)
    }
}

/// The views a caller may see, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSet {
    /// Role the decision was made for (after fallback)
    pub role: String,
    views: Vec<View>,
}

impl ViewSet {
    /// Fail-closed result: nothing visible.
    pub fn empty(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            views: Vec::new(),
        }
    }

    /// Only the request-access view.
    pub fn request_access_only(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            views: vec![View::RequestAccess],
        }
    }

    /// Build from regular views in any order; result is canonical and deduplicated.
    pub fn from_regular(role: impl Into<String>, views: impl IntoIterator<Item = View>) -> Self {
        let mut views: Vec<View> = views.into_iter().filter(View::is_regular).collect();
        views.sort();
        views.dedup();
        Self {
            role: role.into(),
            views,
        }
    }

    /// Every regular view.
    pub fn all_regular(role: impl Into<String>) -> Self {
        Self::from_regular(role, View::REGULAR)
    }

    /// Visible views in canonical order.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Whether a view is visible.
    pub fn contains(&self, view: View) -> bool {
        self.views.contains(&view)
    }

    /// Whether nothing at all is visible.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Whether the caller has at least one regular view.
    pub fn has_regular_views(&self) -> bool {
        self.views.iter().any(View::is_regular)
    }

    /// Whether the UI must offer the request-access affordance.
    ///
    /// True whenever no regular view is granted, including the fail-closed case.
    pub fn shows_request_access(&self) -> bool {
        !self.has_regular_views()
    }
}
