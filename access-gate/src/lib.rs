//! Access Control Gate for the Maintenance Hub
//!
//! Resolves a caller to the set of views it may see:
//!
//! ```text
//! Identity ──► role ──► RolePolicy entry ──► ViewSet
//!    (none = "no_access")        (read fresh per decision)
//! ```
//!
//! # Key Components
//!
//! - [`RolePolicy`]: Typed, validated form of the declarative `roles.yaml` resource
//! - [`PolicySource`]: Where a policy snapshot is read from (file, static text)
//! - [`resolve`]: Pure decision function over an identity and a policy snapshot
//! - [`AccessGate`]: Loads a fresh snapshot per call and resolves it, failing closed
//! - [`AccessRequest`]: The pre-filled request-access link shown to gated users
//!
//! # Example
//!
//! ```ignore
//! use access_gate::{AccessGate, FilePolicySource, Identity};
//!
//! let gate = AccessGate::new(FilePolicySource::new("governance/roles.yaml"));
//! let identity = Identity::new("ops@example.com", "viewer");
//! let views = gate.decide(Some(&identity));
//! ```

pub mod gate;
pub mod policy;
pub mod request;
pub mod types;

// Re-export main types
pub use gate::{resolve, AccessGate};
pub use policy::{
    FilePolicySource, PolicyError, PolicySource, RoleEntry, RolePolicy, StaticPolicySource,
    TabGrant, DEFAULT_ADMIN_EMAIL, NO_ACCESS_ROLE,
};
pub use request::AccessRequest;
pub use types::*;
