//! Request-access affordance shown to callers without regular views.

use serde::Serialize;

use crate::policy::{RolePolicy, DEFAULT_ADMIN_EMAIL};
use crate::types::RequestContext;

const SUBJECT: &str = "Access Request - Predictive Maintenance Hub";

/// A pre-filled access request addressed to the policy administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRequest {
    /// Administrator contact
    pub admin_email: String,
    /// Requesting caller's email
    pub requester_email: String,
}

impl AccessRequest {
    /// Build a request for the caller.
    ///
    /// Uses the policy's administrator when a snapshot is available.
    pub fn new(ctx: &RequestContext, policy: Option<&RolePolicy>) -> Self {
        Self {
            admin_email: policy
                .map(|p| p.admin_email().to_string())
                .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            requester_email: ctx.email().to_string(),
        }
    }

    /// Message body naming the requester.
    pub fn body(&self) -> String {
        format!(
            "Hello,\n\nI would like to request access to the Predictive Maintenance Intelligence Hub.\n\nUser email: {}\n\nThank you.",
            self.requester_email
        )
    }

    /// `mailto:` link with an encoded subject and body.
    pub fn mailto(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.admin_email,
            urlencoding::encode(SUBJECT),
            urlencoding::encode(&self.body())
        )
    }
}
