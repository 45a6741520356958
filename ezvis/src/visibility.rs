//! Fail-closed visibility checks for host adapters.
//!
//! A stored marking that cannot be parsed or normalized makes the record
//! inaccessible. These helpers log the failure and deny rather than hand the
//! error back to a caller that might default to granting.

use tracing::error;

use ezvis_authz::TagSet;
use ezvis_expr::{ExpressionEngine, ExpressionError, HeldTerms};

/// Parse `marking` and evaluate it against `held`.
///
/// An empty marking is visible. Any parse error is logged and denies access.
pub fn is_visible<H: HeldTerms + ?Sized>(engine: &ExpressionEngine, marking: &str, held: &H) -> bool {
    match engine.check(marking, held) {
        Ok(visible) => visible,
        Err(e) => {
            error!(marking, error = %e, "visibility marking rejected; denying access");
            false
        }
    }
}

/// Normalize `marking` into the nested list used for a downstream redaction
/// predicate.
///
/// Unlike [`is_visible`] this returns the error: the caller is building a
/// query and must refuse to issue it rather than issue an unfiltered one.
pub fn redaction_list(
    engine: &ExpressionEngine,
    marking: &str,
) -> Result<Vec<Vec<String>>, ExpressionError> {
    let form = engine.normalize_text(marking).map_err(|e| {
        error!(marking, error = %e, "cannot build redaction predicate");
        e
    })?;
    Ok(form.into_redaction_list())
}

/// A requester's view of marked records.
///
/// Formal markings are checked against the formal tier and external-community
/// markings against the external tier. The two checks are kept separate: how
/// they combine into a read/write/manage grant is decided by the permission
/// layer above this one.
#[derive(Debug, Clone)]
pub struct VisibilityFilter {
    engine: ExpressionEngine,
    auths: TagSet,
}

impl VisibilityFilter {
    pub fn new(engine: ExpressionEngine, auths: TagSet) -> Self {
        Self { engine, auths }
    }

    pub fn engine(&self) -> &ExpressionEngine {
        &self.engine
    }

    pub fn authorizations(&self) -> &TagSet {
        &self.auths
    }

    /// Whether the formal marking is satisfied by the formal tier.
    pub fn formal_visible(&self, marking: &str) -> bool {
        is_visible(&self.engine, marking, self.auths.formal())
    }

    /// Whether the external-community marking is satisfied by the external tier.
    pub fn external_visible(&self, marking: &str) -> bool {
        is_visible(&self.engine, marking, self.auths.external())
    }

    /// Whether the platform-object ids permitted by a record include one the
    /// requester holds. An empty permitted list means the record does not
    /// restrict by platform object.
    pub fn platform_visible(&self, permitted: &[i64]) -> bool {
        permitted.is_empty() || permitted.iter().any(|id| self.auths.platform().contains(id))
    }
}
