//! # ezvis
//!
//! Convenience crate that re-exports the visibility expression engine and the
//! authorization dominance check, plus fail-closed helpers for host adapters.
//!
//! For just one primitive, depend on `ezvis-expr` or `ezvis-authz` directly.
//!
//! # Quick Start
//!
//! ```rust
//! use ezvis::{dominates, ExpressionEngine, TagSet, VisibilityFilter};
//!
//! let engine = ExpressionEngine::default();
//!
//! // The requester's authorization bundle, decoded by the adapter.
//! let auths = TagSet::new()
//!     .with_formal(["S", "USA"])
//!     .with_external(["FVEY"]);
//!
//! let filter = VisibilityFilter::new(engine, auths.clone());
//! assert!(filter.formal_visible("S&(USA|GBR)"));
//! assert!(!filter.formal_visible("TS&USA"));
//!
//! // Malformed markings are denied, never granted.
//! assert!(!filter.formal_visible("S&USA|GBR"));
//!
//! // A narrowed bundle never exceeds the one it came from.
//! let narrowed = TagSet::new().with_formal(["S"]);
//! assert!(dominates(&narrowed, &auths));
//! ```

pub mod visibility;

// Re-export everything from the component crates
pub use ezvis_authz::*;
pub use ezvis_expr::*;

pub use visibility::{is_visible, redaction_list, VisibilityFilter};
