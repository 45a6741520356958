//! # ezvis authorization dominance
//!
//! Checks that one authorization bundle never exceeds another.
//!
//! A `TagSet` holds three independent tiers: formal tags, external-community
//! tags and numeric platform-object ids. `dominates(to_check, against)` holds
//! when `to_check` is a subset of `against` in every tier, e.g. when
//! validating that a narrowed token is a legitimate restriction of the
//! token it was derived from.

mod dominance;
mod tagset;

pub use dominance::{dominates, DominanceReport};
pub use tagset::{TagSet, Tier};
