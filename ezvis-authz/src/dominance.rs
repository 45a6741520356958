//! Tier-by-tier dominance between authorization bundles.
//!
//! `to_check` is dominated by `against` when, in every tier, each claim of
//! `to_check` also appears in `against`. A tier that `to_check` leaves empty
//! passes regardless of `against`.

use tracing::debug;

use crate::tagset::{TagSet, Tier};

/// Whether `to_check` never exceeds `against` in any tier.
///
/// Total: absent tiers are empty sets, so this never fails. Stops at the
/// first tier that exceeds.
pub fn dominates(to_check: &TagSet, against: &TagSet) -> bool {
    for tier in Tier::ALL {
        if !to_check.tier_within(against, tier) {
            debug!(%tier, "authorization bundle exceeds reference bundle");
            return false;
        }
    }
    true
}

/// Per-tier outcome of comparing two bundles, including the claims that
/// exceeded the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DominanceReport {
    formal_excess: Vec<String>,
    external_excess: Vec<String>,
    platform_excess: Vec<i64>,
}

impl DominanceReport {
    /// Compare every tier without stopping early.
    pub fn compare(to_check: &TagSet, against: &TagSet) -> Self {
        Self {
            formal_excess: to_check
                .formal()
                .difference(against.formal())
                .cloned()
                .collect(),
            external_excess: to_check
                .external()
                .difference(against.external())
                .cloned()
                .collect(),
            platform_excess: to_check
                .platform()
                .difference(against.platform())
                .copied()
                .collect(),
        }
    }

    /// Overall result: every tier passed.
    pub fn holds(&self) -> bool {
        Tier::ALL.iter().all(|tier| self.tier_holds(*tier))
    }

    pub fn tier_holds(&self, tier: Tier) -> bool {
        match tier {
            Tier::Formal => self.formal_excess.is_empty(),
            Tier::External => self.external_excess.is_empty(),
            Tier::Platform => self.platform_excess.is_empty(),
        }
    }

    /// Tiers in which `to_check` claimed something `against` lacks.
    pub fn exceeding_tiers(&self) -> Vec<Tier> {
        Tier::ALL
            .into_iter()
            .filter(|tier| !self.tier_holds(*tier))
            .collect()
    }

    /// Formal tags held by `to_check` but not by `against`, sorted.
    pub fn formal_excess(&self) -> &[String] {
        &self.formal_excess
    }

    /// External-community tags held by `to_check` but not by `against`, sorted.
    pub fn external_excess(&self) -> &[String] {
        &self.external_excess
    }

    /// Platform ids held by `to_check` but not by `against`, sorted.
    pub fn platform_excess(&self) -> &[i64] {
        &self.platform_excess
    }
}
