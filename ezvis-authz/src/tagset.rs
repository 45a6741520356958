//! Multi-tier authorization bundles.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// One of the three independent authorization tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Free-text formal tags.
    Formal,
    /// Free-text external-community tags.
    External,
    /// Numeric platform-object identifiers.
    Platform,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Formal, Tier::External, Tier::Platform];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Formal => "formal",
            Tier::External => "external",
            Tier::Platform => "platform",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authorization bundle: the tags and identifiers a requester holds,
/// partitioned into tiers.
///
/// An absent tier is the empty set, never "everything". Decoding treats a
/// missing or `null` tier the same way, so callers never see the difference.
/// Built once and not mutated afterwards; the builder methods consume `self`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        alias = "formalAuthorizations"
    )]
    formal: BTreeSet<String>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        alias = "externalCommunityAuthorizations"
    )]
    external: BTreeSet<String>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        alias = "platformObjectAuthorizations"
    )]
    platform: BTreeSet<i64>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TagSet {
    /// A bundle that claims nothing in any tier.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formal<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formal = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_external<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_platform<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        self.platform = ids.into_iter().collect();
        self
    }

    pub fn formal(&self) -> &BTreeSet<String> {
        &self.formal
    }

    pub fn external(&self) -> &BTreeSet<String> {
        &self.external
    }

    pub fn platform(&self) -> &BTreeSet<i64> {
        &self.platform
    }

    /// Number of claims held in a tier.
    pub fn tier_len(&self, tier: Tier) -> usize {
        match tier {
            Tier::Formal => self.formal.len(),
            Tier::External => self.external.len(),
            Tier::Platform => self.platform.len(),
        }
    }

    /// Whether every tier is empty.
    pub fn is_empty(&self) -> bool {
        self.formal.is_empty() && self.external.is_empty() && self.platform.is_empty()
    }

    /// Whether this bundle's claims in `tier` are a subset of `other`'s.
    pub fn tier_within(&self, other: &TagSet, tier: Tier) -> bool {
        match tier {
            Tier::Formal => self.formal.is_subset(&other.formal),
            Tier::External => self.external.is_subset(&other.external),
            Tier::Platform => self.platform.is_subset(&other.platform),
        }
    }

    /// Whether this bundle never exceeds `other` in any tier.
    pub fn is_dominated_by(&self, other: &TagSet) -> bool {
        crate::dominance::dominates(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_accessors() {
        let tags = TagSet::new()
            .with_formal(["U", "S"])
            .with_external(vec!["FVEY".to_string()])
            .with_platform([7, 9]);

        assert!(tags.formal().contains("S"));
        assert!(tags.external().contains("FVEY"));
        assert_eq!(tags.tier_len(Tier::Platform), 2);
        assert!(!tags.is_empty());
        assert!(TagSet::new().is_empty());
    }

    #[test]
    fn test_decode_missing_and_null_tiers_as_empty() {
        let tags: TagSet = serde_json::from_str(r#"{"formal": ["U"], "external": null}"#)
            .expect("valid bundle");
        assert_eq!(tags.tier_len(Tier::Formal), 1);
        assert!(tags.external().is_empty());
        assert!(tags.platform().is_empty());
    }

    #[test]
    fn test_decode_host_field_names() {
        let tags: TagSet = serde_json::from_str(
            r#"{
                "formalAuthorizations": ["U", "S"],
                "externalCommunityAuthorizations": ["FVEY"],
                "platformObjectAuthorizations": [1, 2]
            }"#,
        )
        .expect("valid bundle");
        assert_eq!(tags.tier_len(Tier::Formal), 2);
        assert_eq!(tags.tier_len(Tier::External), 1);
        assert_eq!(tags.platform(), &BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::Formal.to_string(), "formal");
        assert_eq!(Tier::Platform.to_string(), "platform");
    }
}
