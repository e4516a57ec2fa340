//! Typed query options for the repository's sites endpoints.
//!
//! Defaults are explicit and callers override them field by field through
//! [`SiteListOverrides`]; a field left `None` keeps the default.
use std::collections::BTreeSet;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteListOptions {
    pub skip_count: u32,
    pub max_items: Option<u32>,
    pub include: BTreeSet<String>,
    pub relations: BTreeSet<String>,
    pub where_clause: Option<String>,
}

impl Default for SiteListOptions {
    fn default() -> Self {
        Self {
            skip_count: 0,
            max_items: None,
            include: BTreeSet::from(["properties".to_string()]),
            relations: BTreeSet::new(),
            where_clause: None,
        }
    }
}

/// Caller-supplied overrides, e.g. deserialized from `{"skipCount": 20, "maxItems": 10}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteListOverrides {
    pub skip_count: Option<u32>,
    pub max_items: Option<u32>,
    pub include: Option<BTreeSet<String>>,
    pub relations: Option<BTreeSet<String>>,
    #[serde(rename = "where")]
    pub where_clause: Option<String>,
}

impl SiteListOptions {
    /// Defaults with `overrides` applied.
    pub fn with_overrides(overrides: SiteListOverrides) -> Self {
        Self::default().merged(overrides)
    }

    /// Applies every override that is present. A present set replaces the current one.
    pub fn merged(mut self, overrides: SiteListOverrides) -> Self {
        if let Some(skip_count) = overrides.skip_count {
            self.skip_count = skip_count;
        }
        if let Some(max_items) = overrides.max_items {
            self.max_items = Some(max_items);
        }
        if let Some(include) = overrides.include {
            self.include = include;
        }
        if let Some(relations) = overrides.relations {
            self.relations = relations;
        }
        if let Some(where_clause) = overrides.where_clause {
            self.where_clause = Some(where_clause);
        }
        self
    }

    pub fn to_query(&self) -> Result<String, serde_urlencoded::ser::Error> {
        let mut pairs = vec![("skipCount", self.skip_count.to_string())];
        if let Some(max_items) = self.max_items {
            pairs.push(("maxItems", max_items.to_string()));
        }
        push_joined(&mut pairs, "include", &self.include);
        push_joined(&mut pairs, "relations", &self.relations);
        if let Some(where_clause) = &self.where_clause {
            pairs.push(("where", where_clause.clone()));
        }
        serde_urlencoded::to_string(pairs)
    }
}

/// Options for a single-site lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteOptions {
    pub relations: BTreeSet<String>,
}

impl SiteOptions {
    /// Site plus its containers (site content).
    pub fn containers() -> Self {
        Self::with_relation("containers")
    }

    /// Site plus its members.
    pub fn members() -> Self {
        Self::with_relation("members")
    }

    fn with_relation(relation: &str) -> Self {
        Self {
            relations: BTreeSet::from([relation.to_string()]),
        }
    }

    pub fn to_query(&self) -> Result<String, serde_urlencoded::ser::Error> {
        let mut pairs = Vec::new();
        push_joined(&mut pairs, "relations", &self.relations);
        serde_urlencoded::to_string(pairs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteSiteOptions {
    pub permanent: bool,
}

impl Default for DeleteSiteOptions {
    fn default() -> Self {
        Self { permanent: true }
    }
}

impl DeleteSiteOptions {
    pub fn to_query(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(vec![("permanent", self.permanent)])
    }
}

fn push_joined(pairs: &mut Vec<(&'static str, String)>, key: &'static str, set: &BTreeSet<String>) {
    if !set.is_empty() {
        let joined = set.iter().map(String::as_str).collect::<Vec<_>>().join(",");
        pairs.push((key, joined));
    }
}
