use std::collections::BTreeMap;

use crate::parse::operation::{HttpMethod, Operation};
use crate::parse::spec::ApiSpec;

/// Tag for operations that declare none.
pub const DEFAULT_TAG: &str = "default";

/// One `(path, method)` pair of the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointEntry<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    pub operation: &'a Operation,
}

impl EndpointEntry<'_> {
    fn matches(&self, query: &str) -> bool {
        let contains = |field: Option<&str>| {
            field.is_some_and(|text| text.to_lowercase().contains(query))
        };
        contains(Some(self.path))
            || contains(Some(self.method.key()))
            || contains(self.operation.summary.as_deref())
            || contains(self.operation.description.as_deref())
    }
}

/// Endpoints bucketed by owning tag. Tags iterate in ascending order; entries
/// within a tag keep document order (path order, then method order).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EndpointIndex<'a> {
    groups: BTreeMap<String, Vec<EndpointEntry<'a>>>,
}

impl<'a> EndpointIndex<'a> {
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[EndpointEntry<'a>])> {
        self.groups.iter().map(|(tag, entries)| (tag.as_str(), entries.as_slice()))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn get(&self, tag: &str) -> Option<&[EndpointEntry<'a>]> {
        self.groups.get(tag).map(Vec::as_slice)
    }

    /// All entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &EndpointEntry<'a>> {
        self.groups.values().flatten()
    }

    pub fn find(&self, path: &str, method: HttpMethod) -> Option<&EndpointEntry<'a>> {
        self.entries().find(|e| e.path == path && e.method == method)
    }

    /// Number of endpoints across all tags.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Bucket every operation under its first tag, or [`DEFAULT_TAG`].
pub fn group_by_tag(spec: &ApiSpec) -> EndpointIndex<'_> {
    let mut groups: BTreeMap<String, Vec<EndpointEntry<'_>>> = BTreeMap::new();

    for (path, item) in &spec.paths {
        for (method, operation) in &item.operations {
            let tag = operation
                .tags
                .first()
                .map(String::as_str)
                .unwrap_or(DEFAULT_TAG);
            groups.entry(tag.to_string()).or_default().push(EndpointEntry {
                path,
                method: *method,
                operation,
            });
        }
    }

    EndpointIndex { groups }
}

/// Keep entries whose path, method, summary or description contains `query`,
/// ignoring case. Tags left without entries are dropped; a blank query keeps
/// everything.
pub fn filter<'a>(index: &EndpointIndex<'a>, query: &str) -> EndpointIndex<'a> {
    if query.trim().is_empty() {
        return index.clone();
    }

    let query = query.to_lowercase();
    let groups = index
        .groups
        .iter()
        .filter_map(|(tag, entries)| {
            let matching: Vec<EndpointEntry<'a>> =
                entries.iter().filter(|e| e.matches(&query)).copied().collect();
            (!matching.is_empty()).then(|| (tag.clone(), matching))
        })
        .collect();

    EndpointIndex { groups }
}
