//! Result grouping component.

use serde_json::Value;

use crate::component::registry::ComponentHandler;
use crate::component::{Component, ComponentKind, SubResult};
use crate::query::params::SortOrder;
use crate::request::Params;
use crate::response::DocumentList;
use crate::util::{as_u64, value_to_string};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grouping {
    /// Fields to group by, one group set per field.
    pub fields: Vec<String>,
    /// Queries to group by, one group per query.
    pub queries: Vec<String>,
    /// Documents per group.
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sorts: Vec<(String, SortOrder)>,
    /// Return the first group set as the main result list.
    pub main: Option<bool>,
    /// Report the number of groups.
    pub ngroups: Option<bool>,
    /// Compute facets per group instead of per document.
    pub facet: Option<bool>,
    /// `grouped` or `simple`.
    pub format: Option<String>,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.queries.push(query.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sorts.push((field.into(), order));
        self
    }

    pub fn with_main(mut self, main: bool) -> Self {
        self.main = Some(main);
        self
    }

    pub fn with_ngroups(mut self, ngroups: bool) -> Self {
        self.ngroups = Some(ngroups);
        self
    }

    pub fn with_facet(mut self, facet: bool) -> Self {
        self.facet = Some(facet);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    fn write_params(&self, params: &mut Params) {
        params.set("group", "true");
        for field in &self.fields {
            params.add("group.field", field.clone());
        }
        for query in &self.queries {
            params.add("group.query", query.clone());
        }
        params.add_opt("group.limit", self.limit);
        params.add_opt("group.offset", self.offset);
        if !self.sorts.is_empty() {
            let sort: Vec<String> = self
                .sorts
                .iter()
                .map(|(field, order)| format!("{field} {order}"))
                .collect();
            params.add("group.sort", sort.join(","));
        }
        params.add_opt("group.main", self.main);
        params.add_opt("group.ngroups", self.ngroups);
        params.add_opt("group.facet", self.facet);
        params.add_opt("group.format", self.format.as_deref());
    }
}

/// One group of a field grouping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    /// `None` for the group of documents without a value.
    pub value: Option<String>,
    pub documents: DocumentList,
}

/// Groups of one grouping command (a field or a query).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupSet {
    pub matches: u64,
    pub ngroups: Option<u64>,
    pub groups: Vec<Group>,
    /// Set for query groups and the `simple` format.
    pub documents: Option<DocumentList>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupingResult {
    /// Keyed by the grouped field or query, in server order.
    pub sets: Vec<(String, GroupSet)>,
}

impl GroupingResult {
    pub fn set(&self, name: &str) -> Option<&GroupSet> {
        self.sets
            .iter()
            .find(|(set, _)| set == name)
            .map(|(_, set)| set)
    }

    fn parse(section: &Value) -> Option<Self> {
        let sets = section
            .as_object()?
            .iter()
            .filter_map(|(name, set)| parse_set(set).map(|set| (name.clone(), set)))
            .collect();
        Some(Self { sets })
    }
}

fn parse_set(value: &Value) -> Option<GroupSet> {
    let object = value.as_object()?;
    let groups = object
        .get("groups")
        .and_then(Value::as_array)
        .map(|groups| {
            groups
                .iter()
                .map(|group| Group {
                    value: group
                        .get("groupValue")
                        .filter(|v| !v.is_null())
                        .map(value_to_string),
                    documents: group
                        .get("doclist")
                        .and_then(DocumentList::parse)
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();
    Some(GroupSet {
        matches: object.get("matches").and_then(as_u64).unwrap_or_default(),
        ngroups: object.get("ngroups").and_then(as_u64),
        groups,
        documents: object.get("doclist").and_then(DocumentList::parse),
    })
}

pub(crate) const HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::Grouping,
    build,
    parse,
};

fn build(component: &Component, params: &mut Params) {
    if let Component::Grouping(grouping) = component {
        grouping.write_params(params);
    }
}

fn parse(_component: &Component, body: &Value) -> Option<SubResult> {
    GroupingResult::parse(body.get("grouped")?).map(SubResult::Grouping)
}
