//! Facet components: field, query, range and pivot facets.
//!
//! Every facet carries a key. The key is sent as the `key` local parameter so
//! the server labels the facet's section with it, which is how several facets
//! over the same field stay apart in the response.
//!
//! Each builder always sets `facet=true`. A facet with nothing to facet on
//! (an empty field, query or pivot list) emits only that flag.

use serde_json::Value;

use crate::component::registry::ComponentHandler;
use crate::component::{Component, ComponentKind, SubResult};
use crate::request::Params;
use crate::util::{as_u64, count_list, local_params, value_to_string};

fn facet_local_params(key: Option<&str>, excludes: &[String]) -> String {
    local_params(&[
        ("key", key.unwrap_or_default().to_string()),
        ("ex", excludes.join(",")),
    ])
}

fn facet_section<'a>(body: &'a Value, section: &str, key: &str) -> Option<&'a Value> {
    body.get("facet_counts")?.get(section)?.get(key)
}

/// One value of a facet and its document count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetValue {
    /// The value; the missing-value bucket has an empty value.
    pub value: String,
    pub count: u64,
}

fn facet_values(section: &Value) -> Option<Vec<FacetValue>> {
    Some(
        count_list(section)?
            .into_iter()
            .map(|(value, count)| FacetValue { value, count })
            .collect(),
    )
}

/// Facet on the distinct values of a field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacetField {
    pub key: Option<String>,
    pub field: String,
    pub prefix: Option<String>,
    pub contains: Option<String>,
    pub contains_ignore_case: Option<bool>,
    /// `count` or `index`.
    pub sort: Option<String>,
    /// Maximum number of values, `-1` for no limit.
    pub limit: Option<i64>,
    pub offset: Option<u64>,
    pub mincount: Option<u64>,
    pub missing: Option<bool>,
    /// `enum`, `fc` or `fcs`.
    pub method: Option<String>,
    /// Tags of filter queries to ignore while counting.
    pub excludes: Vec<String>,
}

impl FacetField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_contains(mut self, contains: impl Into<String>, ignore_case: bool) -> Self {
        self.contains = Some(contains.into());
        self.contains_ignore_case = Some(ignore_case);
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_mincount(mut self, mincount: u64) -> Self {
        self.mincount = Some(mincount);
        self
    }

    pub fn with_missing(mut self, missing: bool) -> Self {
        self.missing = Some(missing);
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_exclude(mut self, tag: impl Into<String>) -> Self {
        self.excludes.push(tag.into());
        self
    }

    pub(crate) fn write_params(&self, params: &mut Params) {
        params.set("facet", "true");
        if self.field.is_empty() {
            return;
        }
        params.add(
            "facet.field",
            format!(
                "{}{}",
                facet_local_params(self.key.as_deref(), &self.excludes),
                self.field
            ),
        );
        let prefix = format!("f.{}.facet", self.field);
        params.add_opt(&format!("{prefix}.prefix"), self.prefix.as_deref());
        params.add_opt(&format!("{prefix}.contains"), self.contains.as_deref());
        params.add_opt(
            &format!("{prefix}.contains.ignoreCase"),
            self.contains_ignore_case,
        );
        params.add_opt(&format!("{prefix}.sort"), self.sort.as_deref());
        params.add_opt(&format!("{prefix}.limit"), self.limit);
        params.add_opt(&format!("{prefix}.offset"), self.offset);
        params.add_opt(&format!("{prefix}.mincount"), self.mincount);
        params.add_opt(&format!("{prefix}.missing"), self.missing);
        params.add_opt(&format!("{prefix}.method"), self.method.as_deref());
    }
}

/// Counts per value of a field facet, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacetFieldResult {
    pub values: Vec<FacetValue>,
}

impl FacetFieldResult {
    fn parse(section: &Value) -> Option<Self> {
        Some(Self {
            values: facet_values(section)?,
        })
    }

    /// Count for one value.
    pub fn get(&self, value: &str) -> Option<u64> {
        self.values
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.count)
    }

    /// `(value, count)` pairs in server order.
    pub fn counts(&self) -> Vec<(&str, u64)> {
        self.values
            .iter()
            .map(|v| (v.value.as_str(), v.count))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Facet counting the documents matching an arbitrary query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacetQuery {
    pub key: Option<String>,
    pub query: String,
    pub excludes: Vec<String>,
}

impl FacetQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_exclude(mut self, tag: impl Into<String>) -> Self {
        self.excludes.push(tag.into());
        self
    }

    pub(crate) fn write_params(&self, params: &mut Params) {
        params.set("facet", "true");
        if self.query.is_empty() {
            return;
        }
        params.add(
            "facet.query",
            format!(
                "{}{}",
                facet_local_params(self.key.as_deref(), &self.excludes),
                self.query
            ),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FacetQueryResult {
    pub count: u64,
}

/// Facet bucketing a numeric or date field into ranges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacetRange {
    pub key: Option<String>,
    pub field: String,
    pub start: String,
    pub end: String,
    pub gap: String,
    pub hard_end: Option<bool>,
    /// Any of `before`, `after`, `between`, `all`, `none`.
    pub other: Vec<String>,
    /// Any of `lower`, `upper`, `edge`, `outer`, `all`.
    pub include: Vec<String>,
    pub mincount: Option<u64>,
    pub excludes: Vec<String>,
}

impl FacetRange {
    pub fn new(
        field: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        gap: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            start: start.into(),
            end: end.into(),
            gap: gap.into(),
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_hard_end(mut self, hard_end: bool) -> Self {
        self.hard_end = Some(hard_end);
        self
    }

    pub fn with_other(mut self, other: impl Into<String>) -> Self {
        self.other.push(other.into());
        self
    }

    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include.push(include.into());
        self
    }

    pub fn with_mincount(mut self, mincount: u64) -> Self {
        self.mincount = Some(mincount);
        self
    }

    pub fn with_exclude(mut self, tag: impl Into<String>) -> Self {
        self.excludes.push(tag.into());
        self
    }

    pub(crate) fn write_params(&self, params: &mut Params) {
        params.set("facet", "true");
        if self.field.is_empty() {
            return;
        }
        params.add(
            "facet.range",
            format!(
                "{}{}",
                facet_local_params(self.key.as_deref(), &self.excludes),
                self.field
            ),
        );
        let prefix = format!("f.{}.facet", self.field);
        params.add(format!("{prefix}.range.start"), self.start.clone());
        params.add(format!("{prefix}.range.end"), self.end.clone());
        params.add(format!("{prefix}.range.gap"), self.gap.clone());
        params.add_opt(&format!("{prefix}.range.hardend"), self.hard_end);
        for other in &self.other {
            params.add(format!("{prefix}.range.other"), other.clone());
        }
        for include in &self.include {
            params.add(format!("{prefix}.range.include"), include.clone());
        }
        params.add_opt(&format!("{prefix}.mincount"), self.mincount);
    }
}

/// Range buckets plus the optional before/after/between counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacetRangeResult {
    pub counts: Vec<FacetValue>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub gap: Option<String>,
    pub before: Option<u64>,
    pub after: Option<u64>,
    pub between: Option<u64>,
}

impl FacetRangeResult {
    fn parse(section: &Value) -> Option<Self> {
        let object = section.as_object()?;
        Some(Self {
            counts: object
                .get("counts")
                .and_then(facet_values)
                .unwrap_or_default(),
            start: object.get("start").map(value_to_string),
            end: object.get("end").map(value_to_string),
            gap: object.get("gap").map(value_to_string),
            before: object.get("before").and_then(as_u64),
            after: object.get("after").and_then(as_u64),
            between: object.get("between").and_then(as_u64),
        })
    }

    pub fn get(&self, bucket: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|v| v.value == bucket)
            .map(|v| v.count)
    }
}

/// Hierarchical facet over several fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacetPivot {
    pub key: Option<String>,
    pub fields: Vec<String>,
    pub mincount: Option<u64>,
    pub excludes: Vec<String>,
}

impl FacetPivot {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_mincount(mut self, mincount: u64) -> Self {
        self.mincount = Some(mincount);
        self
    }

    pub fn with_exclude(mut self, tag: impl Into<String>) -> Self {
        self.excludes.push(tag.into());
        self
    }

    pub(crate) fn write_params(&self, params: &mut Params) {
        params.set("facet", "true");
        if self.fields.is_empty() {
            return;
        }
        params.add(
            "facet.pivot",
            format!(
                "{}{}",
                facet_local_params(self.key.as_deref(), &self.excludes),
                self.fields.join(",")
            ),
        );
        // Solr only honours a global pivot mincount.
        if let Some(mincount) = self.mincount {
            params.set("facet.pivot.mincount", mincount.to_string());
        }
    }
}

/// One node of a pivot tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PivotEntry {
    pub field: String,
    pub value: String,
    pub count: u64,
    pub pivot: Vec<PivotEntry>,
}

impl PivotEntry {
    fn parse(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            field: object.get("field").map(value_to_string).unwrap_or_default(),
            value: object.get("value").map(value_to_string).unwrap_or_default(),
            count: object.get("count").and_then(as_u64).unwrap_or_default(),
            pivot: object
                .get("pivot")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(PivotEntry::parse).collect())
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacetPivotResult {
    pub entries: Vec<PivotEntry>,
}

pub(crate) const FIELD_HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::FacetField,
    build: build_field,
    parse: parse_field,
};

pub(crate) const QUERY_HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::FacetQuery,
    build: build_query,
    parse: parse_query,
};

pub(crate) const RANGE_HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::FacetRange,
    build: build_range,
    parse: parse_range,
};

pub(crate) const PIVOT_HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::FacetPivot,
    build: build_pivot,
    parse: parse_pivot,
};

fn build_field(component: &Component, params: &mut Params) {
    if let Component::FacetField(facet) = component {
        facet.write_params(params);
    }
}

fn build_query(component: &Component, params: &mut Params) {
    if let Component::FacetQuery(facet) = component {
        facet.write_params(params);
    }
}

fn build_range(component: &Component, params: &mut Params) {
    if let Component::FacetRange(facet) = component {
        facet.write_params(params);
    }
}

fn build_pivot(component: &Component, params: &mut Params) {
    if let Component::FacetPivot(facet) = component {
        facet.write_params(params);
    }
}

fn parse_field(component: &Component, body: &Value) -> Option<SubResult> {
    let section = facet_section(body, "facet_fields", component.key()?)?;
    FacetFieldResult::parse(section).map(SubResult::FacetField)
}

fn parse_query(component: &Component, body: &Value) -> Option<SubResult> {
    let section = facet_section(body, "facet_queries", component.key()?)?;
    let count = as_u64(section)?;
    Some(SubResult::FacetQuery(FacetQueryResult { count }))
}

fn parse_range(component: &Component, body: &Value) -> Option<SubResult> {
    let section = facet_section(body, "facet_ranges", component.key()?)?;
    FacetRangeResult::parse(section).map(SubResult::FacetRange)
}

fn parse_pivot(component: &Component, body: &Value) -> Option<SubResult> {
    let section = facet_section(body, "facet_pivot", component.key()?)?;
    let entries = section
        .as_array()?
        .iter()
        .filter_map(PivotEntry::parse)
        .collect();
    Some(SubResult::FacetPivot(FacetPivotResult { entries }))
}
