//! Terms, as a select component and as the terms handler's parameters.

use serde_json::Value;

use crate::component::registry::ComponentHandler;
use crate::component::{Component, ComponentKind, SubResult};
use crate::request::Params;
use crate::util::{count_list, named_list};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Terms {
    pub fields: Vec<String>,
    pub lower_bound: Option<String>,
    pub lower_bound_include: Option<bool>,
    pub upper_bound: Option<String>,
    pub upper_bound_include: Option<bool>,
    pub prefix: Option<String>,
    pub regex: Option<String>,
    pub mincount: Option<u64>,
    pub maxcount: Option<u64>,
    /// Maximum number of terms per field, `-1` for no limit.
    pub limit: Option<i64>,
    pub raw: Option<bool>,
    /// `count` or `index`.
    pub sort: Option<String>,
}

impl Terms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_lower_bound(mut self, bound: impl Into<String>, include: bool) -> Self {
        self.lower_bound = Some(bound.into());
        self.lower_bound_include = Some(include);
        self
    }

    pub fn with_upper_bound(mut self, bound: impl Into<String>, include: bool) -> Self {
        self.upper_bound = Some(bound.into());
        self.upper_bound_include = Some(include);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = Some(regex.into());
        self
    }

    pub fn with_mincount(mut self, mincount: u64) -> Self {
        self.mincount = Some(mincount);
        self
    }

    pub fn with_maxcount(mut self, maxcount: u64) -> Self {
        self.maxcount = Some(maxcount);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub(crate) fn write_params(&self, params: &mut Params) {
        params.set("terms", "true");
        for field in &self.fields {
            params.add("terms.fl", field.clone());
        }
        params.add_opt("terms.lower", self.lower_bound.as_deref());
        params.add_opt("terms.lower.incl", self.lower_bound_include);
        params.add_opt("terms.upper", self.upper_bound.as_deref());
        params.add_opt("terms.upper.incl", self.upper_bound_include);
        params.add_opt("terms.prefix", self.prefix.as_deref());
        params.add_opt("terms.regex", self.regex.as_deref());
        params.add_opt("terms.mincount", self.mincount);
        params.add_opt("terms.maxcount", self.maxcount);
        params.add_opt("terms.limit", self.limit);
        params.add_opt("terms.raw", self.raw);
        params.add_opt("terms.sort", self.sort.as_deref());
    }
}

/// Terms and their document frequencies, per field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TermsResult {
    pub fields: Vec<(String, Vec<(String, u64)>)>,
}

impl TermsResult {
    pub fn field(&self, name: &str) -> Option<&[(String, u64)]> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, terms)| terms.as_slice())
    }

    /// Parse a `terms` section.
    pub(crate) fn parse(section: &Value) -> Option<Self> {
        let fields = named_list(section)?
            .into_iter()
            .map(|(field, terms)| (field, count_list(terms).unwrap_or_default()))
            .collect();
        Some(Self { fields })
    }
}

pub(crate) const HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::Terms,
    build,
    parse,
};

fn build(component: &Component, params: &mut Params) {
    if let Component::Terms(terms) = component {
        terms.write_params(params);
    }
}

fn parse(_component: &Component, body: &Value) -> Option<SubResult> {
    TermsResult::parse(body.get("terms")?).map(SubResult::Terms)
}
