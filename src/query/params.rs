//! Base parameters of the select and more-like-this query types.

use std::fmt;

use crate::component::more_like_this::MoreLikeThis;
use crate::request::Params;
use crate::util::local_params;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Default boolean operator for the main query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    And,
    Or,
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperator::And => write!(f, "AND"),
            QueryOperator::Or => write!(f, "OR"),
        }
    }
}

/// A filter query. Tags let facets exclude it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub key: String,
    pub query: String,
    pub tags: Vec<String>,
}

impl FilterQuery {
    pub fn new(key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            query: query.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    fn to_param(&self) -> String {
        format!(
            "{}{}",
            local_params(&[("tag", self.tags.join(","))]),
            self.query
        )
    }
}

/// Parameters of a select query.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectParams {
    pub query: String,
    pub default_field: Option<String>,
    pub query_operator: Option<QueryOperator>,
    pub start: u64,
    pub rows: u64,
    pub fields: Vec<String>,
    pub sorts: Vec<(String, SortOrder)>,
    pub filter_queries: Vec<FilterQuery>,
    /// Milliseconds the server may spend on the query.
    pub time_allowed: Option<u64>,
    pub omit_header: bool,
}

impl Default for SelectParams {
    fn default() -> Self {
        Self {
            query: "*:*".to_string(),
            default_field: None,
            query_operator: None,
            start: 0,
            rows: 10,
            fields: vec!["*".to_string(), "score".to_string()],
            sorts: Vec::new(),
            filter_queries: Vec::new(),
            time_allowed: None,
            omit_header: true,
        }
    }
}

impl SelectParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_rows(mut self, rows: u64) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sorts.push((field.into(), order));
        self
    }

    /// Add a filter query, replacing one with the same key.
    pub fn with_filter_query(mut self, filter: FilterQuery) -> Self {
        self.filter_queries.retain(|fq| fq.key != filter.key);
        self.filter_queries.push(filter);
        self
    }

    pub fn with_default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = Some(field.into());
        self
    }

    pub fn with_query_operator(mut self, operator: QueryOperator) -> Self {
        self.query_operator = Some(operator);
        self
    }

    pub fn with_time_allowed(mut self, millis: u64) -> Self {
        self.time_allowed = Some(millis);
        self
    }

    pub fn with_omit_header(mut self, omit: bool) -> Self {
        self.omit_header = omit;
        self
    }

    pub(crate) fn write_params(&self, out: &mut Params) {
        out.add("omitHeader", self.omit_header.to_string());
        out.add("q", self.query.clone());
        out.add_opt("q.op", self.query_operator);
        out.add_opt("df", self.default_field.as_deref());
        out.add("start", self.start.to_string());
        out.add("rows", self.rows.to_string());
        if !self.fields.is_empty() {
            out.add("fl", self.fields.join(","));
        }
        if !self.sorts.is_empty() {
            let sort = self
                .sorts
                .iter()
                .map(|(field, order)| format!("{field} {order}"))
                .collect::<Vec<_>>()
                .join(",");
            out.add("sort", sort);
        }
        for filter in &self.filter_queries {
            out.add("fq", filter.to_param());
        }
        out.add_opt("timeAllowed", self.time_allowed);
    }
}

/// Parameters of a more-like-this handler query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoreLikeThisParams {
    pub select: SelectParams,
    pub options: MoreLikeThis,
    /// Include the matched document in the response.
    pub match_include: Option<bool>,
    /// `list`, `details` or `none`.
    pub interesting_terms: Option<String>,
}

impl MoreLikeThisParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            select: SelectParams::new(query),
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: MoreLikeThis) -> Self {
        self.options = options;
        self
    }

    pub fn with_match_include(mut self, include: bool) -> Self {
        self.match_include = Some(include);
        self
    }

    pub fn with_interesting_terms(mut self, mode: impl Into<String>) -> Self {
        self.interesting_terms = Some(mode.into());
        self
    }

    pub(crate) fn write_params(&self, out: &mut Params) {
        self.select.write_params(out);
        self.options.write_options(out);
        out.add_opt("mlt.match.include", self.match_include);
        out.add_opt("mlt.interestingTerms", self.interesting_terms.as_deref());
    }
}
