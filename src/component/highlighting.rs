//! Highlighting component.

use serde_json::Value;

use crate::component::registry::ComponentHandler;
use crate::component::{Component, ComponentKind, SubResult};
use crate::request::Params;
use crate::util::{named_list, value_to_string};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Highlighting {
    /// Fields to highlight. Empty means the server's default fields.
    pub fields: Vec<String>,
    /// Query used for highlighting instead of the main query.
    pub query: Option<String>,
    pub snippets: Option<u32>,
    pub fragment_size: Option<u32>,
    pub merge_contiguous: Option<bool>,
    pub require_field_match: Option<bool>,
    pub simple_pre: Option<String>,
    pub simple_post: Option<String>,
    /// `original`, `unified` or `fastVector`.
    pub method: Option<String>,
}

impl Highlighting {
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

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_snippets(mut self, snippets: u32) -> Self {
        self.snippets = Some(snippets);
        self
    }

    pub fn with_fragment_size(mut self, size: u32) -> Self {
        self.fragment_size = Some(size);
        self
    }

    pub fn with_merge_contiguous(mut self, merge: bool) -> Self {
        self.merge_contiguous = Some(merge);
        self
    }

    pub fn with_require_field_match(mut self, require: bool) -> Self {
        self.require_field_match = Some(require);
        self
    }

    pub fn with_tags(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.simple_pre = Some(pre.into());
        self.simple_post = Some(post.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub(crate) fn write_params(&self, params: &mut Params) {
        params.set("hl", "true");
        if !self.fields.is_empty() {
            params.add("hl.fl", self.fields.join(","));
        }
        params.add_opt("hl.q", self.query.as_deref());
        params.add_opt("hl.snippets", self.snippets);
        params.add_opt("hl.fragsize", self.fragment_size);
        params.add_opt("hl.mergeContiguous", self.merge_contiguous);
        params.add_opt("hl.requireFieldMatch", self.require_field_match);
        params.add_opt("hl.simple.pre", self.simple_pre.as_deref());
        params.add_opt("hl.simple.post", self.simple_post.as_deref());
        params.add_opt("hl.method", self.method.as_deref());
    }
}

/// Snippets of one document, by field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightedDocument {
    pub fields: Vec<(String, Vec<String>)>,
}

impl HighlightedDocument {
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, snippets)| snippets.as_slice())
    }
}

/// Highlighted documents by unique key, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightingResult {
    pub documents: Vec<(String, HighlightedDocument)>,
}

impl HighlightingResult {
    pub fn document(&self, id: &str) -> Option<&HighlightedDocument> {
        self.documents
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, doc)| doc)
    }

    fn parse(section: &Value) -> Option<Self> {
        let documents = named_list(section)?
            .into_iter()
            .map(|(id, fields)| {
                let fields = named_list(fields)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(field, snippets)| {
                        let snippets = match snippets {
                            Value::Array(items) => items.iter().map(value_to_string).collect(),
                            other => vec![value_to_string(other)],
                        };
                        (field, snippets)
                    })
                    .collect();
                (id, HighlightedDocument { fields })
            })
            .collect();
        Some(Self { documents })
    }
}

pub(crate) const HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::Highlighting,
    build,
    parse,
};

fn build(component: &Component, params: &mut Params) {
    if let Component::Highlighting(highlighting) = component {
        highlighting.write_params(params);
    }
}

fn parse(_component: &Component, body: &Value) -> Option<SubResult> {
    HighlightingResult::parse(body.get("highlighting")?).map(SubResult::Highlighting)
}
