//! More-like-this, as a select component and as options of the mlt handler.

use serde_json::Value;

use crate::component::registry::ComponentHandler;
use crate::component::{Component, ComponentKind, SubResult};
use crate::request::Params;
use crate::response::DocumentList;
use crate::util::named_list;

/// Similarity options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoreLikeThis {
    /// Fields used to find similar documents.
    pub fields: Vec<String>,
    /// Similar documents to return per result document.
    pub count: Option<u32>,
    pub min_term_freq: Option<u32>,
    pub min_doc_freq: Option<u32>,
    pub boost: Option<bool>,
    /// Query fields with optional boosts, e.g. `name^2`.
    pub query_fields: Vec<String>,
}

impl MoreLikeThis {
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

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_min_term_freq(mut self, freq: u32) -> Self {
        self.min_term_freq = Some(freq);
        self
    }

    pub fn with_min_doc_freq(mut self, freq: u32) -> Self {
        self.min_doc_freq = Some(freq);
        self
    }

    pub fn with_boost(mut self, boost: bool) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_query_field(mut self, field: impl Into<String>) -> Self {
        self.query_fields.push(field.into());
        self
    }

    /// Write the `mlt.*` options without switching the component on.
    pub(crate) fn write_options(&self, params: &mut Params) {
        if !self.fields.is_empty() {
            params.add("mlt.fl", self.fields.join(","));
        }
        params.add_opt("mlt.count", self.count);
        params.add_opt("mlt.mintf", self.min_term_freq);
        params.add_opt("mlt.mindf", self.min_doc_freq);
        params.add_opt("mlt.boost", self.boost);
        if !self.query_fields.is_empty() {
            params.add("mlt.qf", self.query_fields.join(" "));
        }
    }
}

/// Similar documents per result document, keyed by unique key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoreLikeThisResult {
    pub documents: Vec<(String, DocumentList)>,
}

impl MoreLikeThisResult {
    pub fn similar_to(&self, id: &str) -> Option<&DocumentList> {
        self.documents
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, list)| list)
    }

    fn parse(section: &Value) -> Option<Self> {
        let documents = named_list(section)?
            .into_iter()
            .filter_map(|(id, list)| DocumentList::parse(list).map(|list| (id, list)))
            .collect();
        Some(Self { documents })
    }
}

pub(crate) const HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::MoreLikeThis,
    build,
    parse,
};

fn build(component: &Component, params: &mut Params) {
    if let Component::MoreLikeThis(mlt) = component {
        params.set("mlt", "true");
        mlt.write_options(params);
    }
}

fn parse(_component: &Component, body: &Value) -> Option<SubResult> {
    MoreLikeThisResult::parse(body.get("moreLikeThis")?).map(SubResult::MoreLikeThis)
}
