//! Response parsing.
//!
//! [`ResponseParser::parse`] decodes a JSON body into a [`QueryResult`]. The
//! base parser of the query type reads the header, the document list and the
//! handler's own section; then every component attached to the query gets a
//! chance to extract its section. A component whose section is missing or
//! malformed is left out of the result rather than failing the whole parse.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::component::facet::{
    FacetFieldResult, FacetPivotResult, FacetQueryResult, FacetRangeResult,
};
use crate::component::grouping::GroupingResult;
use crate::component::highlighting::HighlightingResult;
use crate::component::more_like_this::MoreLikeThisResult;
use crate::component::registry::ComponentRegistry;
use crate::component::spellcheck::SpellcheckResult;
use crate::component::stats::StatsResult;
use crate::component::suggester::SuggesterResult;
use crate::component::terms::TermsResult;
use crate::component::{ComponentKind, SubResult};
use crate::error::{CoronaError, Result};
use crate::query::{Query, QueryType};
use crate::util::{as_f64, as_i64, as_u64, value_to_string};

/// A stored document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The `id` field as text.
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    /// Field names and values in server order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

/// A slice of matching documents, as found under `response` or `doclist`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentList {
    pub num_found: u64,
    pub start: u64,
    pub max_score: Option<f64>,
    pub documents: Vec<Document>,
}

impl DocumentList {
    pub(crate) fn parse(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let documents = object
            .get("docs")
            .and_then(Value::as_array)
            .map(|docs| {
                docs.iter()
                    .filter_map(|doc| doc.as_object().cloned().map(Document::new))
                    .collect()
            })
            .unwrap_or_default();
        Some(Self {
            num_found: object.get("numFound").and_then(as_u64).unwrap_or_default(),
            start: object.get("start").and_then(as_u64).unwrap_or_default(),
            max_score: object.get("maxScore").and_then(as_f64),
            documents,
        })
    }
}

/// The outcome of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub query_type: QueryType,
    /// `None` when the header was omitted.
    pub status: Option<i64>,
    /// Server-side time in milliseconds.
    pub query_time: Option<u64>,
    pub num_found: u64,
    pub start: u64,
    pub max_score: Option<f64>,
    pub documents: Vec<Document>,
    /// The `status` field of a ping, e.g. `OK`.
    pub ping_status: Option<String>,
    /// The handler's own section for the spellcheck, suggester and terms
    /// query types.
    pub primary: Option<SubResult>,
    /// The document a more-like-this query matched, with `mlt.match.include`.
    pub match_document: Option<Document>,
    /// Interesting terms of a more-like-this query with their boosts, when
    /// the server reports them.
    pub interesting_terms: Vec<(String, Option<f64>)>,
    pub sub_results: HashMap<String, SubResult>,
    /// The decoded body.
    pub raw: Value,
}

macro_rules! typed_accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self, key: &str) -> Option<&$ty> {
            match self.sub_results.get(key)? {
                SubResult::$variant(result) => Some(result),
                _ => None,
            }
        }
    };
}

macro_rules! singleton_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Option<&$ty> {
            let key = ComponentKind::$variant.name();
            match self.sub_results.get(key)? {
                SubResult::$variant(result) => Some(result),
                _ => None,
            }
        }
    };
}

impl QueryResult {
    fn empty(query_type: QueryType, raw: Value) -> Self {
        Self {
            query_type,
            status: None,
            query_time: None,
            num_found: 0,
            start: 0,
            max_score: None,
            documents: Vec::new(),
            ping_status: None,
            primary: None,
            match_document: None,
            interesting_terms: Vec::new(),
            sub_results: HashMap::new(),
            raw,
        }
    }

    /// Iterate the returned documents. Every call starts from the first one.
    pub fn documents(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Number of returned documents, not `num_found`.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn sub_result(&self, key: &str) -> Option<&SubResult> {
        self.sub_results.get(key)
    }

    pub fn sub_result_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sub_results.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    typed_accessor!(facet_field, FacetField, FacetFieldResult);
    typed_accessor!(facet_query, FacetQuery, FacetQueryResult);
    typed_accessor!(facet_range, FacetRange, FacetRangeResult);
    typed_accessor!(facet_pivot, FacetPivot, FacetPivotResult);

    singleton_accessor!(highlighting, Highlighting, HighlightingResult);
    singleton_accessor!(grouping, Grouping, GroupingResult);
    singleton_accessor!(stats, Stats, StatsResult);
    singleton_accessor!(more_like_this, MoreLikeThis, MoreLikeThisResult);

    /// Spellcheck output, either from the spellcheck handler or from an
    /// attached component.
    pub fn spellcheck(&self) -> Option<&SpellcheckResult> {
        match self.primary_or_component(ComponentKind::Spellcheck)? {
            SubResult::Spellcheck(result) => Some(result),
            _ => None,
        }
    }

    pub fn suggester(&self) -> Option<&SuggesterResult> {
        match self.primary_or_component(ComponentKind::Suggester)? {
            SubResult::Suggester(result) => Some(result),
            _ => None,
        }
    }

    pub fn terms(&self) -> Option<&TermsResult> {
        match self.primary_or_component(ComponentKind::Terms)? {
            SubResult::Terms(result) => Some(result),
            _ => None,
        }
    }

    fn primary_or_component(&self, kind: ComponentKind) -> Option<&SubResult> {
        self.primary
            .as_ref()
            .filter(|primary| primary.kind() == kind)
            .or_else(|| self.sub_results.get(kind.name()))
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Parses response bodies for a query.
pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(body: &[u8], query: &Query) -> Result<QueryResult> {
        let raw: Value = serde_json::from_slice(body)
            .map_err(|e| CoronaError::response_parse(format!("invalid JSON body: {e}")))?;
        if !raw.is_object() {
            return Err(CoronaError::response_parse(
                "response body is not a JSON object",
            ));
        }

        let query_type = query.query_type();
        let mut result = QueryResult::empty(query_type, Value::Null);
        Self::parse_base(&raw, &mut result);

        let registry = ComponentRegistry::for_type(query_type);
        for component in query.ordered_components() {
            let Some(key) = component.key() else {
                continue;
            };
            let handler = registry.handler(component.kind())?;
            match (handler.parse)(component, &raw) {
                Some(sub_result) => {
                    result.sub_results.insert(key.to_string(), sub_result);
                }
                None => {
                    log::debug!(
                        "no {} section for component {key:?} in {query_type} response",
                        component.kind()
                    );
                }
            }
        }

        result.raw = raw;
        Ok(result)
    }

    fn parse_base(raw: &Value, result: &mut QueryResult) {
        if let Some(header) = raw.get("responseHeader") {
            result.status = header.get("status").and_then(as_i64);
            result.query_time = header.get("QTime").and_then(as_u64);
        }

        if let Some(list) = raw.get("response").and_then(DocumentList::parse) {
            result.num_found = list.num_found;
            result.start = list.start;
            result.max_score = list.max_score;
            result.documents = list.documents;
        }

        let query_type = result.query_type;
        let section = |name: &str| {
            let section = raw.get(name);
            if section.is_none() {
                log::debug!("no {name} section in {query_type} response");
            }
            section
        };

        result.primary = match query_type {
            QueryType::Spellcheck => section("spellcheck")
                .and_then(SpellcheckResult::parse)
                .map(SubResult::Spellcheck),
            QueryType::Suggester => section("suggest")
                .and_then(SuggesterResult::parse)
                .map(SubResult::Suggester),
            QueryType::Terms => section("terms")
                .and_then(TermsResult::parse)
                .map(SubResult::Terms),
            _ => None,
        };

        match query_type {
            QueryType::Ping => {
                result.ping_status = raw.get("status").map(value_to_string);
            }
            QueryType::MoreLikeThis => {
                result.match_document = raw
                    .get("match")
                    .and_then(DocumentList::parse)
                    .and_then(|list| list.documents.into_iter().next());
                result.interesting_terms = raw
                    .get("interestingTerms")
                    .map(parse_interesting_terms)
                    .unwrap_or_default();
            }
            _ => {}
        }
    }
}

/// Interesting terms come as a list of terms, as a flat list of terms and
/// boosts, or as a map of terms to boosts.
fn parse_interesting_terms(value: &Value) -> Vec<(String, Option<f64>)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), as_f64(v))).collect(),
        Value::Array(items) => {
            let mut terms: Vec<(String, Option<f64>)> = Vec::new();
            for item in items {
                match item {
                    Value::Number(_) => {
                        if let Some(last) = terms.last_mut() {
                            last.1 = as_f64(item);
                        }
                    }
                    other => terms.push((value_to_string(other), None)),
                }
            }
            terms
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::component::facet::FacetField;
    use crate::component::highlighting::Highlighting;
    use crate::error::ErrorStage;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_parse_select() {
        let query = Query::select("*:*");
        let raw = body(json!({
            "responseHeader": {"status": 0, "QTime": 3},
            "response": {"numFound": 32, "start": 0, "maxScore": 1.0,
                         "docs": [{"id": "SP2514N", "price": 92.0}, {"id": "6H500F0"}]}
        }));
        let result = ResponseParser::parse(&raw, &query).unwrap();
        assert_eq!(result.status, Some(0));
        assert_eq!(result.query_time, Some(3));
        assert_eq!(result.num_found, 32);
        assert_eq!(result.max_score, Some(1.0));
        assert_eq!(result.len(), 2);
        assert_eq!(result.documents[0].get("price"), Some(&json!(92.0)));
    }

    #[test]
    fn test_documents_restartable() {
        let query = Query::select("*:*");
        let raw = body(json!({"response": {"numFound": 2, "start": 0,
                                           "docs": [{"id": "a"}, {"id": "b"}]}}));
        let result = ResponseParser::parse(&raw, &query).unwrap();
        let first: Vec<_> = result.documents().filter_map(Document::id).collect();
        let second: Vec<_> = (&result).into_iter().filter_map(Document::id).collect();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_body() {
        let query = Query::select("*:*");
        let err = ResponseParser::parse(b"<html>", &query).unwrap_err();
        assert_eq!(err.stage(), ErrorStage::Parse);
        let err = ResponseParser::parse(b"[1, 2]", &query).unwrap_err();
        assert!(matches!(err, CoronaError::ResponseParse(_)));
    }

    #[test]
    fn test_missing_section_is_absent() {
        let query = Query::select("*:*")
            .with_component(FacetField::new("cat").with_key("cat"))
            .unwrap()
            .with_component(Highlighting::new())
            .unwrap();
        let raw = body(json!({
            "response": {"numFound": 0, "start": 0, "docs": []},
            "facet_counts": {"facet_fields": {"cat": ["electronics", 5]}}
        }));
        let result = ResponseParser::parse(&raw, &query).unwrap();
        assert_eq!(result.sub_result_keys(), vec!["cat"]);
        assert_eq!(result.facet_field("cat").unwrap().get("electronics"), Some(5));
        assert!(result.highlighting().is_none());
    }

    #[test]
    fn test_spellcheck_primary() {
        let query = Query::spellcheck("hell ultrashar");
        let raw = body(json!({
            "spellcheck": {"suggestions": ["hell", {"numFound": 1, "suggestion": ["dell"]}]}
        }));
        let result = ResponseParser::parse(&raw, &query).unwrap();
        assert!(matches!(result.primary, Some(SubResult::Spellcheck(_))));
        assert_eq!(
            result.spellcheck().unwrap().suggestion("hell").unwrap().words[0].word,
            "dell"
        );
        assert!(result.sub_results.is_empty());
    }

    #[test]
    fn test_ping_status() {
        let query = Query::ping();
        let raw = body(json!({"responseHeader": {"status": 0, "QTime": 1}, "status": "OK"}));
        let result = ResponseParser::parse(&raw, &query).unwrap();
        assert_eq!(result.ping_status.as_deref(), Some("OK"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_more_like_this_match() {
        let query = Query::more_like_this("id:SP2514N");
        let raw = body(json!({
            "match": {"numFound": 1, "start": 0, "docs": [{"id": "SP2514N"}]},
            "response": {"numFound": 1, "start": 0, "docs": [{"id": "6H500F0"}]},
            "interestingTerms": ["cat:electronics", 1.0, "cat:hard", 0.5]
        }));
        let result = ResponseParser::parse(&raw, &query).unwrap();
        assert_eq!(result.match_document.as_ref().and_then(Document::id), Some("SP2514N"));
        assert_eq!(result.documents[0].id(), Some("6H500F0"));
        assert_eq!(
            result.interesting_terms,
            vec![
                ("cat:electronics".to_string(), Some(1.0)),
                ("cat:hard".to_string(), Some(0.5))
            ]
        );
    }

    #[test]
    fn test_interesting_terms_list() {
        let terms = parse_interesting_terms(&json!(["cat:a", "cat:b"]));
        assert_eq!(terms, vec![("cat:a".to_string(), None), ("cat:b".to_string(), None)]);
    }
}
