//! Suggester, as a select component and as the suggest handler's parameters.

use serde_json::Value;

use crate::component::registry::ComponentHandler;
use crate::component::{Component, ComponentKind, SubResult};
use crate::request::Params;
use crate::util::{as_f64, as_u64, named_list, value_to_string};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Suggester {
    pub query: Option<String>,
    /// Dictionaries to consult. Empty means the server's default.
    pub dictionaries: Vec<String>,
    pub count: Option<u32>,
    /// Context filter query.
    pub context_filter_query: Option<String>,
    pub build: Option<bool>,
    pub reload: Option<bool>,
}

impl Suggester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_dictionary(mut self, dictionary: impl Into<String>) -> Self {
        self.dictionaries.push(dictionary.into());
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_context_filter_query(mut self, query: impl Into<String>) -> Self {
        self.context_filter_query = Some(query.into());
        self
    }

    pub fn with_build(mut self, build: bool) -> Self {
        self.build = Some(build);
        self
    }

    pub fn with_reload(mut self, reload: bool) -> Self {
        self.reload = Some(reload);
        self
    }

    pub(crate) fn write_params(&self, params: &mut Params) {
        params.set("suggest", "true");
        for dictionary in &self.dictionaries {
            params.add("suggest.dictionary", dictionary.clone());
        }
        params.add_opt("suggest.q", self.query.as_deref());
        params.add_opt("suggest.count", self.count);
        params.add_opt("suggest.cfq", self.context_filter_query.as_deref());
        params.add_opt("suggest.build", self.build);
        params.add_opt("suggest.reload", self.reload);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Suggestion {
    pub term: String,
    pub weight: Option<f64>,
    pub payload: Option<String>,
}

/// Suggestions for one input term.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuggestTerm {
    pub term: String,
    pub num_found: u64,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuggesterDictionary {
    pub name: String,
    pub terms: Vec<SuggestTerm>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuggesterResult {
    pub dictionaries: Vec<SuggesterDictionary>,
}

impl SuggesterResult {
    pub fn dictionary(&self, name: &str) -> Option<&SuggesterDictionary> {
        self.dictionaries.iter().find(|d| d.name == name)
    }

    /// Every suggestion across dictionaries and terms, in server order.
    pub fn all(&self) -> impl Iterator<Item = &Suggestion> {
        self.dictionaries
            .iter()
            .flat_map(|d| d.terms.iter())
            .flat_map(|t| t.suggestions.iter())
    }

    /// Parse a `suggest` section.
    pub(crate) fn parse(section: &Value) -> Option<Self> {
        let dictionaries = named_list(section)?
            .into_iter()
            .map(|(name, terms)| SuggesterDictionary {
                name,
                terms: named_list(terms)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(term, value)| parse_term(term, value))
                    .collect(),
            })
            .collect();
        Some(Self { dictionaries })
    }
}

fn parse_term(term: String, value: &Value) -> SuggestTerm {
    let suggestions = value
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| Suggestion {
                    term: item.get("term").map(value_to_string).unwrap_or_default(),
                    weight: item.get("weight").and_then(as_f64),
                    payload: item
                        .get("payload")
                        .map(value_to_string)
                        .filter(|p| !p.is_empty()),
                })
                .collect()
        })
        .unwrap_or_default();
    SuggestTerm {
        term,
        num_found: value.get("numFound").and_then(as_u64).unwrap_or_default(),
        suggestions,
    }
}

pub(crate) const HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::Suggester,
    build,
    parse,
};

fn build(component: &Component, params: &mut Params) {
    if let Component::Suggester(suggester) = component {
        suggester.write_params(params);
    }
}

fn parse(_component: &Component, body: &Value) -> Option<SubResult> {
    SuggesterResult::parse(body.get("suggest")?).map(SubResult::Suggester)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_params() {
        let mut params = Params::new();
        Suggester::new()
            .with_dictionary("mySuggester")
            .with_query("electronics")
            .with_build(true)
            .write_params(&mut params);
        assert_eq!(params.get("suggest"), Some("true"));
        assert_eq!(params.get("suggest.dictionary"), Some("mySuggester"));
        assert_eq!(params.get("suggest.q"), Some("electronics"));
        assert_eq!(params.get("suggest.build"), Some("true"));
    }

    #[test]
    fn test_parse() {
        let section = json!({
            "mySuggester": {
                "electronics": {
                    "numFound": 3,
                    "suggestions": [
                        {"term": "electronics", "weight": 2199, "payload": ""},
                        {"term": "electronics and computer1", "weight": 2199, "payload": ""},
                        {"term": "electronics and stuff2", "weight": 279, "payload": ""}
                    ]
                }
            }
        });
        let result = SuggesterResult::parse(&section).unwrap();
        let terms: Vec<&str> = result.all().map(|s| s.term.as_str()).collect();
        assert_eq!(
            terms,
            vec!["electronics", "electronics and computer1", "electronics and stuff2"]
        );
        let dictionary = result.dictionary("mySuggester").unwrap();
        assert_eq!(dictionary.terms[0].num_found, 3);
        assert_eq!(dictionary.terms[0].suggestions[2].weight, Some(279.0));
        assert_eq!(dictionary.terms[0].suggestions[0].payload, None);
    }
}
