//! Spellcheck, as a select component and as the spellcheck handler's parameters.

use serde_json::Value;

use crate::component::registry::ComponentHandler;
use crate::component::{Component, ComponentKind, SubResult};
use crate::request::Params;
use crate::util::{as_u64, named_list, value_to_string};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spellcheck {
    /// Text to check. Defaults to the main query on the server side.
    pub query: Option<String>,
    pub dictionary: Option<String>,
    pub count: Option<u32>,
    pub collate: Option<bool>,
    pub max_collations: Option<u32>,
    pub extended_results: Option<bool>,
    pub only_more_popular: Option<bool>,
    pub build: Option<bool>,
    pub reload: Option<bool>,
}

impl Spellcheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_dictionary(mut self, dictionary: impl Into<String>) -> Self {
        self.dictionary = Some(dictionary.into());
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_collate(mut self, collate: bool) -> Self {
        self.collate = Some(collate);
        self
    }

    pub fn with_max_collations(mut self, max: u32) -> Self {
        self.max_collations = Some(max);
        self
    }

    pub fn with_extended_results(mut self, extended: bool) -> Self {
        self.extended_results = Some(extended);
        self
    }

    pub fn with_only_more_popular(mut self, only: bool) -> Self {
        self.only_more_popular = Some(only);
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
        params.set("spellcheck", "true");
        params.add_opt("spellcheck.q", self.query.as_deref());
        params.add_opt("spellcheck.dictionary", self.dictionary.as_deref());
        params.add_opt("spellcheck.count", self.count);
        params.add_opt("spellcheck.collate", self.collate);
        params.add_opt("spellcheck.maxCollations", self.max_collations);
        params.add_opt("spellcheck.extendedResults", self.extended_results);
        params.add_opt("spellcheck.onlyMorePopular", self.only_more_popular);
        params.add_opt("spellcheck.build", self.build);
        params.add_opt("spellcheck.reload", self.reload);
    }
}

/// A suggested replacement word.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpellWord {
    pub word: String,
    /// Only present with extended results.
    pub frequency: Option<u64>,
}

/// Suggestions for one misspelled term.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpellSuggestion {
    pub original: String,
    pub num_found: u64,
    pub start_offset: Option<u64>,
    pub end_offset: Option<u64>,
    pub original_frequency: Option<u64>,
    pub words: Vec<SpellWord>,
}

/// A corrected version of the whole query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Collation {
    pub query: String,
    pub hits: Option<u64>,
    /// `(misspelling, correction)` pairs.
    pub corrections: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpellcheckResult {
    pub suggestions: Vec<SpellSuggestion>,
    pub correctly_spelled: Option<bool>,
    pub collations: Vec<Collation>,
}

impl SpellcheckResult {
    pub fn suggestion(&self, original: &str) -> Option<&SpellSuggestion> {
        self.suggestions.iter().find(|s| s.original == original)
    }

    /// Parse a `spellcheck` section.
    pub(crate) fn parse(section: &Value) -> Option<Self> {
        let object = section.as_object()?;
        let mut result = SpellcheckResult {
            correctly_spelled: object.get("correctlySpelled").and_then(Value::as_bool),
            ..Default::default()
        };

        if let Some(suggestions) = object.get("suggestions").and_then(named_list) {
            for (name, value) in suggestions {
                // Older servers inline these two entries in the suggestion list.
                match name.as_str() {
                    "correctlySpelled" => result.correctly_spelled = value.as_bool(),
                    "collation" => result.collations.extend(parse_collation(value)),
                    _ => result.suggestions.extend(parse_suggestion(name, value)),
                }
            }
        }

        if let Some(collations) = object.get("collations").and_then(named_list) {
            for (_, value) in collations {
                result.collations.extend(parse_collation(value));
            }
        }

        Some(result)
    }
}

fn parse_suggestion(original: String, value: &Value) -> Option<SpellSuggestion> {
    let object = value.as_object()?;
    let words = object
        .get("suggestion")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::Object(word) => SpellWord {
                        word: word.get("word").map(value_to_string).unwrap_or_default(),
                        frequency: word.get("freq").and_then(as_u64),
                    },
                    other => SpellWord {
                        word: value_to_string(other),
                        frequency: None,
                    },
                })
                .collect()
        })
        .unwrap_or_default();

    Some(SpellSuggestion {
        original,
        num_found: object.get("numFound").and_then(as_u64).unwrap_or_default(),
        start_offset: object.get("startOffset").and_then(as_u64),
        end_offset: object.get("endOffset").and_then(as_u64),
        original_frequency: object.get("origFreq").and_then(as_u64),
        words,
    })
}

fn parse_collation(value: &Value) -> Option<Collation> {
    match value {
        Value::String(query) => Some(Collation {
            query: query.clone(),
            ..Default::default()
        }),
        Value::Object(object) => Some(Collation {
            query: object
                .get("collationQuery")
                .map(value_to_string)
                .unwrap_or_default(),
            hits: object.get("hits").and_then(as_u64),
            corrections: object
                .get("misspellingsAndCorrections")
                .and_then(named_list)
                .map(|pairs| {
                    pairs
                        .into_iter()
                        .map(|(from, to)| (from, value_to_string(to)))
                        .collect()
                })
                .unwrap_or_default(),
        }),
        _ => None,
    }
}

pub(crate) const HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::Spellcheck,
    build,
    parse,
};

fn build(component: &Component, params: &mut Params) {
    if let Component::Spellcheck(spellcheck) = component {
        spellcheck.write_params(params);
    }
}

fn parse(_component: &Component, body: &Value) -> Option<SubResult> {
    SpellcheckResult::parse(body.get("spellcheck")?).map(SubResult::Spellcheck)
}
