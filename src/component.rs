//! Optional query components.
//!
//! A component is an independently pluggable sub-feature of a query, such as
//! a facet or highlighting. Every kind contributes its own parameters when a
//! request is built and extracts its own section when a response is parsed;
//! the pairing of kind to builder and parser lives in [`registry`].
//!
//! Facet kinds may be attached many times per query, told apart by key. Every
//! other kind is a singleton keyed by its [`ComponentKind::name`].

pub mod facet;
pub mod grouping;
pub mod highlighting;
pub mod more_like_this;
pub mod registry;
pub mod spellcheck;
pub mod stats;
pub mod suggester;
pub mod terms;

use std::fmt;

use self::facet::{
    FacetField, FacetFieldResult, FacetPivot, FacetPivotResult, FacetQuery, FacetQueryResult,
    FacetRange, FacetRangeResult,
};
use self::grouping::{Grouping, GroupingResult};
use self::highlighting::{Highlighting, HighlightingResult};
use self::more_like_this::{MoreLikeThis, MoreLikeThisResult};
use self::spellcheck::{Spellcheck, SpellcheckResult};
use self::stats::{Stats, StatsResult};
use self::suggester::{Suggester, SuggesterResult};
use self::terms::{Terms, TermsResult};

/// The kinds of component a query can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    FacetField,
    FacetQuery,
    FacetRange,
    FacetPivot,
    Highlighting,
    Spellcheck,
    Suggester,
    Grouping,
    Stats,
    Terms,
    MoreLikeThis,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 11] = [
        ComponentKind::FacetField,
        ComponentKind::FacetQuery,
        ComponentKind::FacetRange,
        ComponentKind::FacetPivot,
        ComponentKind::Highlighting,
        ComponentKind::Spellcheck,
        ComponentKind::Suggester,
        ComponentKind::Grouping,
        ComponentKind::Stats,
        ComponentKind::Terms,
        ComponentKind::MoreLikeThis,
    ];

    /// Stable name, also the key of singleton components.
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::FacetField => "facet_field",
            ComponentKind::FacetQuery => "facet_query",
            ComponentKind::FacetRange => "facet_range",
            ComponentKind::FacetPivot => "facet_pivot",
            ComponentKind::Highlighting => "highlighting",
            ComponentKind::Spellcheck => "spellcheck",
            ComponentKind::Suggester => "suggester",
            ComponentKind::Grouping => "grouping",
            ComponentKind::Stats => "stats",
            ComponentKind::Terms => "terms",
            ComponentKind::MoreLikeThis => "morelikethis",
        }
    }

    /// Whether several instances may be attached to one query.
    pub fn is_multi(&self) -> bool {
        matches!(
            self,
            ComponentKind::FacetField
                | ComponentKind::FacetQuery
                | ComponentKind::FacetRange
                | ComponentKind::FacetPivot
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A component with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    FacetField(FacetField),
    FacetQuery(FacetQuery),
    FacetRange(FacetRange),
    FacetPivot(FacetPivot),
    Highlighting(Highlighting),
    Spellcheck(Spellcheck),
    Suggester(Suggester),
    Grouping(Grouping),
    Stats(Stats),
    Terms(Terms),
    MoreLikeThis(MoreLikeThis),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::FacetField(_) => ComponentKind::FacetField,
            Component::FacetQuery(_) => ComponentKind::FacetQuery,
            Component::FacetRange(_) => ComponentKind::FacetRange,
            Component::FacetPivot(_) => ComponentKind::FacetPivot,
            Component::Highlighting(_) => ComponentKind::Highlighting,
            Component::Spellcheck(_) => ComponentKind::Spellcheck,
            Component::Suggester(_) => ComponentKind::Suggester,
            Component::Grouping(_) => ComponentKind::Grouping,
            Component::Stats(_) => ComponentKind::Stats,
            Component::Terms(_) => ComponentKind::Terms,
            Component::MoreLikeThis(_) => ComponentKind::MoreLikeThis,
        }
    }

    /// The key results are stored under.
    ///
    /// `None` only for a facet that has not been attached yet and was given no key.
    pub fn key(&self) -> Option<&str> {
        match self {
            Component::FacetField(f) => f.key.as_deref(),
            Component::FacetQuery(f) => f.key.as_deref(),
            Component::FacetRange(f) => f.key.as_deref(),
            Component::FacetPivot(f) => f.key.as_deref(),
            other => Some(other.kind().name()),
        }
    }

    pub(crate) fn set_key(&mut self, key: String) {
        match self {
            Component::FacetField(f) => f.key = Some(key),
            Component::FacetQuery(f) => f.key = Some(key),
            Component::FacetRange(f) => f.key = Some(key),
            Component::FacetPivot(f) => f.key = Some(key),
            _ => {}
        }
    }
}

macro_rules! component_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Component {
                fn from(value: $variant) -> Self {
                    Component::$variant(value)
                }
            }
        )*
    };
}

component_from!(
    FacetField,
    FacetQuery,
    FacetRange,
    FacetPivot,
    Highlighting,
    Spellcheck,
    Suggester,
    Grouping,
    Stats,
    Terms,
    MoreLikeThis,
);

/// The parsed section of one component.
#[derive(Debug, Clone, PartialEq)]
pub enum SubResult {
    FacetField(FacetFieldResult),
    FacetQuery(FacetQueryResult),
    FacetRange(FacetRangeResult),
    FacetPivot(FacetPivotResult),
    Highlighting(HighlightingResult),
    Spellcheck(SpellcheckResult),
    Suggester(SuggesterResult),
    Grouping(GroupingResult),
    Stats(StatsResult),
    Terms(TermsResult),
    MoreLikeThis(MoreLikeThisResult),
}

impl SubResult {
    pub fn kind(&self) -> ComponentKind {
        match self {
            SubResult::FacetField(_) => ComponentKind::FacetField,
            SubResult::FacetQuery(_) => ComponentKind::FacetQuery,
            SubResult::FacetRange(_) => ComponentKind::FacetRange,
            SubResult::FacetPivot(_) => ComponentKind::FacetPivot,
            SubResult::Highlighting(_) => ComponentKind::Highlighting,
            SubResult::Spellcheck(_) => ComponentKind::Spellcheck,
            SubResult::Suggester(_) => ComponentKind::Suggester,
            SubResult::Grouping(_) => ComponentKind::Grouping,
            SubResult::Stats(_) => ComponentKind::Stats,
            SubResult::Terms(_) => ComponentKind::Terms,
            SubResult::MoreLikeThis(_) => ComponentKind::MoreLikeThis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_kinds() {
        let multi: Vec<ComponentKind> = ComponentKind::ALL
            .into_iter()
            .filter(ComponentKind::is_multi)
            .collect();
        assert_eq!(
            multi,
            vec![
                ComponentKind::FacetField,
                ComponentKind::FacetQuery,
                ComponentKind::FacetRange,
                ComponentKind::FacetPivot,
            ]
        );
    }

    #[test]
    fn test_singleton_key_is_kind_name() {
        let component: Component = Highlighting::new().into();
        assert_eq!(component.key(), Some("highlighting"));

        let mut facet: Component = FacetField::new("category").into();
        assert_eq!(facet.key(), None);
        facet.set_key("cat".into());
        assert_eq!(facet.key(), Some("cat"));
    }
}
