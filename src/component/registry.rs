//! Per query type component table.
//!
//! Each query type permits an ordered list of component kinds. The order is
//! the order in which components are serialized into a request and parsed out
//! of a response, independent of the order they were attached in. Each kind
//! resolves to a [`ComponentHandler`]: a pair of plain functions that build
//! the kind's parameters and parse its response section.

use serde_json::Value;

use crate::component::{
    facet, grouping, highlighting, more_like_this, spellcheck, stats, suggester, terms, Component,
    ComponentKind, SubResult,
};
use crate::error::{CoronaError, Result};
use crate::query::QueryType;
use crate::request::Params;

/// Appends a component's parameters to a request.
pub type BuildFn = fn(&Component, &mut Params);

/// Extracts a component's section from a decoded response body.
///
/// Returns `None` when the section is missing or malformed.
pub type ParseFn = fn(&Component, &Value) -> Option<SubResult>;

/// The builder and parser registered for one component kind.
#[derive(Clone, Copy)]
pub struct ComponentHandler {
    pub kind: ComponentKind,
    pub build: BuildFn,
    pub parse: ParseFn,
}

impl std::fmt::Debug for ComponentHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentHandler")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// The handler of a component kind.
pub fn handler(kind: ComponentKind) -> ComponentHandler {
    match kind {
        ComponentKind::FacetField => facet::FIELD_HANDLER,
        ComponentKind::FacetQuery => facet::QUERY_HANDLER,
        ComponentKind::FacetRange => facet::RANGE_HANDLER,
        ComponentKind::FacetPivot => facet::PIVOT_HANDLER,
        ComponentKind::Highlighting => highlighting::HANDLER,
        ComponentKind::Spellcheck => spellcheck::HANDLER,
        ComponentKind::Suggester => suggester::HANDLER,
        ComponentKind::Grouping => grouping::HANDLER,
        ComponentKind::Stats => stats::HANDLER,
        ComponentKind::Terms => terms::HANDLER,
        ComponentKind::MoreLikeThis => more_like_this::HANDLER,
    }
}

const SELECT_KINDS: &[ComponentKind] = &[
    ComponentKind::FacetField,
    ComponentKind::FacetQuery,
    ComponentKind::FacetRange,
    ComponentKind::FacetPivot,
    ComponentKind::Highlighting,
    ComponentKind::Grouping,
    ComponentKind::Spellcheck,
    ComponentKind::Suggester,
    ComponentKind::Stats,
    ComponentKind::Terms,
    ComponentKind::MoreLikeThis,
];

const MORE_LIKE_THIS_KINDS: &[ComponentKind] = &[
    ComponentKind::FacetField,
    ComponentKind::FacetQuery,
    ComponentKind::FacetRange,
    ComponentKind::FacetPivot,
    ComponentKind::Highlighting,
    ComponentKind::Stats,
];

/// The components a query type accepts, in serialization order.
#[derive(Debug, Clone, Copy)]
pub struct ComponentRegistry {
    query_type: QueryType,
    kinds: &'static [ComponentKind],
}

impl ComponentRegistry {
    pub fn for_type(query_type: QueryType) -> Self {
        let kinds = match query_type {
            QueryType::Select => SELECT_KINDS,
            QueryType::MoreLikeThis => MORE_LIKE_THIS_KINDS,
            QueryType::Spellcheck | QueryType::Suggester | QueryType::Terms | QueryType::Ping => {
                &[]
            }
        };
        Self { query_type, kinds }
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    pub fn kinds(&self) -> &'static [ComponentKind] {
        self.kinds
    }

    pub fn supports(&self, kind: ComponentKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Serialization position of a kind. Unsupported kinds sort last.
    pub fn position(&self, kind: ComponentKind) -> usize {
        self.kinds
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(self.kinds.len())
    }

    pub fn validate(&self, kind: ComponentKind) -> Result<()> {
        if self.supports(kind) {
            Ok(())
        } else {
            Err(CoronaError::component(format!(
                "{} queries do not support the {} component",
                self.query_type, kind
            )))
        }
    }

    pub fn handler(&self, kind: ComponentKind) -> Result<ComponentHandler> {
        self.validate(kind)?;
        Ok(handler(kind))
    }

    /// Handlers of every permitted kind, in order.
    pub fn handlers(&self) -> impl Iterator<Item = ComponentHandler> + '_ {
        self.kinds.iter().map(|kind| handler(*kind))
    }
}
