//! Declarative query descriptions.
//!
//! A [`Query`] names its type, carries the base parameters of that type and
//! the optional components attached to it. Which components a type accepts is
//! decided by the [`ComponentRegistry`].
//!
//! # Example
//!
//! ```
//! use corona::component::facet::FacetField;
//! use corona::component::highlighting::Highlighting;
//! use corona::Query;
//!
//! let mut query = Query::select("name:ipod");
//! query.attach(FacetField::new("category").with_key("cat")).unwrap();
//! query.attach(Highlighting::new().with_fields(["name"])).unwrap();
//!
//! assert!(query.component("cat").is_some());
//! assert!(query.component("highlighting").is_some());
//! ```

pub mod params;

use std::fmt;

use crate::component::registry::ComponentRegistry;
use crate::component::spellcheck::Spellcheck;
use crate::component::suggester::Suggester;
use crate::component::terms::Terms;
use crate::component::Component;
use crate::error::{CoronaError, Result};
use crate::request::{Method, Params, RequestScope};

use self::params::{MoreLikeThisParams, SelectParams};

/// The kinds of query this client can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Select,
    MoreLikeThis,
    Spellcheck,
    Suggester,
    Terms,
    Ping,
}

impl QueryType {
    pub const ALL: [QueryType; 6] = [
        QueryType::Select,
        QueryType::MoreLikeThis,
        QueryType::Spellcheck,
        QueryType::Suggester,
        QueryType::Terms,
        QueryType::Ping,
    ];

    /// Request handler path used unless the query overrides it.
    pub fn default_handler(&self) -> &'static str {
        match self {
            QueryType::Select => "select",
            QueryType::MoreLikeThis => "mlt",
            QueryType::Spellcheck => "spell",
            QueryType::Suggester => "suggest",
            QueryType::Terms => "terms",
            QueryType::Ping => "admin/ping",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QueryType::Select => "select",
            QueryType::MoreLikeThis => "morelikethis",
            QueryType::Spellcheck => "spellcheck",
            QueryType::Suggester => "suggester",
            QueryType::Terms => "terms",
            QueryType::Ping => "ping",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base parameters, one variant per query type.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParams {
    Select(SelectParams),
    MoreLikeThis(MoreLikeThisParams),
    Spellcheck(Spellcheck),
    Suggester(Suggester),
    Terms(Terms),
    Ping,
}

impl QueryParams {
    pub fn query_type(&self) -> QueryType {
        match self {
            QueryParams::Select(_) => QueryType::Select,
            QueryParams::MoreLikeThis(_) => QueryType::MoreLikeThis,
            QueryParams::Spellcheck(_) => QueryType::Spellcheck,
            QueryParams::Suggester(_) => QueryType::Suggester,
            QueryParams::Terms(_) => QueryType::Terms,
            QueryParams::Ping => QueryType::Ping,
        }
    }
}

impl From<SelectParams> for QueryParams {
    fn from(params: SelectParams) -> Self {
        QueryParams::Select(params)
    }
}

impl From<MoreLikeThisParams> for QueryParams {
    fn from(params: MoreLikeThisParams) -> Self {
        QueryParams::MoreLikeThis(params)
    }
}

impl From<Spellcheck> for QueryParams {
    fn from(params: Spellcheck) -> Self {
        QueryParams::Spellcheck(params)
    }
}

impl From<Suggester> for QueryParams {
    fn from(params: Suggester) -> Self {
        QueryParams::Suggester(params)
    }
}

impl From<Terms> for QueryParams {
    fn from(params: Terms) -> Self {
        QueryParams::Terms(params)
    }
}

/// A search service operation plus its attached components.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    params: QueryParams,
    components: Vec<Component>,
    handler: Option<String>,
    method: Method,
    scope: Option<RequestScope>,
    leader_affinity: bool,
    extra_params: Params,
}

impl Query {
    pub fn new(params: impl Into<QueryParams>) -> Self {
        Self {
            params: params.into(),
            components: Vec::new(),
            handler: None,
            method: Method::Get,
            scope: None,
            leader_affinity: false,
            extra_params: Params::new(),
        }
    }

    pub fn select(query: impl Into<String>) -> Self {
        Self::new(SelectParams::new(query))
    }

    pub fn more_like_this(query: impl Into<String>) -> Self {
        Self::new(MoreLikeThisParams::new(query))
    }

    pub fn spellcheck(query: impl Into<String>) -> Self {
        Self::new(Spellcheck::new().with_query(query))
    }

    pub fn suggester(query: impl Into<String>) -> Self {
        Self::new(Suggester::new().with_query(query))
    }

    pub fn terms<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Terms::new().with_fields(fields))
    }

    pub fn ping() -> Self {
        Self::new(QueryParams::Ping)
    }

    pub fn query_type(&self) -> QueryType {
        self.params.query_type()
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }

    /// Select parameters of a select or more-like-this query.
    pub fn select_params_mut(&mut self) -> Option<&mut SelectParams> {
        match &mut self.params {
            QueryParams::Select(select) => Some(select),
            QueryParams::MoreLikeThis(mlt) => Some(&mut mlt.select),
            _ => None,
        }
    }

    /// Override the request handler path.
    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    pub fn handler(&self) -> Option<&str> {
        self.handler.as_deref()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn with_scope(mut self, scope: RequestScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn scope(&self) -> RequestScope {
        self.scope.unwrap_or_default()
    }

    /// Prefer a leader endpoint when no endpoint key is given.
    pub fn with_leader_affinity(mut self, enabled: bool) -> Self {
        self.leader_affinity = enabled;
        self
    }

    pub fn leader_affinity(&self) -> bool {
        self.leader_affinity
    }

    /// Add a raw parameter sent after the base parameters.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.add(name, value);
        self
    }

    pub fn extra_params(&self) -> &Params {
        &self.extra_params
    }

    /// Attach a component and return the key it is stored under.
    ///
    /// Singleton kinds replace an earlier instance of the same kind and use the
    /// kind name as key. Multi-instance kinds (facets) keep the caller's key,
    /// or get the next free `facet_{n}` key when none is given. Facet keys and
    /// singleton kind names share one key space.
    pub fn attach(&mut self, component: impl Into<Component>) -> Result<String> {
        let mut component = component.into();
        let kind = component.kind();
        ComponentRegistry::for_type(self.query_type()).validate(kind)?;

        if !kind.is_multi() {
            let key = kind.name();
            if self
                .components
                .iter()
                .any(|c| c.kind() != kind && c.key() == Some(key))
            {
                return Err(CoronaError::duplicate_key(key));
            }
            self.components.retain(|c| c.kind() != kind);
            self.components.push(component);
            return Ok(kind.name().to_string());
        }

        let key = match component.key().filter(|k| !k.is_empty()) {
            Some(key) => {
                if self.key_in_use(key) {
                    return Err(CoronaError::duplicate_key(key));
                }
                key.to_string()
            }
            None => {
                let key = self.next_auto_key();
                component.set_key(key.clone());
                key
            }
        };
        self.components.push(component);
        Ok(key)
    }

    /// Builder-style [`attach`](Self::attach).
    pub fn with_component(mut self, component: impl Into<Component>) -> Result<Self> {
        self.attach(component)?;
        Ok(self)
    }

    pub fn component(&self, key: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.key() == Some(key))
    }

    pub fn remove_component(&mut self, key: &str) -> Option<Component> {
        let index = self.components.iter().position(|c| c.key() == Some(key))?;
        Some(self.components.remove(index))
    }

    /// Components in attachment order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Components in the fixed order of the query type, then by key.
    pub fn ordered_components(&self) -> Vec<&Component> {
        let registry = ComponentRegistry::for_type(self.query_type());
        let mut ordered: Vec<&Component> = self.components.iter().collect();
        ordered.sort_by(|a, b| {
            registry
                .position(a.kind())
                .cmp(&registry.position(b.kind()))
                .then_with(|| a.key().cmp(&b.key()))
        });
        ordered
    }

    fn key_in_use(&self, key: &str) -> bool {
        self.components.iter().any(|c| c.key() == Some(key))
    }

    fn next_auto_key(&self) -> String {
        (1..)
            .map(|n| format!("facet_{n}"))
            .find(|key| !self.key_in_use(key))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::facet::{FacetField, FacetPivot, FacetRange};
    use crate::component::grouping::Grouping;
    use crate::component::highlighting::Highlighting;
    use crate::component::stats::Stats;
    use crate::component::ComponentKind;

    #[test]
    fn test_query_types() {
        assert_eq!(Query::select("*:*").query_type(), QueryType::Select);
        assert_eq!(Query::more_like_this("id:1").query_type(), QueryType::MoreLikeThis);
        assert_eq!(Query::spellcheck("cort").query_type(), QueryType::Spellcheck);
        assert_eq!(Query::suggester("elec").query_type(), QueryType::Suggester);
        assert_eq!(Query::terms(["name"]).query_type(), QueryType::Terms);
        assert_eq!(Query::ping().query_type(), QueryType::Ping);
    }

    #[test]
    fn test_unsupported_component() {
        let mut query = Query::ping();
        let err = query.attach(FacetField::new("cat")).unwrap_err();
        assert!(matches!(err, CoronaError::Component(_)));
        assert!(query.components().is_empty());
    }

    #[test]
    fn test_duplicate_facet_key() {
        let mut query = Query::select("*:*");
        query.attach(FacetField::new("category").with_key("cat")).unwrap();
        let err = query
            .attach(FacetRange::new("price", "0", "100", "10").with_key("cat"))
            .unwrap_err();
        assert!(matches!(err, CoronaError::DuplicateKey { ref key } if key == "cat"));
    }

    #[test]
    fn test_facet_key_collides_with_singleton() {
        let mut query = Query::select("*:*");
        query.attach(Stats::new().with_field("price")).unwrap();
        let err = query
            .attach(FacetField::new("category").with_key("stats"))
            .unwrap_err();
        assert!(matches!(err, CoronaError::DuplicateKey { ref key } if key == "stats"));

        let mut query = Query::select("*:*");
        query.attach(FacetField::new("category").with_key("highlighting")).unwrap();
        let err = query.attach(Highlighting::new()).unwrap_err();
        assert!(matches!(err, CoronaError::DuplicateKey { ref key } if key == "highlighting"));
        assert_eq!(query.components().len(), 1);
        assert_eq!(
            query.component("highlighting").map(Component::kind),
            Some(ComponentKind::FacetField)
        );
    }

    #[test]
    fn test_auto_keys() {
        let mut query = Query::select("*:*");
        let first = query.attach(FacetField::new("category")).unwrap();
        let second = query.attach(FacetPivot::new(["cat", "inStock"])).unwrap();
        assert_eq!(first, "facet_1");
        assert_eq!(second, "facet_2");

        query.remove_component("facet_1");
        let third = query.attach(FacetField::new("manu")).unwrap();
        assert_eq!(third, "facet_1");
    }

    #[test]
    fn test_auto_key_skips_explicit_key() {
        let mut query = Query::select("*:*");
        query.attach(FacetField::new("a").with_key("facet_1")).unwrap();
        assert_eq!(query.attach(FacetField::new("b")).unwrap(), "facet_2");
    }

    #[test]
    fn test_singleton_replaced() {
        let mut query = Query::select("*:*");
        query.attach(Highlighting::new().with_fields(["name"])).unwrap();
        let key = query.attach(Highlighting::new().with_fields(["features"])).unwrap();
        assert_eq!(key, "highlighting");
        assert_eq!(query.components().len(), 1);
        match query.component("highlighting").unwrap() {
            Component::Highlighting(hl) => assert_eq!(hl.fields, vec!["features".to_string()]),
            other => panic!("unexpected component {other:?}"),
        }
    }

    #[test]
    fn test_ordered_components() {
        let mut query = Query::select("*:*");
        query.attach(Stats::new().with_field("price")).unwrap();
        query.attach(Grouping::new().with_field("manu")).unwrap();
        query.attach(FacetField::new("b").with_key("zz")).unwrap();
        query.attach(FacetField::new("a").with_key("aa")).unwrap();

        let kinds: Vec<(ComponentKind, Option<&str>)> = query
            .ordered_components()
            .into_iter()
            .map(|c| (c.kind(), c.key()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ComponentKind::FacetField, Some("aa")),
                (ComponentKind::FacetField, Some("zz")),
                (ComponentKind::Grouping, Some("grouping")),
                (ComponentKind::Stats, Some("stats")),
            ]
        );
    }

    #[test]
    fn test_with_component_builder() {
        let query = Query::select("*:*")
            .with_component(FacetField::new("category").with_key("cat"))
            .and_then(|q| q.with_component(Highlighting::new()))
            .unwrap();
        assert_eq!(query.components().len(), 2);
    }

    #[test]
    fn test_select_params_mut() {
        let mut query = Query::more_like_this("id:1");
        query.select_params_mut().unwrap().rows = 3;
        match query.params() {
            QueryParams::MoreLikeThis(mlt) => assert_eq!(mlt.select.rows, 3),
            other => panic!("unexpected params {other:?}"),
        }
        assert!(Query::ping().select_params_mut().is_none());
    }
}
