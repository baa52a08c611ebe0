//! Field statistics component.

use serde_json::Value;

use crate::component::registry::ComponentHandler;
use crate::component::{Component, ComponentKind, SubResult};
use crate::request::Params;
use crate::util::{as_f64, as_u64, named_list};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stats {
    pub fields: Vec<String>,
    /// Fields to break the statistics down by.
    pub facets: Vec<String>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn with_facet(mut self, field: impl Into<String>) -> Self {
        self.facets.push(field.into());
        self
    }

    pub(crate) fn write_params(&self, params: &mut Params) {
        params.set("stats", "true");
        for field in &self.fields {
            params.add("stats.field", field.clone());
        }
        for facet in &self.facets {
            params.add("stats.facet", facet.clone());
        }
    }
}

/// Statistics of one field.
///
/// `min` and `max` stay as JSON because they follow the field's type
/// (numbers, dates or strings).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldStats {
    pub min: Option<Value>,
    pub max: Option<Value>,
    pub count: Option<u64>,
    pub missing: Option<u64>,
    pub sum: Option<f64>,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
    pub sum_of_squares: Option<f64>,
    /// Per-facet-value breakdown, keyed by facet field then value.
    pub facets: Vec<(String, Vec<(String, FieldStats)>)>,
}

impl FieldStats {
    fn parse(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let facets = object
            .get("facets")
            .and_then(named_list)
            .map(|facets| {
                facets
                    .into_iter()
                    .map(|(field, values)| {
                        let values = named_list(values)
                            .unwrap_or_default()
                            .into_iter()
                            .filter_map(|(v, stats)| FieldStats::parse(stats).map(|s| (v, s)))
                            .collect();
                        (field, values)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Some(Self {
            min: object.get("min").filter(|v| !v.is_null()).cloned(),
            max: object.get("max").filter(|v| !v.is_null()).cloned(),
            count: object.get("count").and_then(as_u64),
            missing: object.get("missing").and_then(as_u64),
            sum: object.get("sum").and_then(as_f64),
            mean: object.get("mean").and_then(as_f64),
            stddev: object.get("stddev").and_then(as_f64),
            sum_of_squares: object.get("sumOfSquares").and_then(as_f64),
            facets,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsResult {
    pub fields: Vec<(String, FieldStats)>,
}

impl StatsResult {
    pub fn field(&self, name: &str) -> Option<&FieldStats> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, stats)| stats)
    }

    fn parse(section: &Value) -> Option<Self> {
        let fields = named_list(section.get("stats_fields")?)?
            .into_iter()
            // A field with no values comes back as null.
            .filter_map(|(field, stats)| FieldStats::parse(stats).map(|s| (field, s)))
            .collect();
        Some(Self { fields })
    }
}

pub(crate) const HANDLER: ComponentHandler = ComponentHandler {
    kind: ComponentKind::Stats,
    build,
    parse,
};

fn build(component: &Component, params: &mut Params) {
    if let Component::Stats(stats) = component {
        stats.write_params(params);
    }
}

fn parse(_component: &Component, body: &Value) -> Option<SubResult> {
    StatsResult::parse(body.get("stats")?).map(SubResult::Stats)
}
