//! JSON Facet API request trees.
//!
//! A [`FacetTree`] is serialized whole into the `json.facet` parameter. Each
//! node is tagged with its `type` and may carry a nested tree under `facet`.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::schema::FieldRef;

/// Facet name -> facet definition
pub type FacetTree<I> = BTreeMap<String, Facet<I>>;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", bound(serialize = ""))]
pub enum Facet<I> {
    Terms(TermsFacet<I>),
    Query(QueryFacet<I>),
    Range(RangeFacet<I>),
    Heatmap(HeatmapFacet<I>),
}

/// Buckets per distinct field value
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = ""))]
pub struct TermsFacet<I> {
    pub field: FieldRef<I>,
    /// Bucket count, `-1` for unlimited. Sent as given.
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrequest: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<FacetTree<I>>,
}

impl<I> TermsFacet<I> {
    pub fn new(field: impl Into<FieldRef<I>>, limit: i64) -> Self {
        Self {
            field: field.into(),
            limit,
            sort: None,
            overrequest: None,
            facet: None,
        }
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn overrequest(mut self, overrequest: i64) -> Self {
        self.overrequest = Some(overrequest);
        self
    }

    pub fn facet(mut self, name: impl Into<String>, facet: impl Into<Facet<I>>) -> Self {
        self.facet
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), facet.into());
        self
    }
}

/// Single bucket for the documents matching a sub-query
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = ""))]
pub struct QueryFacet<I> {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<FacetTree<I>>,
}

impl<I> QueryFacet<I> {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            facet: None,
        }
    }

    pub fn facet(mut self, name: impl Into<String>, facet: impl Into<Facet<I>>) -> Self {
        self.facet
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), facet.into());
        self
    }
}

/// Numeric range buckets of width `gap` between `start` and `end`
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = ""))]
pub struct RangeFacet<I> {
    pub field: FieldRef<I>,
    pub start: f64,
    pub end: f64,
    pub gap: f64,
    pub hardend: String,
    pub other: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<FacetTree<I>>,
}

impl<I> RangeFacet<I> {
    pub fn new(field: impl Into<FieldRef<I>>, start: f64, end: f64, gap: f64) -> Self {
        Self {
            field: field.into(),
            start,
            end,
            gap,
            hardend: "false".to_string(),
            other: "none".to_string(),
            include: None,
            facet: None,
        }
    }

    pub fn hardend(mut self, hardend: impl Into<String>) -> Self {
        self.hardend = hardend.into();
        self
    }

    pub fn other(mut self, other: impl Into<String>) -> Self {
        self.other = other.into();
        self
    }

    pub fn include(mut self, include: impl Into<String>) -> Self {
        self.include = Some(include.into());
        self
    }

    pub fn facet(mut self, name: impl Into<String>, facet: impl Into<Facet<I>>) -> Self {
        self.facet
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), facet.into());
        self
    }
}

/// Spatial grid counts over a geometry
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = ""))]
pub struct HeatmapFacet<I> {
    pub field: FieldRef<I>,
    pub geom: String,
    #[serde(rename = "gridLevel")]
    pub grid_level: u32,
}

impl<I> HeatmapFacet<I> {
    pub fn new(field: impl Into<FieldRef<I>>, geom: impl Into<String>, grid_level: u32) -> Self {
        Self {
            field: field.into(),
            geom: geom.into(),
            grid_level,
        }
    }
}

impl<I> From<TermsFacet<I>> for Facet<I> {
    fn from(facet: TermsFacet<I>) -> Self {
        Facet::Terms(facet)
    }
}

impl<I> From<QueryFacet<I>> for Facet<I> {
    fn from(facet: QueryFacet<I>) -> Self {
        Facet::Query(facet)
    }
}

impl<I> From<RangeFacet<I>> for Facet<I> {
    fn from(facet: RangeFacet<I>) -> Self {
        Facet::Range(facet)
    }
}

impl<I> From<HeatmapFacet<I>> for Facet<I> {
    fn from(facet: HeatmapFacet<I>) -> Self {
        Facet::Heatmap(facet)
    }
}
