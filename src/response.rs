use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub status: i64,
    #[serde(rename = "QTime")]
    pub qtime: u64,
    /// Echoed request parameters; repeated keys come back as arrays
    #[serde(default)]
    pub params: HashMap<String, Value>,
}

/// Flat result of `/select`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<D> {
    pub response_header: ResponseHeader,
    pub response: DocList<D>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocList<D> {
    pub num_found: u64,
    pub start: u64,
    pub docs: Vec<D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_found_exact: Option<bool>,
}

/// Grouped result, keyed by group field name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse<D> {
    pub response_header: ResponseHeader,
    pub grouped: HashMap<String, GroupList<D>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupList<D> {
    pub matches: u64,
    /// Present when `group.ngroups=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ngroups: Option<u64>,
    pub groups: Vec<GroupEntry<D>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEntry<D> {
    /// `null` for documents without a value in the group field
    pub group_value: Value,
    pub doclist: DocList<D>,
}

/// Grouped result with JSON facet counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetGroupResponse<D> {
    #[serde(flatten)]
    pub group: GroupResponse<D>,
    #[serde(default)]
    pub facets: FacetCounts,
}

/// Top of the facet result tree: the overall count plus one entry per
/// requested facet, keyed by the request's facet names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetCounts {
    #[serde(default)]
    pub count: u64,
    #[serde(flatten)]
    pub facets: Map<String, Value>,
}

impl FacetCounts {
    pub fn facet(&self, name: &str) -> Option<FacetNode> {
        node_at(&self.facets, name)
    }
}

/// Result of one facet: buckets for terms/range facets, a count for query
/// facets. Anything else (range `before`/`after`, heatmap grids, nested query
/// facets) stays in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default)]
    pub buckets: Vec<FacetBucket>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FacetNode {
    pub fn facet(&self, name: &str) -> Option<FacetNode> {
        node_at(&self.extra, name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetBucket {
    pub val: Value,
    pub count: u64,
    /// Nested facet results, keyed by sub-facet name
    #[serde(flatten)]
    pub facets: Map<String, Value>,
}

impl FacetBucket {
    pub fn facet(&self, name: &str) -> Option<FacetNode> {
        node_at(&self.facets, name)
    }
}

fn node_at(map: &Map<String, Value>, name: &str) -> Option<FacetNode> {
    map.get(name)
        .filter(|value| value.is_object())
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

/// Acknowledgement of an update or delete
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub response_header: ResponseHeader,
}
