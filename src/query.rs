//! Query descriptions and their compilation into native Solr parameters.
//!
//! Each builder extends the output of the previous one: edismax and grouping
//! add parameters on top of the standard set, and group faceting adds on top
//! of grouping. Nothing is ever removed, only overridden (`group`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::facet::FacetTree;
use crate::params::NativeParams;
use crate::schema::FieldRef;

/// Default operator between query terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalOperation {
    #[serde(rename = "AND")]
    And,
    #[default]
    #[serde(rename = "OR")]
    Or,
}

/// Response writer (`wt`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    Desc,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Asc => f.write_str("asc"),
            Order::Desc => f.write_str("desc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort<I> {
    pub field: FieldRef<I>,
    pub order: Order,
}

impl<I> Sort<I> {
    pub fn asc(field: impl Into<FieldRef<I>>) -> Self {
        Self {
            field: field.into(),
            order: Order::Asc,
        }
    }

    pub fn desc(field: impl Into<FieldRef<I>>) -> Self {
        Self {
            field: field.into(),
            order: Order::Desc,
        }
    }
}

impl<I> fmt::Display for Sort<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.order)
    }
}

/// A searched field with an optional boost
#[derive(Debug, Clone, PartialEq)]
pub struct QueryField<I> {
    pub field: FieldRef<I>,
    pub weight: Option<f64>,
}

impl<I> fmt::Display for QueryField<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weight {
            Some(weight) if weight != 0.0 && !weight.is_nan() => {
                write!(f, "{}^{}", self.field, weight)
            }
            _ => write!(f, "{}", self.field),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

// ========== Query Descriptions ==========

/// A search over index `I` returning documents of shape `D`
#[derive(Debug, Clone)]
pub struct StandardQuery<I, D = I> {
    pub q: Option<String>,
    pub q_op: Option<LogicalOperation>,
    pub fq: Vec<String>,
    pub fl: Vec<FieldRef<D>>,
    pub sort: Vec<Sort<I>>,
    pub start: Option<u64>,
    pub rows: Option<u64>,
    pub indent: Option<bool>,
    pub wt: Option<ResponseFormat>,
    pub spatial: Option<bool>,
    pub pt: Option<Point>,
    pub d: Option<f64>,
    pub shield: Option<FieldRef<I>>,
}

impl<I, D> Default for StandardQuery<I, D> {
    fn default() -> Self {
        Self {
            q: None,
            q_op: None,
            fq: Vec::new(),
            fl: Vec::new(),
            sort: Vec::new(),
            start: None,
            rows: None,
            indent: None,
            wt: None,
            spatial: None,
            pt: None,
            d: None,
            shield: None,
        }
    }
}

impl<I, D> StandardQuery<I, D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn q_op(mut self, op: LogicalOperation) -> Self {
        self.q_op = Some(op);
        self
    }

    /// Add a filter fragment, see [`crate::filter`]
    pub fn filter(mut self, fragment: impl Into<String>) -> Self {
        self.fq.push(fragment.into());
        self
    }

    pub fn field(mut self, field: impl Into<FieldRef<D>>) -> Self {
        self.fl.push(field.into());
        self
    }

    pub fn sort(mut self, sort: Sort<I>) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn rows(mut self, rows: u64) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn wt(mut self, wt: ResponseFormat) -> Self {
        self.wt = Some(wt);
        self
    }

    /// Spatial filter: documents within `distance` km of `point` on `field`
    pub fn spatial(mut self, field: impl Into<FieldRef<I>>, point: Point, distance: f64) -> Self {
        self.spatial = Some(true);
        self.shield = Some(field.into());
        self.pt = Some(point);
        self.d = Some(distance);
        self
    }
}

/// Relevance-ranked search through the extended DisMax parser
#[derive(Debug, Clone)]
pub struct EdismaxQuery<I, D = I> {
    pub query: StandardQuery<I, D>,
    pub qf: Vec<QueryField<I>>,
    pub mm: Option<String>,
    pub tie: Option<f64>,
    pub bq: Option<String>,
    pub bf: Option<String>,
    pub q_alt: Option<String>,
}

impl<I, D> EdismaxQuery<I, D> {
    pub fn new(query: StandardQuery<I, D>) -> Self {
        Self {
            query,
            qf: Vec::new(),
            mm: None,
            tie: None,
            bq: None,
            bf: None,
            q_alt: None,
        }
    }

    pub fn qf(mut self, field: impl Into<FieldRef<I>>) -> Self {
        self.qf.push(QueryField {
            field: field.into(),
            weight: None,
        });
        self
    }

    pub fn qf_weighted(mut self, field: impl Into<FieldRef<I>>, weight: f64) -> Self {
        self.qf.push(QueryField {
            field: field.into(),
            weight: Some(weight),
        });
        self
    }

    pub fn mm(mut self, mm: impl Into<String>) -> Self {
        self.mm = Some(mm.into());
        self
    }

    pub fn tie(mut self, tie: f64) -> Self {
        self.tie = Some(tie);
        self
    }

    pub fn bq(mut self, bq: impl Into<String>) -> Self {
        self.bq = Some(bq.into());
        self
    }

    pub fn bf(mut self, bf: impl Into<String>) -> Self {
        self.bf = Some(bf.into());
        self
    }

    pub fn q_alt(mut self, q_alt: impl Into<String>) -> Self {
        self.q_alt = Some(q_alt.into());
        self
    }
}

/// How results are collapsed into groups
#[derive(Debug, Clone)]
pub struct Group<I> {
    pub field: Vec<FieldRef<I>>,
    pub ngroups: Option<bool>,
    pub sort: Option<Sort<I>>,
    pub limit: Option<i64>,
    pub offset: Option<u64>,
    /// Only read by group-facet queries
    pub truncate: Option<bool>,
}

impl<I> Group<I> {
    pub fn by(field: impl Into<FieldRef<I>>) -> Self {
        Self {
            field: vec![field.into()],
            ngroups: None,
            sort: None,
            limit: None,
            offset: None,
            truncate: None,
        }
    }

    pub fn and_by(mut self, field: impl Into<FieldRef<I>>) -> Self {
        self.field.push(field.into());
        self
    }

    pub fn ngroups(mut self, ngroups: bool) -> Self {
        self.ngroups = Some(ngroups);
        self
    }

    pub fn sort(mut self, sort: Sort<I>) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = Some(truncate);
        self
    }
}

#[derive(Debug, Clone)]
pub struct GroupQuery<I, D = I> {
    pub query: StandardQuery<I, D>,
    pub group: Group<I>,
}

impl<I, D> GroupQuery<I, D> {
    pub fn new(query: StandardQuery<I, D>, group: Group<I>) -> Self {
        Self { query, group }
    }
}

#[derive(Debug, Clone)]
pub struct GroupFacetQuery<I, D = I> {
    pub query: GroupQuery<I, D>,
    pub facet: FacetTree<I>,
}

impl<I, D> GroupFacetQuery<I, D> {
    pub fn new(query: GroupQuery<I, D>, facet: FacetTree<I>) -> Self {
        Self { query, facet }
    }
}

// ========== Native Solr Parameters ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolrStandardQuery {
    pub q: String,
    #[serde(rename = "q.op")]
    pub q_op: LogicalOperation,
    pub fq: Vec<String>,
    pub start: Option<u64>,
    pub rows: Option<u64>,
    pub sort: Option<String>,
    pub fl: Option<String>,
    pub group: bool,
    pub indent: Option<bool>,
    pub wt: ResponseFormat,
    pub spatial: Option<bool>,
    pub pt: Option<String>,
    pub d: Option<f64>,
    pub shield: Option<String>,
}

/// Value of `defType` selecting the extended DisMax parser
pub const EDISMAX: &str = "edismax";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolrEdismaxQuery {
    #[serde(flatten)]
    pub standard: SolrStandardQuery,
    pub qf: Option<String>,
    pub mm: Option<String>,
    pub tie: Option<f64>,
    pub bq: Option<String>,
    pub bf: Option<String>,
    #[serde(rename = "q.alt")]
    pub q_alt: Option<String>,
    #[serde(rename = "defType")]
    pub def_type: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupFormat {
    Grouped,
    Simple,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolrGroupQuery {
    #[serde(flatten)]
    pub standard: SolrStandardQuery,
    #[serde(rename = "group.format")]
    pub group_format: GroupFormat,
    #[serde(rename = "group.field")]
    pub group_field: Vec<String>,
    #[serde(rename = "group.sort")]
    pub group_sort: Option<String>,
    #[serde(rename = "group.ngroups")]
    pub group_ngroups: Option<bool>,
    #[serde(rename = "group.limit")]
    pub group_limit: Option<i64>,
    #[serde(rename = "group.offset")]
    pub group_offset: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolrGroupFacetQuery {
    #[serde(flatten)]
    pub group: SolrGroupQuery,
    #[serde(rename = "group.truncate")]
    pub group_truncate: Option<bool>,
    #[serde(rename = "json.facet")]
    pub json_facet: String,
}

impl NativeParams for SolrStandardQuery {}
impl NativeParams for SolrEdismaxQuery {}
impl NativeParams for SolrGroupQuery {}
impl NativeParams for SolrGroupFacetQuery {}

// ========== Builders ==========

fn join_non_empty<T: fmt::Display>(items: &[T], separator: &str) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator),
    )
}

pub fn build_standard_query<I, D>(query: &StandardQuery<I, D>) -> SolrStandardQuery {
    SolrStandardQuery {
        q: query.q.clone().unwrap_or_else(|| "*:*".to_string()),
        q_op: query.q_op.unwrap_or_default(),
        fq: query.fq.clone(),
        start: query.start,
        rows: query.rows,
        sort: join_non_empty(&query.sort, ","),
        fl: join_non_empty(&query.fl, ","),
        group: false,
        indent: query.indent,
        wt: query.wt.unwrap_or_default(),
        spatial: query.spatial,
        pt: query.pt.map(|pt| pt.to_string()),
        d: query.d,
        shield: query.shield.as_ref().map(|field| field.name().to_string()),
    }
}

pub fn build_edismax_query<I, D>(query: &EdismaxQuery<I, D>) -> SolrEdismaxQuery {
    SolrEdismaxQuery {
        standard: build_standard_query(&query.query),
        qf: join_non_empty(&query.qf, " "),
        mm: query.mm.clone(),
        tie: query.tie,
        bq: query.bq.clone(),
        bf: query.bf.clone(),
        q_alt: query.q_alt.clone(),
        def_type: EDISMAX,
    }
}

pub fn build_solr_group_query<I, D>(query: &GroupQuery<I, D>) -> SolrGroupQuery {
    let mut standard = build_standard_query(&query.query);
    standard.group = true;

    let group = &query.group;
    SolrGroupQuery {
        standard,
        group_format: GroupFormat::Grouped,
        group_field: group.field.iter().map(|f| f.name().to_string()).collect(),
        group_sort: group.sort.as_ref().map(ToString::to_string),
        group_ngroups: group.ngroups,
        group_limit: group.limit,
        group_offset: group.offset,
    }
}

pub fn build_solr_group_facet_query<I, D>(
    query: &GroupFacetQuery<I, D>,
) -> Result<SolrGroupFacetQuery> {
    Ok(SolrGroupFacetQuery {
        group: build_solr_group_query(&query.query),
        group_truncate: query.query.group.truncate,
        json_facet: serde_json::to_string(&query.facet)?,
    })
}
