// Re-export main components
pub mod client;
pub mod config;
pub mod date_time;
pub mod error;
pub mod facet;
pub mod filter;
pub mod params;
pub mod query;
pub mod response;
pub mod schema;
pub mod transport;
pub mod write;

// Re-export commonly used types
pub use client::SolrClient;
pub use config::SolrConfig;
pub use date_time::{format_date, format_date_time};
pub use facet::{Facet, FacetTree, HeatmapFacet, QueryFacet, RangeFacet, TermsFacet};
pub use filter::{
    date_range_match, escape_value, match_value, multi_match, range_match, unmatch_value,
    DateTerm, RangeMatch, Term,
};
pub use params::{NativeParams, Params};
pub use query::{
    build_edismax_query, build_solr_group_facet_query, build_solr_group_query,
    build_standard_query, EdismaxQuery, Group, GroupFacetQuery, GroupQuery, LogicalOperation,
    Order, Point, ResponseFormat, SolrEdismaxQuery, SolrGroupFacetQuery, SolrGroupQuery,
    SolrStandardQuery, Sort, StandardQuery,
};
pub use response::{
    DocList, FacetBucket, FacetCounts, FacetGroupResponse, FacetNode, GroupEntry, GroupList,
    GroupResponse, Response, ResponseHeader, UpdateResponse,
};
pub use schema::{Field, FieldRef, FieldType, Scalar, Schema};
pub use reqwest::header::{HeaderName, HeaderValue};
pub use transport::RequestOptions;
pub use write::{FieldBoost, RemoveQuery, UpdateRequest};

// Re-export error types
pub use error::{Result, SolrError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
