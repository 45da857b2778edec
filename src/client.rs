use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

use crate::config::SolrConfig;
use crate::error::Result;
use crate::filter::{self, DateTerm, RangeMatch, Term};
use crate::params::{NativeParams, Params};
use crate::query::{
    self, EdismaxQuery, GroupFacetQuery, GroupQuery, SolrEdismaxQuery, SolrGroupFacetQuery,
    SolrGroupQuery, SolrStandardQuery, StandardQuery,
};
use crate::response::{FacetGroupResponse, GroupResponse, Response, UpdateResponse};
use crate::schema::{Field, FieldType};
use crate::transport::{HttpTransport, RequestConfig, RequestOptions};
use crate::write::{RemoveQuery, UpdateRequest};

/// Client bound to one Solr collection.
///
/// `I` is the index schema (what filters, sorts and writes may name) and `D`
/// the shape of returned documents. The client holds no state besides the
/// collection name, the base URL and the HTTP connection settings.
pub struct SolrClient<I, D = I> {
    collection: String,
    base_url: String,
    transport: HttpTransport,
    _schema: PhantomData<fn() -> (I, D)>,
}

impl<I, D> SolrClient<I, D> {
    /// Client configured from `SOLR_BASE_URL`
    pub fn new(collection: impl Into<String>) -> Result<Self> {
        Self::with_config(collection, &SolrConfig::from_env())
    }

    pub fn with_config(collection: impl Into<String>, config: &SolrConfig) -> Result<Self> {
        Ok(Self {
            collection: collection.into(),
            base_url: config.base_url.clone(),
            transport: HttpTransport::new(config)?,
            _schema: PhantomData,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, handler: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, handler)
    }

    // ========== Filter Fragments ==========

    pub fn match_value<T: FieldType>(
        &self,
        field: Field<I, T>,
        value: impl Into<Term<T::Scalar>>,
    ) -> String {
        filter::match_value(field, value)
    }

    pub fn unmatch_value<T: FieldType>(
        &self,
        field: Field<I, T>,
        value: impl Into<Term<T::Scalar>>,
    ) -> String {
        filter::unmatch_value(field, value)
    }

    pub fn multi_match<T, V>(&self, field: Field<I, T>, values: impl IntoIterator<Item = V>) -> String
    where
        T: FieldType,
        V: Into<T::Scalar>,
    {
        filter::multi_match(field, values)
    }

    pub fn range_match<T: FieldType>(
        &self,
        field: Field<I, T>,
        range: RangeMatch<Term<T::Scalar>>,
    ) -> String {
        filter::range_match(field, range)
    }

    pub fn date_range_match<T: FieldType>(
        &self,
        field: Field<I, T>,
        range: RangeMatch<DateTerm<T::Scalar>>,
    ) -> String {
        filter::date_range_match(field, range)
    }

    // ========== Query Compilation ==========

    pub fn build_standard_query(&self, query: &StandardQuery<I, D>) -> SolrStandardQuery {
        query::build_standard_query(query)
    }

    pub fn build_edismax_query(&self, query: &EdismaxQuery<I, D>) -> SolrEdismaxQuery {
        query::build_edismax_query(query)
    }

    pub fn build_solr_group_query(&self, query: &GroupQuery<I, D>) -> SolrGroupQuery {
        query::build_solr_group_query(query)
    }

    pub fn build_solr_group_facet_query(
        &self,
        query: &GroupFacetQuery<I, D>,
    ) -> Result<SolrGroupFacetQuery> {
        query::build_solr_group_facet_query(query)
    }

    // ========== Read ==========

    /// Run a standard or edismax query against `/select`
    pub async fn select<P: NativeParams>(&self, params: &P) -> Result<Response<D>>
    where
        D: DeserializeOwned,
    {
        self.select_with(params, &RequestOptions::default()).await
    }

    pub async fn select_with<P: NativeParams>(
        &self,
        params: &P,
        options: &RequestOptions,
    ) -> Result<Response<D>>
    where
        D: DeserializeOwned,
    {
        self.read(params.to_params()?, options).await
    }

    pub async fn group_query(&self, params: &SolrGroupQuery) -> Result<GroupResponse<D>>
    where
        D: DeserializeOwned,
    {
        self.group_query_with(params, &RequestOptions::default()).await
    }

    pub async fn group_query_with(
        &self,
        params: &SolrGroupQuery,
        options: &RequestOptions,
    ) -> Result<GroupResponse<D>>
    where
        D: DeserializeOwned,
    {
        self.read(params.to_params()?, options).await
    }

    pub async fn group_facet_query(
        &self,
        params: &SolrGroupFacetQuery,
    ) -> Result<FacetGroupResponse<D>>
    where
        D: DeserializeOwned,
    {
        self.group_facet_query_with(params, &RequestOptions::default())
            .await
    }

    pub async fn group_facet_query_with(
        &self,
        params: &SolrGroupFacetQuery,
        options: &RequestOptions,
    ) -> Result<FacetGroupResponse<D>>
    where
        D: DeserializeOwned,
    {
        self.read(params.to_params()?, options).await
    }

    async fn read<T: DeserializeOwned>(&self, params: Params, options: &RequestOptions) -> Result<T> {
        let config = RequestConfig::get(self.endpoint("select"))
            .params(params)
            .with_options(options);
        self.transport.request(config).await
    }

    // ========== Write ==========

    /// Add or replace documents, committing immediately
    pub async fn update(&self, docs: &[UpdateRequest<I>]) -> Result<()>
    where
        I: Serialize,
    {
        self.update_with(docs, &RequestOptions::default()).await
    }

    pub async fn update_with(&self, docs: &[UpdateRequest<I>], options: &RequestOptions) -> Result<()>
    where
        I: Serialize,
    {
        tracing::debug!(collection = %self.collection, docs = docs.len(), "Updating documents");
        self.write(serde_json::to_string(docs)?, options).await
    }

    /// Delete by query or by exact field value, committing immediately
    pub async fn remove(&self, query: &RemoveQuery) -> Result<()> {
        self.remove_with(query, &RequestOptions::default()).await
    }

    pub async fn remove_with(&self, query: &RemoveQuery, options: &RequestOptions) -> Result<()> {
        tracing::debug!(collection = %self.collection, "Removing documents");
        self.write(serde_json::to_string(query)?, options).await
    }

    async fn write(&self, body: String, options: &RequestOptions) -> Result<()> {
        let config = RequestConfig::post_json(self.endpoint("update"), body)
            .params(vec![("commit".to_string(), "true".to_string())])
            .with_options(options);
        let ack: UpdateResponse = self.transport.request(config).await?;
        tracing::debug!(qtime = ack.response_header.qtime, "Committed");
        Ok(())
    }
}

impl<I, D> fmt::Debug for SolrClient<I, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolrClient")
            .field("collection", &self.collection)
            .field("base_url", &self.base_url)
            .finish()
    }
}
