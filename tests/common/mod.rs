//! In-process stand-in for a Solr server.
//!
//! Implements just enough of `/select` and `/update` to exercise the client
//! end to end: exact-match filters, single-key sorting, paging, field lists,
//! result grouping and terms facets. Every request is recorded for
//! wire-level assertions.

#![allow(dead_code)]

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    /// Client end of the TCP connection the request arrived on
    pub remote: SocketAddr,
    pub params: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MockSolr {
    collections: HashMap<String, Vec<Value>>,
    pub requests: Vec<RecordedRequest>,
}

pub type SharedSolr = Arc<Mutex<MockSolr>>;

type HandlerResult = Result<Json<Value>, (StatusCode, String)>;

/// Start a mock Solr serving `collections`; returns its base URL
pub async fn spawn(collections: &[&str]) -> (String, SharedSolr) {
    let mut solr = MockSolr::default();
    for name in collections {
        solr.collections.insert(name.to_string(), Vec::new());
    }
    let state = Arc::new(Mutex::new(solr));

    let router = Router::new()
        .route("/solr/:collection/select", get(select))
        .route("/solr/:collection/update", post(update))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    (format!("http://{}/solr", addr), state)
}

fn not_found(collection: &str) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("Collection '{}' does not exist", collection),
    )
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn params_all<'a>(params: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

fn field_matches(doc: &Value, field: &str, expected: &str) -> bool {
    match doc.get(field) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::Array(items)) => items.iter().any(|item| match item {
            Value::String(s) => s == expected,
            other => other.to_string() == expected,
        }),
        _ => false,
    }
}

// Supports `field:"value"`, `field:value` and their negations
fn apply_filter(docs: Vec<Value>, fq: &str) -> Vec<Value> {
    let (negated, clause) = match fq.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, fq),
    };
    let Some((field, value)) = clause.split_once(':') else {
        return docs;
    };
    if value == "*" || value.starts_with('[') || value.starts_with('{') || value.starts_with('(') {
        return docs;
    }
    let value = value.trim_matches('"').replace("\\\"", "\"");
    docs.into_iter()
        .filter(|doc| field_matches(doc, field, &value) != negated)
        .collect()
}

fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    let key = |doc: &Value| match doc.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    key(a).cmp(&key(b))
}

fn apply_sort(docs: &mut [Value], sort: &str) {
    let Some((field, order)) = sort.split(',').next().and_then(|s| s.split_once(' ')) else {
        return;
    };
    docs.sort_by(|a, b| {
        let ordering = compare_field(a, b, field);
        if order == "desc" {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn project(doc: &Value, fl: Option<&str>) -> Value {
    let Some(fl) = fl else {
        return doc.clone();
    };
    let wanted: Vec<&str> = fl.split(',').collect();
    let projected: Map<String, Value> = doc
        .as_object()
        .map(|object| {
            object
                .iter()
                .filter(|(k, _)| wanted.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default();
    Value::Object(projected)
}

fn echo_params(params: &[(String, String)]) -> Value {
    let mut echoed = Map::new();
    for (key, value) in params {
        match echoed.get_mut(key) {
            Some(Value::Array(items)) => items.push(json!(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = json!([first, value]);
            }
            None => {
                echoed.insert(key.clone(), json!(value));
            }
        }
    }
    Value::Object(echoed)
}

fn grouped(docs: &[Value], params: &[(String, String)], fl: Option<&str>) -> Value {
    let limit: i64 = param(params, "group.limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(1);
    let ngroups = param(params, "group.ngroups") == Some("true");

    let mut result = Map::new();
    for field in params_all(params, "group.field") {
        let mut groups: Vec<(Value, Vec<Value>)> = Vec::new();
        for doc in docs {
            let value = doc.get(field).cloned().unwrap_or(Value::Null);
            match groups.iter_mut().find(|(v, _)| *v == value) {
                Some((_, members)) => members.push(doc.clone()),
                None => groups.push((value, vec![doc.clone()])),
            }
        }

        let group_count = groups.len();
        let groups: Vec<Value> = groups
            .into_iter()
            .map(|(value, members)| {
                let shown: Vec<Value> = members
                    .iter()
                    .take(if limit < 0 { usize::MAX } else { limit as usize })
                    .map(|doc| project(doc, fl))
                    .collect();
                json!({
                    "groupValue": value,
                    "doclist": { "numFound": members.len(), "start": 0, "docs": shown }
                })
            })
            .collect();

        let mut list = json!({ "matches": docs.len(), "groups": groups });
        if ngroups {
            list["ngroups"] = json!(group_count);
        }
        result.insert(field.to_string(), list);
    }
    Value::Object(result)
}

fn facets(docs: &[Value], json_facet: &str) -> Value {
    let request: Map<String, Value> = serde_json::from_str(json_facet).unwrap_or_default();
    let mut result = Map::new();
    result.insert("count".to_string(), json!(docs.len()));

    for (name, facet) in request {
        if facet["type"] != "terms" {
            continue;
        }
        let field = facet["field"].as_str().unwrap_or_default();
        let mut counts: Vec<(String, u64)> = Vec::new();
        for doc in docs {
            let values: Vec<String> = match doc.get(field) {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect(),
                Some(Value::String(s)) => vec![s.clone()],
                Some(other) => vec![other.to_string()],
                None => Vec::new(),
            };
            for value in values {
                match counts.iter_mut().find(|(v, _)| *v == value) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((value, 1)),
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let buckets: Vec<Value> = counts
            .into_iter()
            .map(|(val, count)| json!({ "val": val, "count": count }))
            .collect();
        result.insert(name, json!({ "buckets": buckets }));
    }
    Value::Object(result)
}

async fn select(
    State(state): State<SharedSolr>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    Path(collection): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> HandlerResult {
    let mut solr = state.lock().unwrap();
    solr.requests.push(RecordedRequest {
        path: format!("/solr/{}/select", collection),
        remote,
        params: params.clone(),
        content_type: None,
        body: None,
    });

    let mut docs = solr
        .collections
        .get(&collection)
        .cloned()
        .ok_or_else(|| not_found(&collection))?;

    for fq in params_all(&params, "fq") {
        docs = apply_filter(docs, fq);
    }
    if let Some(sort) = param(&params, "sort") {
        apply_sort(&mut docs, sort);
    }

    let fl = param(&params, "fl");
    let header = json!({ "status": 0, "QTime": 0, "params": echo_params(&params) });

    if param(&params, "group") == Some("true") {
        let mut body = json!({
            "responseHeader": header,
            "grouped": grouped(&docs, &params, fl),
        });
        if let Some(json_facet) = param(&params, "json.facet") {
            body["facets"] = facets(&docs, json_facet);
        }
        return Ok(Json(body));
    }

    let start: usize = param(&params, "start").and_then(|s| s.parse().ok()).unwrap_or(0);
    let rows: usize = param(&params, "rows").and_then(|r| r.parse().ok()).unwrap_or(10);
    let page: Vec<Value> = docs
        .iter()
        .skip(start)
        .take(rows)
        .map(|doc| project(doc, fl))
        .collect();

    Ok(Json(json!({
        "responseHeader": header,
        "response": { "numFound": docs.len(), "start": start, "numFoundExact": true, "docs": page }
    })))
}

fn upsert(docs: &mut Vec<Value>, doc: Value) {
    let id = doc.get("id").cloned();
    match docs.iter_mut().find(|existing| existing.get("id").cloned() == id) {
        Some(existing) => *existing = doc,
        None => docs.push(doc),
    }
}

fn delete(docs: &mut Vec<Value>, target: &Value) {
    match target.get("query").and_then(Value::as_str) {
        Some("*:*") => docs.clear(),
        Some(query) => {
            let kept = apply_filter(docs.clone(), &format!("-{}", query));
            *docs = kept;
        }
        None => {
            if let Some(fields) = target.as_object() {
                docs.retain(|doc| fields.iter().any(|(k, v)| doc.get(k) != Some(v)));
            }
        }
    }
}

async fn update(
    State(state): State<SharedSolr>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    Path(collection): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> HandlerResult {
    let body: Value = serde_json::from_str(&body)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e)))?;

    let mut solr = state.lock().unwrap();
    solr.requests.push(RecordedRequest {
        path: format!("/solr/{}/update", collection),
        remote,
        params: params.clone(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: Some(body.clone()),
    });

    let docs = solr
        .collections
        .get_mut(&collection)
        .ok_or_else(|| not_found(&collection))?;

    match body {
        Value::Array(items) => {
            for item in items {
                let doc = match item.get("add") {
                    Some(add) => add["doc"].clone(),
                    None => item,
                };
                upsert(docs, doc);
            }
        }
        Value::Object(ref object) if object.contains_key("delete") => {
            delete(docs, &object["delete"]);
        }
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "Unsupported update body".to_string(),
            ))
        }
    }

    Ok(Json(json!({ "responseHeader": { "status": 0, "QTime": 1 } })))
}
