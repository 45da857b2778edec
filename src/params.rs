use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::{Result, SolrError};

/// Flat query-string parameters, in the order they are sent
pub type Params = Vec<(String, String)>;

/// A native Solr parameter set that can be sent as a query string
pub trait NativeParams: Serialize {
    fn to_params(&self) -> Result<Params> {
        to_params(self)
    }
}

/// Flatten a serializable parameter struct into query-string pairs.
///
/// Absent (`null`) values are omitted and arrays become repeated keys, which
/// is how Solr reads multi-valued parameters such as `fq` and `group.field`.
pub fn to_params<T: Serialize + ?Sized>(value: &T) -> Result<Params> {
    let map = match serde_json::to_value(value)? {
        Value::Object(map) => map,
        other => {
            return Err(SolrError::InvalidParams {
                key: String::new(),
                reason: format!("expected an object of parameters, got {}", other),
            })
        }
    };

    let mut params = Params::new();
    for (key, value) in map {
        push_value(&mut params, &key, value, true)?;
    }
    Ok(params)
}

fn push_value(params: &mut Params, key: &str, value: Value, allow_array: bool) -> Result<()> {
    match value {
        Value::Null => {}
        Value::Bool(flag) => params.push((key.to_string(), flag.to_string())),
        Value::Number(number) => params.push((key.to_string(), number_text(&number))),
        Value::String(text) => params.push((key.to_string(), text)),
        Value::Array(items) if allow_array => {
            for item in items {
                push_value(params, key, item, false)?;
            }
        }
        Value::Array(_) | Value::Object(_) => {
            return Err(SolrError::InvalidParams {
                key: key.to_string(),
                reason: "nested structures must be JSON-encoded into a string".to_string(),
            })
        }
    }
    Ok(())
}

// Whole floats render without a fractional part, e.g. `5` not `5.0`
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", value as i64)
        }
        _ => number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        q: String,
        fq: Vec<String>,
        rows: Option<u64>,
        d: Option<f64>,
        group: bool,
        #[serde(rename = "group.limit")]
        group_limit: Option<i64>,
    }

    #[test]
    fn test_flatten_repeats_arrays_and_drops_absent() {
        let sample = Sample {
            q: "*:*".to_string(),
            fq: vec!["a:1".to_string(), "b:2".to_string()],
            rows: None,
            d: Some(5.0),
            group: false,
            group_limit: Some(0),
        };

        let params = to_params(&sample).unwrap();
        let pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("d", "5"),
                ("fq", "a:1"),
                ("fq", "b:2"),
                ("group", "false"),
                ("group.limit", "0"),
                ("q", "*:*"),
            ]
        );
    }

    #[test]
    fn test_nested_object_is_rejected() {
        let value = serde_json::json!({ "json.facet": { "x": 1 } });
        let err = to_params(&value).unwrap_err();
        assert!(matches!(err, SolrError::InvalidParams { ref key, .. } if key == "json.facet"));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(to_params(&vec![1, 2]).is_err());
    }
}
