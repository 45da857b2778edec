use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::schema::{Field, FieldType};

/// One entry of an `/update` JSON array
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UpdateRequest<I> {
    /// A bare document
    Doc(I),
    /// `{"add": {"doc": ..., "boost": ...}}`
    Add { add: AddCommand<I> },
}

#[derive(Debug, Clone, Serialize)]
pub struct AddCommand<I> {
    pub doc: I,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
}

impl<I> UpdateRequest<I> {
    pub fn boosted(doc: I, boost: f64) -> Self {
        UpdateRequest::Add {
            add: AddCommand {
                doc,
                boost: Some(boost),
            },
        }
    }
}

impl<I> From<I> for UpdateRequest<I> {
    fn from(doc: I) -> Self {
        UpdateRequest::Doc(doc)
    }
}

/// A document field that may carry an index-time boost.
///
/// Serializes as `{"boost": .., "value": ..}` when boosted and as the bare
/// value otherwise. Solr returns stored fields bare, so deserializing always
/// yields an unboosted value. Index-time field boosts are only honoured by
/// Solr releases before 7.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBoost<T> {
    pub value: T,
    pub boost: Option<f64>,
}

impl<T> FieldBoost<T> {
    pub fn boosted(value: T, boost: f64) -> Self {
        Self {
            value,
            boost: Some(boost),
        }
    }
}

impl<T> From<T> for FieldBoost<T> {
    fn from(value: T) -> Self {
        Self { value, boost: None }
    }
}

impl<T: FieldType> FieldType for FieldBoost<T> {
    type Scalar = T::Scalar;
}

impl<T: Serialize> Serialize for FieldBoost<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.boost {
            Some(boost) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("boost", &boost)?;
                map.serialize_entry("value", &self.value)?;
                map.end()
            }
            None => self.value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldBoost<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::from)
    }
}

/// Body of a delete sent to `/update`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveQuery {
    pub delete: DeleteTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeleteTarget {
    /// `{"query": "<filter query>"}`
    Query { query: String },
    /// Exact field/value match, usually `{"id": "..."}`
    Fields(Map<String, Value>),
}

impl RemoveQuery {
    /// Delete everything matching a filter query
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            delete: DeleteTarget::Query {
                query: query.into(),
            },
        }
    }

    /// Delete documents whose `field` equals `value`
    pub fn by_field<S, T>(field: Field<S, T>, value: T::Scalar) -> Result<Self>
    where
        T: FieldType,
        T::Scalar: Serialize,
    {
        let mut fields = Map::new();
        fields.insert(field.name().to_string(), serde_json::to_value(value)?);
        Ok(Self {
            delete: DeleteTarget::Fields(fields),
        })
    }
}
