use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use crate::date_time::{format_date, format_date_time};

/// A schema whose field names are known at compile time.
///
/// Implemented by the [`schema!`](crate::schema!) macro. Nothing in the client
/// requires it; it exists so callers can validate runtime field names.
pub trait Schema {
    /// Declared field names, in declaration order
    const FIELDS: &'static [&'static str];
}

/// A single value as it appears in a filter clause
#[derive(Debug, Clone, PartialEq)]
pub enum Literal<'a> {
    /// Quoted and escaped when rendered
    Text(Cow<'a, str>),
    /// Rendered verbatim
    Number(String),
}

/// A single (non-array) value that can be rendered into a filter clause
pub trait Scalar {
    fn literal(&self) -> Literal<'_>;
}

impl Scalar for String {
    fn literal(&self) -> Literal<'_> {
        Literal::Text(Cow::Borrowed(self))
    }
}

impl Scalar for DateTime<Utc> {
    fn literal(&self) -> Literal<'_> {
        Literal::Text(Cow::Owned(format_date_time(self)))
    }
}

impl Scalar for NaiveDate {
    fn literal(&self) -> Literal<'_> {
        Literal::Text(Cow::Owned(format_date(self)))
    }
}

macro_rules! numeric_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                fn literal(&self) -> Literal<'_> {
                    Literal::Number(self.to_string())
                }
            }

            impl FieldType for $t {
                type Scalar = $t;
            }
        )*
    };
}

numeric_scalar!(i32, i64, u32, u64, f32, f64);

/// Maps a declared field type to the scalar used when filtering on it.
///
/// Optional fields filter on their inner type and multi-valued fields on their
/// element type.
pub trait FieldType {
    type Scalar: Scalar;
}

impl FieldType for String {
    type Scalar = String;
}

impl FieldType for DateTime<Utc> {
    type Scalar = DateTime<Utc>;
}

impl FieldType for NaiveDate {
    type Scalar = NaiveDate;
}

impl<T: FieldType> FieldType for Option<T> {
    type Scalar = T::Scalar;
}

impl<T: Scalar> FieldType for Vec<T> {
    type Scalar = T;
}

/// Typed handle to field `name` of schema `S`, holding values of type `T`
pub struct Field<S, T> {
    name: Cow<'static, str>,
    _marker: PhantomData<fn() -> (S, T)>,
}

impl<S, T> Field<S, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            _marker: PhantomData,
        }
    }

    /// Field handle from a runtime name, not checked against any schema
    pub fn dynamic(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drop the value type, keeping only the schema
    pub fn erase(self) -> FieldRef<S> {
        FieldRef {
            name: self.name,
            _schema: PhantomData,
        }
    }
}

impl<S, T> Clone for Field<S, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S, T> fmt::Debug for Field<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

impl<S, T> PartialEq for Field<S, T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Field of schema `S` with its value type erased.
///
/// Used wherever fields of different types are listed together: sort lists,
/// projections, weighted query fields and facets.
pub struct FieldRef<S> {
    name: Cow<'static, str>,
    _schema: PhantomData<fn() -> S>,
}

impl<S> FieldRef<S> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S: Schema> FieldRef<S> {
    /// Resolve a runtime name against the declared fields of `S`
    pub fn lookup(name: &str) -> Option<Self> {
        S::FIELDS
            .iter()
            .copied()
            .find(|declared| *declared == name)
            .map(|declared| Self {
                name: Cow::Borrowed(declared),
                _schema: PhantomData,
            })
    }
}

impl<S, T> From<Field<S, T>> for FieldRef<S> {
    fn from(field: Field<S, T>) -> Self {
        field.erase()
    }
}

impl<S> Clone for FieldRef<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _schema: PhantomData,
        }
    }
}

impl<S> fmt::Debug for FieldRef<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldRef").field(&self.name).finish()
    }
}

impl<S> fmt::Display for FieldRef<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<S> PartialEq for FieldRef<S> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<S> Serialize for FieldRef<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// Declare a document struct together with typed field handles.
///
/// Every field `foo: T` also becomes an associated const `Name::foo` of type
/// `Field<Name, T>`, so filters and queries only accept fields that exist with
/// values of the declared type.
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// solrq::schema! {
///     #[derive(Debug, Clone, Serialize, Deserialize)]
///     pub struct Film {
///         pub id: String,
///         #[serde(default)]
///         pub genre: Vec<String>,
///     }
/// }
///
/// assert_eq!(solrq::match_value(Film::id, "tt01"), r#"id:"tt01""#);
/// ```
#[macro_export]
macro_rules! schema {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Schema for $name {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];
        }

        #[allow(non_upper_case_globals, dead_code)]
        impl $name {
            $(
                pub const $field: $crate::Field<$name, $ty> = $crate::Field::new(stringify!($field));
            )*
        }
    };
}
