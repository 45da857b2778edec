//! Filter-query fragments in Solr's standard query syntax.
//!
//! Every function here is pure and returns a single clause such as
//! `name:"Alpha"`, `-age:10`, `genre:("Drama" "Crime")` or `age:[10 TO *}`.
//! Clauses are combined by listing them under `fq`, which Solr intersects.

use crate::schema::{Field, FieldType, Literal, Scalar};

/// The reserved "any value" / "unbounded" marker
pub const WILDCARD: &str = "*";

/// Solr's relative-time keyword for date math
pub const NOW: &str = "NOW";

/// A value or the wildcard marker
#[derive(Debug, Clone, PartialEq)]
pub enum Term<S> {
    Any,
    Value(S),
}

impl<S> From<S> for Term<S> {
    fn from(value: S) -> Self {
        Term::Value(value)
    }
}

impl From<&str> for Term<String> {
    fn from(value: &str) -> Self {
        if value == WILDCARD {
            Term::Any
        } else {
            Term::Value(value.to_string())
        }
    }
}

/// A date value, the wildcard marker, or `NOW`
#[derive(Debug, Clone, PartialEq)]
pub enum DateTerm<S> {
    Now,
    Any,
    Value(S),
}

impl<S> From<S> for DateTerm<S> {
    fn from(value: S) -> Self {
        DateTerm::Value(value)
    }
}

impl From<&str> for DateTerm<String> {
    fn from(value: &str) -> Self {
        match value {
            NOW => DateTerm::Now,
            WILDCARD => DateTerm::Any,
            _ => DateTerm::Value(value.to_string()),
        }
    }
}

/// Range bounds. A missing bound is unbounded and always renders as `*`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeMatch<T> {
    pub from_eq: bool,
    pub from: Option<T>,
    pub to_eq: bool,
    pub to: Option<T>,
}

impl<T> RangeMatch<T> {
    pub fn new(from_eq: bool, to_eq: bool) -> Self {
        Self {
            from_eq,
            from: None,
            to_eq,
            to: None,
        }
    }

    /// `[from TO to]`
    pub fn inclusive() -> Self {
        Self::new(true, true)
    }

    /// `{from TO to}`
    pub fn exclusive() -> Self {
        Self::new(false, false)
    }

    pub fn from(mut self, value: impl Into<T>) -> Self {
        self.from = Some(value.into());
        self
    }

    pub fn to(mut self, value: impl Into<T>) -> Self {
        self.to = Some(value.into());
        self
    }
}

/// Quote a string value: backslashes are removed, then quotes are escaped
pub fn escape_str(value: &str) -> String {
    let stripped: String = value.chars().filter(|c| *c != '\\').collect();
    format!("\"{}\"", stripped.replace('"', "\\\""))
}

/// Render a scalar: numbers verbatim, text via [`escape_str`]
pub fn escape_value<V: Scalar + ?Sized>(value: &V) -> String {
    match value.literal() {
        Literal::Text(text) => escape_str(&text),
        Literal::Number(number) => number,
    }
}

fn render_scalar<V: Scalar>(value: &V) -> String {
    match value.literal() {
        Literal::Text(text) if text == WILDCARD => WILDCARD.to_string(),
        Literal::Text(text) => escape_str(&text),
        Literal::Number(number) => number,
    }
}

fn render_term<V: Scalar>(term: Option<&Term<V>>) -> String {
    match term {
        None | Some(Term::Any) => WILDCARD.to_string(),
        Some(Term::Value(value)) => render_scalar(value),
    }
}

fn render_date_term<V: Scalar>(term: Option<&DateTerm<V>>) -> String {
    match term {
        None | Some(DateTerm::Any) => WILDCARD.to_string(),
        Some(DateTerm::Now) => NOW.to_string(),
        Some(DateTerm::Value(value)) => match value.literal() {
            Literal::Text(text) if text == NOW || text == WILDCARD => text.into_owned(),
            Literal::Text(text) => escape_str(&text),
            Literal::Number(number) => number,
        },
    }
}

fn range_value(from_eq: bool, from: &str, to_eq: bool, to: &str) -> String {
    format!(
        "{}{} TO {}{}",
        if from_eq { "[" } else { "{" },
        from,
        to,
        if to_eq { "]" } else { "}" }
    )
}

fn filter_query(field: &str, value: &str) -> String {
    format!("{}:{}", field, value)
}

/// `field:value`, or `field:*` for the wildcard
pub fn match_value<S, T: FieldType>(
    field: Field<S, T>,
    value: impl Into<Term<T::Scalar>>,
) -> String {
    filter_query(field.name(), &render_term(Some(&value.into())))
}

/// Negated [`match_value`]: `-field:value`
pub fn unmatch_value<S, T: FieldType>(
    field: Field<S, T>,
    value: impl Into<Term<T::Scalar>>,
) -> String {
    let negated = format!("-{}", field.name());
    filter_query(&negated, &render_term(Some(&value.into())))
}

/// `field:(v1 v2 ...)`, matching any of the values. Every element is
/// escaped, so a `"*"` element is a literal star rather than a wildcard.
pub fn multi_match<S, T, V>(field: Field<S, T>, values: impl IntoIterator<Item = V>) -> String
where
    T: FieldType,
    V: Into<T::Scalar>,
{
    let rendered: Vec<String> = values
        .into_iter()
        .map(|value| {
            let scalar: T::Scalar = value.into();
            escape_value(&scalar)
        })
        .collect();
    filter_query(field.name(), &format!("({})", rendered.join(" ")))
}

/// `field:[from TO to]` with per-side inclusivity
pub fn range_match<S, T: FieldType>(
    field: Field<S, T>,
    range: RangeMatch<Term<T::Scalar>>,
) -> String {
    let from = render_term(range.from.as_ref());
    let to = render_term(range.to.as_ref());
    filter_query(field.name(), &range_value(range.from_eq, &from, range.to_eq, &to))
}

/// Like [`range_match`], but `NOW` passes through unquoted on either side
pub fn date_range_match<S, T: FieldType>(
    field: Field<S, T>,
    range: RangeMatch<DateTerm<T::Scalar>>,
) -> String {
    let from = render_date_term(range.from.as_ref());
    let to = render_date_term(range.to.as_ref());
    filter_query(field.name(), &range_value(range.from_eq, &from, range.to_eq, &to))
}
