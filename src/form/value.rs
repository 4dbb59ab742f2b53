use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use gpui::SharedString;
use rust_decimal::Decimal;

pub type FormValues = BTreeMap<SharedString, FieldValue>;
pub type FormErrors = BTreeMap<SharedString, SharedString>;

/// A single value stored under a field name.
///
/// An absent field is modelled as `None` at the API surface, `Null` is an
/// explicitly cleared value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Text(SharedString),
    Number(Decimal),
    Bool(bool),
    Date(NaiveDate),
    List(Vec<SharedString>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_ref()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SharedString]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Textual rendering used by pattern and type checks.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Magnitude compared by `min`/`max`: character count for text, element
    /// count for lists, the value itself for numbers and booleans.
    pub fn magnitude(&self) -> Option<Decimal> {
        match self {
            FieldValue::Null | FieldValue::Date(_) => None,
            FieldValue::Text(text) => Some(Decimal::from(text.chars().count())),
            FieldValue::Number(number) => Some(*number),
            FieldValue::Bool(value) => Some(Decimal::from(u8::from(*value))),
            FieldValue::List(items) => Some(Decimal::from(items.len())),
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(number) => write!(f, "{}", number.normalize()),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            FieldValue::List(items) => {
                let joined = items
                    .iter()
                    .map(|item| item.as_ref())
                    .collect::<Vec<_>>()
                    .join(",");
                f.write_str(&joined)
            }
        }
    }
}

/// Absent, null and the empty string all count as "no value".
pub fn is_empty_value(value: Option<&FieldValue>) -> bool {
    match value {
        None | Some(FieldValue::Null) => true,
        Some(FieldValue::Text(text)) => text.is_empty(),
        Some(_) => false,
    }
}

impl From<SharedString> for FieldValue {
    fn from(value: SharedString) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&'static str> for FieldValue {
    fn from(value: &'static str) -> Self {
        FieldValue::Text(SharedString::new_static(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value.into())
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(Decimal::from(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(Decimal::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<Vec<SharedString>> for FieldValue {
    fn from(value: Vec<SharedString>) -> Self {
        FieldValue::List(value)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// The raw payload of an input-style change event.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeEvent {
    pub target_value: SharedString,
}

impl ChangeEvent {
    pub fn new(target_value: impl Into<SharedString>) -> Self {
        Self {
            target_value: target_value.into(),
        }
    }
}

/// What a control reports when its value changes: either a plain value or
/// an event wrapping one.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldChange {
    Value(Option<FieldValue>),
    Event(ChangeEvent),
}

impl FieldChange {
    pub fn value(value: impl Into<FieldValue>) -> Self {
        FieldChange::Value(Some(value.into()))
    }

    pub fn cleared() -> Self {
        FieldChange::Value(None)
    }

    /// Unwraps an event to the value it carries.
    pub fn into_value(self) -> Option<FieldValue> {
        match self {
            FieldChange::Value(value) => value,
            FieldChange::Event(event) => Some(FieldValue::Text(event.target_value)),
        }
    }
}

impl From<ChangeEvent> for FieldChange {
    fn from(event: ChangeEvent) -> Self {
        FieldChange::Event(event)
    }
}
