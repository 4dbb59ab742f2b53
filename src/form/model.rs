use chrono::NaiveDate;
use gpui::SharedString;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::value::{FieldValue, FormValues};

/// A struct whose fields map one-to-one onto form fields.
///
/// Usually derived with `#[derive(FormModel)]`; a field can be stored under a
/// different name with `#[form(rename = "...")]`.
pub trait FormModel: Sized {
    fn field_names() -> &'static [&'static str];

    fn to_values(&self) -> FormValues;

    /// Returns `None` when a field is missing or holds a value of the wrong
    /// shape.
    fn from_values(values: &FormValues) -> Option<Self>;
}

pub trait IntoFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

pub trait FromFieldValue: Sized {
    fn from_field_value(value: Option<&FieldValue>) -> Option<Self>;
}

impl IntoFieldValue for SharedString {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl FromFieldValue for SharedString {
    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        match value? {
            FieldValue::Text(text) => Some(text.clone()),
            _ => None,
        }
    }
}

impl IntoFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone().into())
    }
}

impl FromFieldValue for String {
    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        value?.as_text().map(str::to_string)
    }
}

impl IntoFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

impl FromFieldValue for bool {
    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        value?.as_bool()
    }
}

impl IntoFieldValue for Decimal {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Number(*self)
    }
}

impl FromFieldValue for Decimal {
    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        match value? {
            FieldValue::Number(number) => Some(*number),
            FieldValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

macro_rules! impl_integer_field_value {
    ($($ty:ty => $to:ident),* $(,)?) => {
        $(
            impl IntoFieldValue for $ty {
                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Number(Decimal::from(*self))
                }
            }

            impl FromFieldValue for $ty {
                fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
                    let number = Decimal::from_field_value(value)?;
                    if !number.fract().is_zero() {
                        return None;
                    }
                    number.$to()
                }
            }
        )*
    };
}

impl_integer_field_value!(i32 => to_i32, i64 => to_i64, u32 => to_u32, u64 => to_u64);

impl IntoFieldValue for NaiveDate {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Date(*self)
    }
}

impl FromFieldValue for NaiveDate {
    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        match value? {
            FieldValue::Date(date) => Some(*date),
            FieldValue::Text(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d").ok(),
            _ => None,
        }
    }
}

impl IntoFieldValue for Vec<SharedString> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::List(self.clone())
    }
}

impl FromFieldValue for Vec<SharedString> {
    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        value?.as_list().map(<[SharedString]>::to_vec)
    }
}

impl IntoFieldValue for Vec<String> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::List(self.iter().cloned().map(SharedString::from).collect())
    }
}

impl FromFieldValue for Vec<String> {
    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        let items = value?.as_list()?;
        Some(items.iter().map(|item| item.to_string()).collect())
    }
}

impl<T> IntoFieldValue for Option<T>
where
    T: IntoFieldValue,
{
    fn to_field_value(&self) -> FieldValue {
        self.as_ref()
            .map_or(FieldValue::Null, IntoFieldValue::to_field_value)
    }
}

impl<T> FromFieldValue for Option<T>
where
    T: FromFieldValue,
{
    fn from_field_value(value: Option<&FieldValue>) -> Option<Self> {
        match value {
            None | Some(FieldValue::Null) => Some(None),
            Some(value) => T::from_field_value(Some(value)).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_accept_absent_and_null() {
        assert_eq!(Option::<String>::from_field_value(None), Some(None));
        assert_eq!(
            Option::<String>::from_field_value(Some(&FieldValue::Null)),
            Some(None)
        );
        assert_eq!(Option::<bool>::from_field_value(Some(&"x".into())), None);
        assert_eq!(String::from_field_value(None), None);
    }

    #[test]
    fn integers_reject_fractions() {
        assert_eq!(i64::from_field_value(Some(&42.into())), Some(42));
        assert_eq!(
            i64::from_field_value(Some(&Decimal::new(15, 1).into())),
            None
        );
        assert_eq!(u32::from_field_value(Some(&(-1).into())), None);
        assert_eq!(i32::from_field_value(Some(&" 7 ".into())), Some(7));
    }

    #[test]
    fn dates_read_iso_text() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date");
        assert_eq!(
            NaiveDate::from_field_value(Some(&"2024-02-29".into())),
            Some(date)
        );
        assert_eq!(NaiveDate::from_field_value(Some(&date.into())), Some(date));
        assert_eq!(NaiveDate::from_field_value(Some(&"2023-02-29".into())), None);
    }
}
