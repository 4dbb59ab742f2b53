use std::sync::LazyLock;

use futures::FutureExt;
use gpui::SharedString;
use regex::Regex;

use super::rule::{CustomValidator, FormRule, RuleType, ValidatorOutcome};
use super::value::{FieldValue, FormValues, is_empty_value};
use crate::i18n::I18nManager;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Evaluates `rules` in order against `value` and returns the message of the
/// first failing rule. Default messages come from the process locale.
pub async fn evaluate(
    value: Option<&FieldValue>,
    rules: &[FormRule],
    values: &FormValues,
) -> Option<SharedString> {
    evaluate_with(value, rules, values, &I18nManager::new()).await
}

/// Same as [`evaluate`] with default messages resolved through `i18n`.
pub async fn evaluate_with(
    value: Option<&FieldValue>,
    rules: &[FormRule],
    values: &FormValues,
    i18n: &I18nManager,
) -> Option<SharedString> {
    for (index, rule) in rules.iter().enumerate() {
        if let Some(message) = check_rule(value, rule, values, i18n).await {
            tracing::trace!(rule = index, %message, "rule failed");
            return Some(message);
        }
    }
    None
}

/// Resolves an evaluation without an executor. Returns `None` when a custom
/// validator did not complete immediately.
pub fn evaluate_now(
    value: Option<&FieldValue>,
    rules: &[FormRule],
    values: &FormValues,
    i18n: &I18nManager,
) -> Option<Option<SharedString>> {
    evaluate_with(value, rules, values, i18n).now_or_never()
}

async fn check_rule(
    value: Option<&FieldValue>,
    rule: &FormRule,
    values: &FormValues,
    i18n: &I18nManager,
) -> Option<SharedString> {
    let fail = |key: &str, params: &[(&str, &str)]| -> SharedString {
        rule.message
            .clone()
            .unwrap_or_else(|| i18n.t_with(key, params))
    };

    if is_empty_value(value) {
        return rule.required.then(|| fail("form.required", &[]));
    }
    let Some(value) = value else {
        return None;
    };

    if let Some(kind) = rule.kind {
        if let Some(key) = check_type(value, kind) {
            return Some(fail(key, &[]));
        }
    }

    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(&value.to_text()) {
            return Some(fail("form.pattern", &[]));
        }
    }

    if let Some(min) = rule.min {
        if value.magnitude().is_some_and(|magnitude| magnitude < min) {
            let bound = min.normalize().to_string();
            return Some(fail("form.min", &[("min", &bound)]));
        }
    }

    if let Some(max) = rule.max {
        if value.magnitude().is_some_and(|magnitude| magnitude > max) {
            let bound = max.normalize().to_string();
            return Some(fail("form.max", &[("max", &bound)]));
        }
    }

    let outcome = match &rule.validator {
        None => ValidatorOutcome::Pass,
        Some(CustomValidator::Sync(validator)) => validator(Some(value), values),
        Some(CustomValidator::Async(validator)) => {
            validator(Some(value.clone()), values.clone()).await
        }
    };
    match outcome {
        ValidatorOutcome::Pass => None,
        ValidatorOutcome::Message(message) if !message.is_empty() => Some(message),
        ValidatorOutcome::Message(_) | ValidatorOutcome::Fail => Some(fail("form.validator", &[])),
    }
}

/// Returns the catalog key of the failure, if any.
fn check_type(value: &FieldValue, kind: RuleType) -> Option<&'static str> {
    let valid = match kind {
        RuleType::String => matches!(value, FieldValue::Text(_)),
        RuleType::Number => is_numeric(value),
        RuleType::Email => EMAIL_PATTERN.is_match(&value.to_text()),
        RuleType::Url => url::Url::parse(&value.to_text()).is_ok(),
    };
    if valid {
        return None;
    }
    Some(match kind {
        RuleType::String => "form.string",
        RuleType::Number => "form.number",
        RuleType::Email => "form.email",
        RuleType::Url => "form.url",
    })
}

fn is_numeric(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null | FieldValue::Number(_) | FieldValue::Bool(_) | FieldValue::Date(_) => {
            true
        }
        FieldValue::Text(text) => is_numeric_text(text),
        FieldValue::List(_) => false,
    }
}

/// Numeric text: blank, an optionally signed decimal or exponent literal,
/// `Infinity`, or an unsigned `0x`/`0o`/`0b` integer literal.
fn is_numeric_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }
    if let Some((radix, digits)) = radix_literal(trimmed) {
        return !digits.is_empty() && digits.chars().all(|digit| digit.is_digit(radix));
    }

    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return true;
    }
    let leads_with_digit = unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.');
    let decimal_chars = unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    leads_with_digit && decimal_chars && unsigned.parse::<f64>().is_ok()
}

fn radix_literal(text: &str) -> Option<(u32, &str)> {
    let prefix = text.get(..2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, &text[2..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use rust_decimal::Decimal;

    fn en() -> I18nManager {
        I18nManager::with_locale("en")
    }

    fn check(value: Option<FieldValue>, rules: &[FormRule]) -> Option<SharedString> {
        block_on(evaluate_with(value.as_ref(), rules, &FormValues::new(), &en()))
    }

    #[test]
    fn required_fails_only_on_empty_values() {
        let rules = [FormRule::required()];
        assert!(check(None, &rules).is_some());
        assert!(check(Some(FieldValue::Null), &rules).is_some());
        assert!(check(Some("".into()), &rules).is_some());
        assert_eq!(check(Some(" ".into()), &rules), None);
        assert_eq!(check(Some(false.into()), &rules), None);
        assert_eq!(check(Some(0.into()), &rules), None);
        assert_eq!(check(Some(FieldValue::List(Vec::new())), &rules), None);
    }

    #[test]
    fn first_failing_rule_wins() {
        let rules = [
            FormRule::new().min(3).message("too short"),
            FormRule::of_type(RuleType::Email).message("not an email"),
        ];
        assert_eq!(check(Some("ab".into()), &rules), Some("too short".into()));
        assert_eq!(
            check(Some("abcdef".into()), &rules),
            Some("not an email".into())
        );
        assert_eq!(check(Some("a@b.co".into()), &rules), None);
    }

    #[test]
    fn optional_empty_values_skip_remaining_checks() {
        let rules = [FormRule::of_type(RuleType::Email)
            .min(5)
            .pattern(Regex::new("^x").expect("regex"))
            .validator(|_, _| false)];
        assert_eq!(check(None, &rules), None);
        assert_eq!(check(Some("".into()), &rules), None);
    }

    #[test]
    fn min_and_max_compare_length_for_text_and_value_for_numbers() {
        let rules = [FormRule::new().min(2).max(4)];
        assert_eq!(check(Some("12345".into()), &rules), Some("Maximum is 4".into()));
        assert_eq!(check(Some("1".into()), &rules), Some("Minimum is 2".into()));
        assert_eq!(check(Some("123".into()), &rules), None);
        assert_eq!(check(Some(3.into()), &rules), None);
        assert_eq!(check(Some(5.into()), &rules), Some("Maximum is 4".into()));
        assert_eq!(
            check(Some(Decimal::new(15, 1).into()), &rules),
            Some("Minimum is 2".into())
        );
    }

    #[test]
    fn text_length_counts_characters_not_bytes() {
        let rules = [FormRule::new().max(2)];
        assert_eq!(check(Some("日本".into()), &rules), None);
    }

    #[test]
    fn type_checks_use_default_messages() {
        let email = [FormRule::of_type(RuleType::Email)];
        assert_eq!(
            check(Some("user@example".into()), &email),
            Some("Please enter a valid email address".into())
        );
        assert_eq!(check(Some("user@example.com".into()), &email), None);

        let url = [FormRule::of_type(RuleType::Url)];
        assert_eq!(check(Some("https://l2ui.dev/docs".into()), &url), None);
        assert_eq!(
            check(Some("not a url".into()), &url),
            Some("Please enter a valid URL".into())
        );

        let number = [FormRule::of_type(RuleType::Number)];
        assert_eq!(check(Some(" 12.5 ".into()), &number), None);
        assert_eq!(check(Some("1e3".into()), &number), None);
        assert_eq!(
            check(Some("12px".into()), &number),
            Some("Please enter a valid number".into())
        );
        assert!(check(Some("NaN".into()), &number).is_some());
        assert!(check(Some("inf".into()), &number).is_some());
        assert!(check(Some("-0x1F".into()), &number).is_some());
        assert!(check(Some("0x".into()), &number).is_some());
        assert!(check(Some("0b102".into()), &number).is_some());
        assert!(check(Some("+-3".into()), &number).is_some());
        for text in ["0x1F", "0b101", "0O17", "-Infinity", ".5", "+3", "  "] {
            assert_eq!(check(Some(text.into()), &number), None, "{text}");
        }

        let string = [FormRule::of_type(RuleType::String)];
        assert!(check(Some(true.into()), &string).is_some());
    }

    #[test]
    fn pattern_matches_text_rendering() {
        let rules = [FormRule::new().pattern(Regex::new(r"^\d{3}$").expect("regex"))];
        assert_eq!(check(Some("123".into()), &rules), None);
        assert_eq!(check(Some(123.into()), &rules), None);
        assert_eq!(check(Some("12a".into()), &rules), Some("Invalid format".into()));
    }

    #[test]
    fn custom_validator_outcomes() {
        let pass = [FormRule::new().validator(|_, _| true)];
        assert_eq!(check(Some("x".into()), &pass), None);

        let with_message = [FormRule::new().validator(|_, _| "taken")];
        assert_eq!(check(Some("x".into()), &with_message), Some("taken".into()));

        let static_message = [FormRule::new().message("nope").validator(|_, _| false)];
        assert_eq!(check(Some("x".into()), &static_message), Some("nope".into()));

        let generic = [FormRule::new().validator(|_, _| false)];
        assert_eq!(
            check(Some("x".into()), &generic),
            Some("Validation failed".into())
        );

        let empty_message = [FormRule::new().validator(|_, _| String::new())];
        assert_eq!(
            check(Some("x".into()), &empty_message),
            Some("Validation failed".into())
        );
    }

    #[test]
    fn custom_validator_sees_all_values() {
        let rules = [FormRule::new().validator(|value, values: &FormValues| {
            value == values.get("password")
        })];
        let mut values = FormValues::new();
        values.insert("password".into(), "secret".into());

        let matching = FieldValue::from("secret");
        let mismatched = FieldValue::from("other");
        assert_eq!(
            block_on(evaluate_with(Some(&matching), &rules, &values, &en())),
            None
        );
        assert!(block_on(evaluate_with(Some(&mismatched), &rules, &values, &en())).is_some());
    }

    #[test]
    fn async_validator_is_awaited() {
        let rules = [FormRule::new().async_validator(|value, _| async move {
            if value.as_ref().and_then(FieldValue::as_text) == Some("admin") {
                ValidatorOutcome::Message("reserved".into())
            } else {
                ValidatorOutcome::Pass
            }
        })];
        assert_eq!(check(Some("admin".into()), &rules), Some("reserved".into()));
        assert_eq!(check(Some("guest".into()), &rules), None);
    }

    #[test]
    fn evaluate_now_resolves_synchronous_rules() {
        let rules = [FormRule::required()];
        assert_eq!(
            evaluate_now(None, &rules, &FormValues::new(), &en()),
            Some(Some("This field is required".into()))
        );
    }

    #[test]
    fn localized_default_messages() {
        let zh = I18nManager::with_locale("zh-CN");
        let rules = [FormRule::required()];
        assert_eq!(
            block_on(evaluate_with(None, &rules, &FormValues::new(), &zh)),
            Some("该字段为必填项".into())
        );
    }
}
