use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use gpui::SharedString;
use regex::Regex;
use rust_decimal::Decimal;

use super::value::{FieldValue, FormValues};
use crate::i18n::I18nManager;

/// Result of a custom validator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidatorOutcome {
    Pass,
    /// Failed; the rule's message or the generic default is reported.
    Fail,
    /// Failed with a specific message.
    Message(SharedString),
}

impl From<bool> for ValidatorOutcome {
    fn from(value: bool) -> Self {
        if value {
            ValidatorOutcome::Pass
        } else {
            ValidatorOutcome::Fail
        }
    }
}

impl From<SharedString> for ValidatorOutcome {
    fn from(value: SharedString) -> Self {
        ValidatorOutcome::Message(value)
    }
}

impl From<&'static str> for ValidatorOutcome {
    fn from(value: &'static str) -> Self {
        ValidatorOutcome::Message(SharedString::new_static(value))
    }
}

impl From<String> for ValidatorOutcome {
    fn from(value: String) -> Self {
        ValidatorOutcome::Message(value.into())
    }
}

impl<E> From<Result<(), E>> for ValidatorOutcome
where
    E: Into<SharedString>,
{
    fn from(value: Result<(), E>) -> Self {
        match value {
            Ok(()) => ValidatorOutcome::Pass,
            Err(message) => ValidatorOutcome::Message(message.into()),
        }
    }
}

pub type BoxedValidationFuture = Pin<Box<dyn Future<Output = ValidatorOutcome> + Send + 'static>>;

pub(super) type SyncValidatorFn =
    Arc<dyn Fn(Option<&FieldValue>, &FormValues) -> ValidatorOutcome + Send + Sync>;
pub(super) type AsyncValidatorFn =
    Arc<dyn Fn(Option<FieldValue>, FormValues) -> BoxedValidationFuture + Send + Sync>;

#[derive(Clone)]
pub(super) enum CustomValidator {
    Sync(SyncValidatorFn),
    Async(AsyncValidatorFn),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RuleType {
    String,
    Number,
    Email,
    Url,
}

/// One declarative constraint on a field.
///
/// All parts of a rule are optional; a rule with several parts checks them
/// in the order required, type, pattern, min, max, custom validator.
#[derive(Clone, Default)]
pub struct FormRule {
    pub(super) required: bool,
    pub(super) message: Option<SharedString>,
    pub(super) kind: Option<RuleType>,
    pub(super) pattern: Option<Regex>,
    pub(super) min: Option<Decimal>,
    pub(super) max: Option<Decimal>,
    pub(super) validator: Option<CustomValidator>,
    pub(super) debounce: Duration,
}

impl FormRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required() -> Self {
        Self::new().set_required(true)
    }

    pub fn of_type(kind: RuleType) -> Self {
        Self::new().kind(kind)
    }

    pub fn set_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn message(mut self, message: impl Into<SharedString>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn kind(mut self, kind: RuleType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn min(mut self, bound: impl Into<Decimal>) -> Self {
        self.min = Some(bound.into());
        self
    }

    pub fn max(mut self, bound: impl Into<Decimal>) -> Self {
        self.max = Some(bound.into());
        self
    }

    pub fn validator<F, R>(mut self, validator: F) -> Self
    where
        F: Fn(Option<&FieldValue>, &FormValues) -> R + Send + Sync + 'static,
        R: Into<ValidatorOutcome>,
    {
        let wrapped: SyncValidatorFn = Arc::new(
            move |value: Option<&FieldValue>, values: &FormValues| -> ValidatorOutcome {
                validator(value, values).into()
            },
        );
        self.validator = Some(CustomValidator::Sync(wrapped));
        self
    }

    pub fn async_validator<F, Fut>(mut self, validator: F) -> Self
    where
        F: Fn(Option<FieldValue>, FormValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ValidatorOutcome> + Send + 'static,
    {
        let wrapped: AsyncValidatorFn = Arc::new(
            move |value: Option<FieldValue>, values: FormValues| -> BoxedValidationFuture {
                Box::pin(validator(value, values))
            },
        );
        self.validator = Some(CustomValidator::Async(wrapped));
        self
    }

    /// Delay before the custom validator runs when triggered for a single
    /// field; a newer validation of the same field drops the pending one.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn custom_message(&self) -> Option<&SharedString> {
        self.message.as_ref()
    }

    pub fn rule_type(&self) -> Option<RuleType> {
        self.kind
    }

    pub fn has_async_validator(&self) -> bool {
        matches!(self.validator, Some(CustomValidator::Async(_)))
    }

    pub fn debounce_duration(&self) -> Duration {
        self.debounce
    }
}

impl Debug for FormRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRule")
            .field("required", &self.required)
            .field("message", &self.message)
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("min", &self.min)
            .field("max", &self.max)
            .field(
                "validator",
                &self.validator.as_ref().map(|validator| match validator {
                    CustomValidator::Sync(_) => "sync",
                    CustomValidator::Async(_) => "async",
                }),
            )
            .finish()
    }
}

/// Declarative configuration for one field of a form.
#[derive(Clone, Debug)]
pub struct FormField {
    pub name: SharedString,
    pub label: Option<SharedString>,
    pub rules: Vec<FormRule>,
    pub initial_value: Option<FieldValue>,
    pub required: bool,
}

impl FormField {
    pub fn new(name: impl Into<SharedString>) -> Self {
        Self {
            name: name.into(),
            label: None,
            rules: Vec::new(),
            initial_value: None,
            required: false,
        }
    }

    pub fn label(mut self, label: impl Into<SharedString>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn rule(mut self, rule: FormRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = FormRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn initial_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Appends the rule implied by a `required` shortcut, labelled with the
/// field's label or, without one, its name.
pub(crate) fn with_required_shortcut(
    mut rules: Vec<FormRule>,
    required: bool,
    label: Option<&SharedString>,
    name: &SharedString,
    i18n: &I18nManager,
) -> Vec<FormRule> {
    if required {
        let label = label.unwrap_or(name);
        let message = i18n.t_with("form.required_field", &[("label", label.as_ref())]);
        rules.push(FormRule::required().message(message));
    }
    rules
}
