use std::rc::Rc;

use gpui::SharedString;

use super::context::FormContext;
use super::controller::{FormResult, ValidationTrigger};
use super::rule::{FormRule, with_required_shortcut};
use super::value::FieldChange;
use crate::contracts::FieldControl;
use crate::i18n::I18nManager;
use crate::style::{ComponentState, FormLayout, LabelWidth};

/// Wraps one control and connects it to a named field of a form.
#[derive(Clone, Debug)]
pub struct FormItem {
    name: SharedString,
    label: Option<SharedString>,
    rules: Vec<FormRule>,
    required: bool,
    label_width: Option<LabelWidth>,
}

impl FormItem {
    pub fn new(name: impl Into<SharedString>) -> Self {
        Self {
            name: name.into(),
            label: None,
            rules: Vec::new(),
            required: false,
            label_width: None,
        }
    }

    pub fn label(mut self, label: impl Into<SharedString>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = FormRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn rule(mut self, rule: FormRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn label_width(mut self, width: impl Into<LabelWidth>) -> Self {
        self.label_width = Some(width.into());
        self
    }

    pub fn name(&self) -> &SharedString {
        &self.name
    }

    /// The item's rules plus the rule implied by `required(true)`.
    pub fn merged_rules(&self, i18n: &I18nManager) -> Vec<FormRule> {
        with_required_shortcut(
            self.rules.clone(),
            self.required,
            self.label.as_ref(),
            &self.name,
            i18n,
        )
    }

    /// Registers the field and hooks `control` up to the form.
    ///
    /// The control receives the stored value (when the form has one) and
    /// the current error. Its change handler writes through the form before
    /// forwarding to the handler it had; its blur handler validates the
    /// field first unless the form validates on submit only.
    pub fn bind<C>(&self, cx: &FormContext, mut control: C) -> FormResult<BoundField<C>>
    where
        C: FieldControl,
    {
        let rules = self.merged_rules(cx.i18n());
        let has_rules = !rules.is_empty();
        let required = rules.iter().any(FormRule::is_required);
        cx.register_field(self.name.clone(), rules)?;

        let controller = cx.controller();
        if let Some(value) = controller.value(&self.name)? {
            control.set_field_value(Some(value));
        }
        let error = controller.error(&self.name)?;
        control.set_field_error(error.clone());

        let trigger = cx.validation_trigger();
        let handlers = control.handlers_mut();

        let previous_change = handlers.on_change.take();
        let change_cx = cx.clone();
        let change_name = self.name.clone();
        handlers.on_change = Some(Rc::new(move |change: FieldChange| {
            let value = change.clone().into_value();
            match change_cx
                .controller()
                .set_value(change_name.clone(), value)
            {
                Ok(()) if has_rules && trigger == ValidationTrigger::OnChange => {
                    change_cx.spawn_validation(change_name.clone());
                }
                Ok(()) => {}
                Err(error) => {
                    tracing::debug!(field = %change_name, %error, "dropping field change");
                }
            }
            if let Some(previous) = previous_change.as_ref() {
                previous(change);
            }
        }));

        let previous_blur = handlers.on_blur.take();
        let blur_cx = cx.clone();
        let blur_name = self.name.clone();
        handlers.on_blur = Some(Rc::new(move || {
            if has_rules && trigger != ValidationTrigger::OnSubmit {
                blur_cx.spawn_validation(blur_name.clone());
            }
            if let Some(previous) = previous_blur.as_ref() {
                previous();
            }
        }));

        let layout = cx.form_layout();
        let label_width = self
            .label_width
            .or(cx.form_label_width())
            .filter(|_| layout.uses_label_width());

        Ok(BoundField {
            control,
            presentation: FieldPresentation {
                name: self.name.clone(),
                label: self.label.clone(),
                label_width,
                layout,
                required,
                invalid: error.is_some(),
                error,
            },
        })
    }
}

/// What the render layer needs to draw a field around its control.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldPresentation {
    pub name: SharedString,
    pub label: Option<SharedString>,
    pub label_width: Option<LabelWidth>,
    pub layout: FormLayout,
    pub required: bool,
    pub error: Option<SharedString>,
    pub invalid: bool,
}

impl FieldPresentation {
    pub fn component_state(&self, disabled: bool, focused: bool) -> ComponentState {
        ComponentState::resolve(disabled, self.invalid, focused)
    }
}

#[derive(Debug)]
pub struct BoundField<C> {
    pub control: C,
    pub presentation: FieldPresentation,
}
