use std::rc::Rc;

use gpui::SharedString;

use super::control::{Controllable, is_activation_key};
use crate::contracts::FieldHandlers;
use crate::form::{FieldChange, FieldValue};
use crate::style::{ComponentState, Size};

pub struct Checkbox {
    checked: Controllable<bool>,
    label: Option<SharedString>,
    disabled: bool,
    indeterminate: bool,
    size: Size,
    error: Option<SharedString>,
    handlers: FieldHandlers,
}

impl Checkbox {
    pub fn new() -> Self {
        Self {
            checked: Controllable::new(false),
            label: None,
            disabled: false,
            indeterminate: false,
            size: Size::Medium,
            error: None,
            handlers: FieldHandlers::default(),
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked.control(checked);
        self
    }

    pub fn default_checked(mut self, checked: bool) -> Self {
        self.checked.set_default(checked);
        self
    }

    pub fn label(mut self, label: impl Into<SharedString>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Shows the mixed mark regardless of the checked state.
    pub fn indeterminate(mut self, indeterminate: bool) -> Self {
        self.indeterminate = indeterminate;
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn on_change(mut self, handler: impl Fn(FieldChange) + 'static) -> Self {
        self.handlers.on_change = Some(Rc::new(handler));
        self
    }

    pub fn on_blur(mut self, handler: impl Fn() + 'static) -> Self {
        self.handlers.on_blur = Some(Rc::new(handler));
        self
    }

    pub fn is_checked(&self) -> bool {
        *self.checked.get()
    }

    pub fn is_indeterminate(&self) -> bool {
        self.indeterminate
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn label_text(&self) -> Option<&SharedString> {
        self.label.as_ref()
    }

    pub fn error_text(&self) -> Option<&SharedString> {
        self.error.as_ref()
    }

    pub fn checkbox_size(&self) -> Size {
        self.size
    }

    pub fn state(&self) -> ComponentState {
        ComponentState::resolve(self.disabled, self.error.is_some(), false)
    }

    pub fn toggle(&mut self) {
        if self.disabled {
            return;
        }
        let next = !self.is_checked();
        self.checked.apply(next);
        self.handlers.emit_change(FieldChange::value(next));
    }

    /// Returns whether the key was handled.
    pub fn key_down(&mut self, key: &str) -> bool {
        if self.disabled || !is_activation_key(key) {
            return false;
        }
        self.toggle();
        true
    }

    pub fn blur(&mut self) {
        self.handlers.emit_blur();
    }

    fn current_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Bool(self.is_checked()))
    }

    fn set_controlled_value(&mut self, value: Option<FieldValue>) {
        let checked = value.as_ref().and_then(FieldValue::as_bool).unwrap_or(false);
        self.checked.control(checked);
    }
}

impl Default for Checkbox {
    fn default() -> Self {
        Self::new()
    }
}

crate::impl_field_control!(Checkbox);
crate::impl_disableable!(Checkbox);
