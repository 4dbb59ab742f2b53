use std::rc::Rc;

use gpui::SharedString;

use super::control::Controllable;
use crate::contracts::FieldHandlers;
use crate::form::{ChangeEvent, FieldChange, FieldValue};
use crate::i18n::I18nManager;
use crate::style::{ComponentState, Size};

/// Single-line text input.
pub struct TextInput {
    value: Controllable<SharedString>,
    placeholder: Option<SharedString>,
    disabled: bool,
    max_length: Option<usize>,
    size: Size,
    focused: bool,
    error: Option<SharedString>,
    handlers: FieldHandlers,
}

impl TextInput {
    pub fn new() -> Self {
        Self {
            value: Controllable::default(),
            placeholder: None,
            disabled: false,
            max_length: None,
            size: Size::Medium,
            focused: false,
            error: None,
            handlers: FieldHandlers::default(),
        }
    }

    pub fn value(mut self, value: impl Into<SharedString>) -> Self {
        self.value.control(value.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<SharedString>) -> Self {
        self.value.set_default(value.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
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

    pub fn text(&self) -> &SharedString {
        self.value.get()
    }

    pub fn placeholder_text(&self, i18n: &I18nManager) -> SharedString {
        self.placeholder
            .clone()
            .unwrap_or_else(|| i18n.t("input.placeholder"))
    }

    pub fn error_text(&self) -> Option<&SharedString> {
        self.error.as_ref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn input_size(&self) -> Size {
        self.size
    }

    pub fn state(&self) -> ComponentState {
        ComponentState::resolve(self.disabled, self.error.is_some(), self.focused)
    }

    /// Replaces the text as typed by the user and reports a change event.
    pub fn input(&mut self, text: impl Into<SharedString>) {
        if self.disabled {
            return;
        }
        let mut text: SharedString = text.into();
        if let Some(max_length) = self.max_length
            && text.chars().count() > max_length
        {
            text = text.chars().take(max_length).collect::<String>().into();
        }
        self.value.apply(text.clone());
        self.handlers
            .emit_change(FieldChange::Event(ChangeEvent::new(text)));
    }

    pub fn focus(&mut self) {
        if !self.disabled {
            self.focused = true;
        }
    }

    pub fn blur(&mut self) {
        self.focused = false;
        self.handlers.emit_blur();
    }

    fn current_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Text(self.value.get().clone()))
    }

    fn set_controlled_value(&mut self, value: Option<FieldValue>) {
        let text = match value {
            None | Some(FieldValue::Null) => SharedString::default(),
            Some(FieldValue::Text(text)) => text,
            Some(other) => other.to_text().into(),
        };
        self.value.control(text);
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

crate::impl_field_control!(TextInput);
crate::impl_disableable!(TextInput);
