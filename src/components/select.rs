use std::rc::Rc;

use gpui::SharedString;

use super::control::{Controllable, is_activation_key, is_dismiss_key};
use super::popup::{PopupLayout, Rect, popup_placement};
use crate::contracts::FieldHandlers;
use crate::form::{FieldChange, FieldValue};
use crate::i18n::I18nManager;
use crate::style::{ComponentState, Size};

const OPTION_HEIGHT_PX: f32 = 32.0;
const DROPDOWN_MAX_HEIGHT_PX: f32 = 256.0;
const DROPDOWN_PADDING_PX: f32 = 8.0;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectOption {
    pub value: SharedString,
    pub label: SharedString,
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<SharedString>, label: impl Into<SharedString>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Single-choice dropdown.
pub struct Select {
    options: Vec<SelectOption>,
    value: Controllable<Option<SharedString>>,
    opened: bool,
    placeholder: Option<SharedString>,
    disabled: bool,
    size: Size,
    error: Option<SharedString>,
    handlers: FieldHandlers,
}

impl Select {
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            value: Controllable::default(),
            opened: false,
            placeholder: None,
            disabled: false,
            size: Size::Medium,
            error: None,
            handlers: FieldHandlers::default(),
        }
    }

    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn option(mut self, option: SelectOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn value(mut self, value: impl Into<SharedString>) -> Self {
        self.value.control(Some(value.into()));
        self
    }

    pub fn default_value(mut self, value: impl Into<SharedString>) -> Self {
        self.value.set_default(Some(value.into()));
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<SharedString>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        if disabled {
            self.opened = false;
        }
        self
    }

    pub fn opened(mut self, opened: bool) -> Self {
        self.opened = opened && !self.disabled;
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

    pub fn selected_value(&self) -> Option<&SharedString> {
        self.value.get().as_ref()
    }

    pub fn selected_option(&self) -> Option<&SelectOption> {
        let value = self.selected_value()?;
        self.options.iter().find(|option| &option.value == value)
    }

    pub fn option_list(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn error_text(&self) -> Option<&SharedString> {
        self.error.as_ref()
    }

    pub fn select_size(&self) -> Size {
        self.size
    }

    pub fn state(&self) -> ComponentState {
        ComponentState::resolve(self.disabled, self.error.is_some(), self.opened)
    }

    /// The selected label, or the placeholder when nothing matches.
    pub fn display_text(&self, i18n: &I18nManager) -> SharedString {
        match self.selected_option() {
            Some(option) => option.label.clone(),
            None => self
                .placeholder
                .clone()
                .unwrap_or_else(|| i18n.t("select.placeholder")),
        }
    }

    pub fn toggle(&mut self) {
        if self.disabled {
            return;
        }
        self.opened = !self.opened;
    }

    pub fn close(&mut self) {
        self.opened = false;
    }

    /// Enter and space toggle the dropdown, escape closes it. Returns
    /// whether the key was handled.
    pub fn key_down(&mut self, key: &str) -> bool {
        if self.disabled {
            return false;
        }
        if is_activation_key(key) {
            self.toggle();
            true
        } else if is_dismiss_key(key) {
            self.close();
            true
        } else {
            false
        }
    }

    /// Picks the option with `value` and closes the dropdown. Unknown and
    /// disabled options are ignored.
    pub fn select(&mut self, value: &str) -> bool {
        if self.disabled {
            return false;
        }
        let Some(option) = self
            .options
            .iter()
            .find(|option| option.value.as_ref() == value && !option.disabled)
        else {
            return false;
        };
        let value = option.value.clone();
        self.value.apply(Some(value.clone()));
        self.opened = false;
        self.handlers.emit_change(FieldChange::value(value));
        true
    }

    pub fn blur(&mut self) {
        self.opened = false;
        self.handlers.emit_blur();
    }

    pub fn dropdown_height(&self) -> f32 {
        (self.options.len() as f32 * OPTION_HEIGHT_PX + DROPDOWN_PADDING_PX)
            .min(DROPDOWN_MAX_HEIGHT_PX)
    }

    pub fn dropdown_layout(&self, trigger: Rect, viewport: Rect) -> PopupLayout {
        popup_placement(trigger, viewport, self.dropdown_height())
    }

    fn current_value(&self) -> Option<FieldValue> {
        self.selected_value().cloned().map(FieldValue::Text)
    }

    fn set_controlled_value(&mut self, value: Option<FieldValue>) {
        let value = match value {
            None | Some(FieldValue::Null) => None,
            Some(FieldValue::Text(text)) => Some(text),
            Some(other) => Some(other.to_text().into()),
        };
        self.value.control(value);
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

crate::impl_field_control!(Select);
crate::impl_disableable!(Select);
crate::impl_openable!(Select);
