use std::rc::Rc;

use gpui::SharedString;

use crate::form::{FieldChange, FieldValue};

pub type ChangeHandler = Rc<dyn Fn(FieldChange)>;
pub type BlurHandler = Rc<dyn Fn()>;

/// The change and blur callbacks a control fires.
#[derive(Clone, Default)]
pub struct FieldHandlers {
    pub on_change: Option<ChangeHandler>,
    pub on_blur: Option<BlurHandler>,
}

impl FieldHandlers {
    pub fn emit_change(&self, change: FieldChange) {
        if let Some(handler) = self.on_change.as_ref() {
            handler(change);
        }
    }

    pub fn emit_blur(&self) {
        if let Some(handler) = self.on_blur.as_ref() {
            handler();
        }
    }
}

impl std::fmt::Debug for FieldHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldHandlers")
            .field("on_change", &self.on_change.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .finish()
    }
}

/// A control a form field can drive: the field injects the stored value and
/// error and wraps the control's handlers.
pub trait FieldControl {
    /// The value the control currently shows.
    fn field_value(&self) -> Option<FieldValue>;

    /// Makes the control controlled by `value`.
    fn set_field_value(&mut self, value: Option<FieldValue>);

    fn set_field_error(&mut self, error: Option<SharedString>);

    fn handlers_mut(&mut self) -> &mut FieldHandlers;
}

pub trait Disableable: Sized {
    fn disabled(self, value: bool) -> Self;
}

pub trait Openable: Sized {
    fn opened(self, value: bool) -> Self;
}

#[macro_export]
macro_rules! impl_disableable {
    ($type:ty) => {
        impl $crate::contracts::Disableable for $type {
            fn disabled(self, value: bool) -> Self {
                <$type>::disabled(self, value)
            }
        }
    };
}

#[macro_export]
macro_rules! impl_openable {
    ($type:ty) => {
        impl $crate::contracts::Openable for $type {
            fn opened(self, value: bool) -> Self {
                <$type>::opened(self, value)
            }
        }
    };
}

/// Implements `FieldControl` for a control with `handlers`, `error` fields
/// and `current_value`/`set_controlled_value` methods.
#[macro_export]
macro_rules! impl_field_control {
    ($type:ty) => {
        impl $crate::contracts::FieldControl for $type {
            fn field_value(&self) -> Option<$crate::form::FieldValue> {
                <$type>::current_value(self)
            }

            fn set_field_value(&mut self, value: Option<$crate::form::FieldValue>) {
                <$type>::set_controlled_value(self, value)
            }

            fn set_field_error(&mut self, error: Option<::gpui::SharedString>) {
                self.error = error;
            }

            fn handlers_mut(&mut self) -> &mut $crate::contracts::FieldHandlers {
                &mut self.handlers
            }
        }
    };
}
