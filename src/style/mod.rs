use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
}

/// How a form arranges a field's label relative to its control.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FormLayout {
    Horizontal,
    #[default]
    Vertical,
    Inline,
}

impl FormLayout {
    /// Label widths only apply when the label sits beside the control.
    pub fn uses_label_width(self) -> bool {
        self == FormLayout::Horizontal
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelWidth {
    Px(f32),
    Percent(f32),
}

impl Display for LabelWidth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelWidth::Px(value) => write!(f, "{value}px"),
            LabelWidth::Percent(value) => write!(f, "{value}%"),
        }
    }
}

impl From<f32> for LabelWidth {
    fn from(value: f32) -> Self {
        LabelWidth::Px(value)
    }
}

impl From<u32> for LabelWidth {
    fn from(value: u32) -> Self {
        LabelWidth::Px(value as f32)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComponentState {
    Normal,
    Focused,
    Disabled,
    Invalid,
}

impl ComponentState {
    pub fn resolve(disabled: bool, invalid: bool, focused: bool) -> Self {
        if disabled {
            ComponentState::Disabled
        } else if invalid {
            ComponentState::Invalid
        } else if focused {
            ComponentState::Focused
        } else {
            ComponentState::Normal
        }
    }
}
