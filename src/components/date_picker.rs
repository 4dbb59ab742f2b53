use std::rc::Rc;

use chrono::NaiveDate;
use gpui::SharedString;

use super::calendar::{
    CalendarAnchor, CalendarCell, DateFormat, calendar_cells, format_date, month_label,
    parse_date, weekday_labels,
};
use super::control::{Controllable, is_dismiss_key};
use super::popup::{PopupLayout, Rect, popup_placement};
use crate::contracts::FieldHandlers;
use crate::form::{FieldChange, FieldValue};
use crate::i18n::I18nManager;
use crate::style::{ComponentState, Size};

const CALENDAR_HEIGHT_PX: f32 = 320.0;

/// A date given either as a date or as text in the picker's format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DateInput {
    Date(NaiveDate),
    Text(SharedString),
}

impl DateInput {
    fn resolve(&self, format: DateFormat) -> Option<NaiveDate> {
        match self {
            DateInput::Date(date) => Some(*date),
            DateInput::Text(text) => parse_date(text, format),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        DateInput::Date(value)
    }
}

impl From<&'static str> for DateInput {
    fn from(value: &'static str) -> Self {
        DateInput::Text(value.into())
    }
}

impl From<SharedString> for DateInput {
    fn from(value: SharedString) -> Self {
        DateInput::Text(value)
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value.into())
    }
}

/// Text input with a month calendar popup.
pub struct DatePicker {
    format: DateFormat,
    placeholder: Option<SharedString>,
    disabled: bool,
    size: Size,
    value: Controllable<Option<DateInput>>,
    anchor: CalendarAnchor,
    opened: bool,
    error: Option<SharedString>,
    handlers: FieldHandlers,
}

impl DatePicker {
    pub fn new() -> Self {
        Self {
            format: DateFormat::default(),
            placeholder: None,
            disabled: false,
            size: Size::Medium,
            value: Controllable::default(),
            anchor: CalendarAnchor::from_date(today()),
            opened: false,
            error: None,
            handlers: FieldHandlers::default(),
        }
    }

    pub fn format(mut self, format: DateFormat) -> Self {
        self.format = format;
        self.sync_anchor();
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

    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn value(mut self, value: impl Into<DateInput>) -> Self {
        self.value.control(Some(value.into()));
        self.sync_anchor();
        self
    }

    /// Controls the picker with no date selected.
    pub fn empty_value(mut self) -> Self {
        self.value.control(None);
        self
    }

    pub fn default_value(mut self, value: impl Into<DateInput>) -> Self {
        self.value.set_default(Some(value.into()));
        self.sync_anchor();
        self
    }

    /// Shows a month other than the one of the current value.
    pub fn anchor(mut self, anchor: CalendarAnchor) -> Self {
        self.anchor = anchor;
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

    pub fn selected(&self) -> Option<NaiveDate> {
        self.value
            .get()
            .as_ref()
            .and_then(|value| value.resolve(self.format))
    }

    pub fn display_text(&self) -> SharedString {
        self.selected()
            .map(|date| format_date(date, self.format).into())
            .unwrap_or_default()
    }

    pub fn placeholder_text(&self, i18n: &I18nManager) -> SharedString {
        self.placeholder
            .clone()
            .unwrap_or_else(|| i18n.t("date.placeholder"))
    }

    pub fn calendar_anchor(&self) -> CalendarAnchor {
        self.anchor
    }

    pub fn date_format(&self) -> DateFormat {
        self.format
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

    pub fn picker_size(&self) -> Size {
        self.size
    }

    pub fn state(&self) -> ComponentState {
        ComponentState::resolve(self.disabled, self.error.is_some(), self.opened)
    }

    /// Handles typed text: a valid date is taken and re-anchors the
    /// calendar, empty text clears the value, anything else is ignored.
    /// Returns whether a change was reported.
    pub fn input(&mut self, text: &str) -> bool {
        if self.disabled {
            return false;
        }
        if text.is_empty() {
            self.value.apply(None);
            self.handlers.emit_change(FieldChange::cleared());
            return true;
        }
        let Some(date) = parse_date(text, self.format) else {
            return false;
        };
        self.value.apply(Some(DateInput::Date(date)));
        self.anchor = CalendarAnchor::from_date(date);
        self.handlers.emit_change(FieldChange::value(date));
        true
    }

    pub fn focus(&mut self) {
        self.open();
    }

    pub fn click(&mut self) {
        self.open();
    }

    pub fn close(&mut self) {
        self.opened = false;
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        if self.opened && is_dismiss_key(key) {
            self.close();
            return true;
        }
        false
    }

    pub fn select_day(&mut self, date: NaiveDate) {
        if self.disabled {
            return;
        }
        self.value.apply(Some(DateInput::Date(date)));
        self.anchor = CalendarAnchor::from_date(date);
        self.opened = false;
        self.handlers.emit_change(FieldChange::value(date));
    }

    pub fn prev_month(&mut self) {
        self.anchor = self.anchor.prev_month();
    }

    pub fn next_month(&mut self) {
        self.anchor = self.anchor.next_month();
    }

    pub fn prev_year(&mut self) {
        self.anchor = self.anchor.prev_year();
    }

    pub fn next_year(&mut self) {
        self.anchor = self.anchor.next_year();
    }

    pub fn cells(&self, today: NaiveDate) -> Vec<CalendarCell> {
        calendar_cells(self.anchor, self.selected(), today)
    }

    pub fn title(&self, i18n: &I18nManager) -> SharedString {
        month_label(self.anchor, i18n)
    }

    pub fn weekdays(&self, i18n: &I18nManager) -> [SharedString; 7] {
        weekday_labels(i18n)
    }

    pub fn calendar_layout(&self, trigger: Rect, viewport: Rect) -> PopupLayout {
        popup_placement(trigger, viewport, CALENDAR_HEIGHT_PX)
    }

    pub fn blur(&mut self) {
        self.handlers.emit_blur();
    }

    fn open(&mut self) {
        if !self.disabled {
            self.opened = true;
        }
    }

    fn sync_anchor(&mut self) {
        if let Some(date) = self.selected() {
            self.anchor = CalendarAnchor::from_date(date);
        }
    }

    fn current_value(&self) -> Option<FieldValue> {
        self.selected().map(FieldValue::Date)
    }

    fn set_controlled_value(&mut self, value: Option<FieldValue>) {
        let value = match value {
            Some(FieldValue::Date(date)) => Some(DateInput::Date(date)),
            Some(FieldValue::Text(text)) if !text.is_empty() => Some(DateInput::Text(text)),
            _ => None,
        };
        self.value.control(value);
        self.sync_anchor();
    }
}

impl Default for DatePicker {
    fn default() -> Self {
        Self::new()
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

crate::impl_field_control!(DatePicker);
crate::impl_disableable!(DatePicker);
