pub mod calendar;
mod checkbox;
pub mod control;
mod date_picker;
pub mod popup;
mod select;
mod text_input;

#[cfg(test)]
mod test_state_logic;

pub use calendar::{
    CalendarAnchor, CalendarCell, DateFormat, calendar_cells, calendar_days, format_date,
    month_label, month_name, parse_date, weekday_labels,
};
pub use checkbox::Checkbox;
pub use date_picker::{DateInput, DatePicker, today};
pub use popup::{PopupLayout, PopupPlacement, Rect, popup_placement};
pub use select::{Select, SelectOption};
pub use text_input::TextInput;
