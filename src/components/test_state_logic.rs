use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, NaiveDate, Weekday};

use super::control::Controllable;
use super::{
    CalendarAnchor, Checkbox, DateFormat, DatePicker, PopupPlacement, Rect, Select, SelectOption,
    TextInput, calendar_cells, calendar_days, format_date, month_label, parse_date,
    popup_placement, weekday_labels,
};
use crate::contracts::FieldControl;
use crate::form::{FieldChange, FieldValue};
use crate::i18n::I18nManager;
use crate::style::ComponentState;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

fn recorder() -> (Rc<RefCell<Vec<FieldChange>>>, impl Fn(FieldChange) + 'static) {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    (changes, move |change| sink.borrow_mut().push(change))
}

#[test]
fn controllable_ignores_internal_updates_when_controlled() {
    let mut value = Controllable::new(1);
    assert!(value.apply(2));
    assert_eq!(*value.get(), 2);

    value.control(5);
    assert!(!value.apply(3));
    assert_eq!(*value.get(), 5);

    value.release();
    assert_eq!(*value.get(), 2);
}

#[test]
fn date_format_round_trips_across_years() {
    for format in DateFormat::ALL {
        for year in (0..=9999).step_by(7).chain([0, 9999]) {
            for (month, day) in [(1, 1), (2, 28), (6, 15), (12, 31)] {
                let original = date(year, month, day);
                let text = format_date(original, format);
                assert_eq!(
                    parse_date(&text, format),
                    Some(original),
                    "{text} in {}",
                    format.pattern()
                );
            }
        }
    }
}

#[test]
fn leap_days_round_trip() {
    let leap = date(2000, 2, 29);
    for format in DateFormat::ALL {
        assert_eq!(parse_date(&format_date(leap, format), format), Some(leap));
    }
    assert_eq!(parse_date("1900-02-29", DateFormat::YearMonthDayDash), None);
}

#[test]
fn format_date_pads_components() {
    let value = date(7, 3, 9);
    assert_eq!(format_date(value, DateFormat::YearMonthDayDash), "0007-03-09");
    assert_eq!(format_date(value, DateFormat::YearMonthDaySlash), "0007/03/09");
    assert_eq!(format_date(value, DateFormat::DayMonthYearDash), "09-03-0007");
    assert_eq!(format_date(value, DateFormat::DayMonthYearSlash), "09/03/0007");
}

#[test]
fn malformed_dates_parse_to_none() {
    let format = DateFormat::YearMonthDayDash;
    for text in [
        "",
        "2024",
        "2024-01",
        "2024-01-02-03",
        "2024-13-01",
        "2024-02-30",
        "2024-aa-01",
        "2024--01",
        " 2024-01-01",
        "+2024-01-01",
        "2024-01-01x",
        "99999999999-01-01",
        "二〇二四-01-01",
    ] {
        assert_eq!(parse_date(text, format), None, "{text:?}");
    }
}

#[test]
fn parse_date_accepts_either_separator() {
    assert_eq!(
        parse_date("2024/03/05", DateFormat::YearMonthDayDash),
        Some(date(2024, 3, 5))
    );
    assert_eq!(
        parse_date("05-03-2024", DateFormat::DayMonthYearSlash),
        Some(date(2024, 3, 5))
    );
    assert_eq!(
        DateFormat::from_pattern("DD/MM/YYYY"),
        Some(DateFormat::DayMonthYearSlash)
    );
}

#[test]
fn calendar_grid_covers_whole_weeks() {
    for year in [1999, 2000, 2023, 2024] {
        for month in 1..=12 {
            let anchor = CalendarAnchor::new(year, month);
            let days = calendar_days(anchor);
            assert_eq!(days.len() % 7, 0);
            assert_eq!(days.first().map(|day| day.weekday()), Some(Weekday::Sun));
            assert_eq!(days.last().map(|day| day.weekday()), Some(Weekday::Sat));

            let first = anchor.first_day().expect("first day");
            let last = anchor.last_day().expect("last day");
            let in_month = days.iter().filter(|day| anchor.contains(**day)).count();
            assert_eq!(in_month as i64, (last - first).num_days() + 1);
            assert!(days.windows(2).all(|pair| pair[1] == pair[0].succ_opt().expect("succ")));
        }
    }
}

#[test]
fn calendar_grid_for_known_month() {
    // September 2024 starts on a Sunday and ends on a Monday.
    let days = calendar_days(CalendarAnchor::new(2024, 9));
    assert_eq!(days.first(), Some(&date(2024, 9, 1)));
    assert_eq!(days.last(), Some(&date(2024, 10, 5)));
    assert_eq!(days.len(), 35);
}

#[test]
fn calendar_cells_mark_today_and_selection() {
    let anchor = CalendarAnchor::new(2024, 3);
    let cells = calendar_cells(anchor, Some(date(2024, 3, 15)), date(2024, 3, 1));
    let selected = cells.iter().filter(|cell| cell.is_selected).collect::<Vec<_>>();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].date, date(2024, 3, 15));
    assert!(cells.iter().any(|cell| cell.is_today && cell.date == date(2024, 3, 1)));
    assert!(!cells[0].in_month);
}

#[test]
fn anchor_navigation_carries_years() {
    let anchor = CalendarAnchor::new(2024, 12);
    assert_eq!(anchor.next_month(), CalendarAnchor::new(2025, 1));
    assert_eq!(
        CalendarAnchor::new(2024, 1).prev_month(),
        CalendarAnchor::new(2023, 12)
    );
    assert_eq!(anchor.prev_year(), CalendarAnchor::new(2023, 12));
    assert_eq!(anchor.next_year().month, 12);
    assert_eq!(CalendarAnchor::new(2024, 0).month, 1);
}

#[test]
fn anchor_stays_within_supported_years() {
    let last = CalendarAnchor::new(i32::MAX, 12);
    assert_eq!(last.year, NaiveDate::MAX.year());
    assert_eq!(last.next_month(), last);
    assert_eq!(last.next_year(), last);
    assert_eq!(last.last_day(), Some(NaiveDate::MAX));
    assert_eq!(calendar_days(last).len() % 7, 0);

    let first = CalendarAnchor::new(i32::MIN, 1);
    assert_eq!(first.year, NaiveDate::MIN.year());
    assert_eq!(first.prev_month(), first);
    assert_eq!(first.prev_year(), first);
    assert_eq!(first.first_day(), Some(NaiveDate::MIN));

    let unclamped = CalendarAnchor {
        year: i32::MAX,
        month: 12,
    };
    assert_eq!(unclamped.next_month(), last);
    assert_eq!(unclamped.next_year(), last);
}

#[test]
fn calendar_labels_come_from_catalog() {
    let en = I18nManager::with_locale("en");
    assert_eq!(weekday_labels(&en)[0], "Su");
    assert_eq!(
        month_label(CalendarAnchor::new(2024, 3), &en),
        "March 2024"
    );

    let zh = I18nManager::with_locale("zh-CN");
    assert_eq!(weekday_labels(&zh)[6], "六");
    assert_eq!(month_label(CalendarAnchor::new(2024, 3), &zh), "2024年 三月");
}

#[test]
fn popup_opens_below_unless_space_is_short() {
    let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);

    let top_trigger = Rect::new(10.0, 100.0, 200.0, 32.0);
    let below = popup_placement(top_trigger, viewport, 300.0);
    assert_eq!(below.placement, PopupPlacement::Bottom);
    assert_eq!(below.top, 132.0);
    assert_eq!(below.left, 10.0);
    assert_eq!(below.width, 200.0);

    let bottom_trigger = Rect::new(10.0, 500.0, 200.0, 32.0);
    let above = popup_placement(bottom_trigger, viewport, 300.0);
    assert_eq!(above.placement, PopupPlacement::Top);
    assert_eq!(above.top, 200.0);

    let cramped = Rect::new(0.0, 0.0, 800.0, 100.0);
    let middle = popup_placement(Rect::new(0.0, 20.0, 100.0, 20.0), cramped, 300.0);
    assert_eq!(middle.placement, PopupPlacement::Bottom);
}

#[test]
fn text_input_reports_change_events() {
    let (changes, sink) = recorder();
    let mut input = TextInput::new().max_length(5).on_change(sink);
    input.input("hello world");
    assert_eq!(input.text().to_string(), "hello");
    assert_eq!(
        changes.borrow().last().cloned().and_then(FieldChange::into_value),
        Some(FieldValue::from("hello"))
    );

    let mut controlled = TextInput::new().value("fixed");
    controlled.input("typed");
    assert_eq!(controlled.text().to_string(), "fixed");

    let mut disabled = TextInput::new().disabled(true);
    disabled.input("x");
    assert!(disabled.text().is_empty());
    assert_eq!(disabled.state(), ComponentState::Disabled);
}

#[test]
fn checkbox_toggles_and_emits_bool() {
    let (changes, sink) = recorder();
    let mut checkbox = Checkbox::new().default_checked(true).on_change(sink);
    checkbox.toggle();
    assert!(!checkbox.is_checked());
    assert!(checkbox.key_down("space"));
    assert!(checkbox.is_checked());
    assert_eq!(
        *changes.borrow(),
        vec![FieldChange::value(false), FieldChange::value(true)]
    );

    let mut disabled = Checkbox::new().disabled(true);
    disabled.toggle();
    assert!(!disabled.is_checked());
}

fn fruit_select() -> Select {
    Select::new().options([
        SelectOption::new("apple", "Apple"),
        SelectOption::new("pear", "Pear").disabled(true),
        SelectOption::new("plum", "Plum"),
    ])
}

#[test]
fn select_keyboard_and_selection() {
    let (changes, sink) = recorder();
    let mut select = fruit_select().on_change(sink);

    assert!(select.key_down("enter"));
    assert!(select.is_open());
    assert!(select.key_down("escape"));
    assert!(!select.is_open());
    assert!(!select.key_down("a"));

    select.toggle();
    assert!(!select.select("pear"));
    assert!(select.is_open());
    assert!(!select.select("banana"));
    assert!(select.select("plum"));
    assert!(!select.is_open());
    assert_eq!(
        select.selected_option().map(|option| option.label.clone()),
        Some("Plum".into())
    );
    assert_eq!(*changes.borrow(), vec![FieldChange::value("plum")]);
}

#[test]
fn select_display_text_falls_back_to_placeholder() {
    let en = I18nManager::with_locale("en");
    let select = fruit_select();
    assert_eq!(select.display_text(&en), "Please select");
    assert_eq!(
        fruit_select().placeholder("Fruit").display_text(&en),
        "Fruit"
    );
    assert_eq!(fruit_select().value("apple").display_text(&en), "Apple");

    let mut disabled = fruit_select().disabled(true);
    assert!(!disabled.key_down("enter"));
    disabled.toggle();
    assert!(!disabled.is_open());
}

#[test]
fn date_picker_input_rules() {
    let (changes, sink) = recorder();
    let mut picker = DatePicker::new()
        .format(DateFormat::DayMonthYearSlash)
        .on_change(sink);

    assert!(picker.input("29/02/2024"));
    assert_eq!(picker.selected(), Some(date(2024, 2, 29)));
    assert_eq!(picker.display_text(), "29/02/2024");
    assert_eq!(picker.calendar_anchor(), CalendarAnchor::new(2024, 2));

    assert!(!picker.input("31/02/2024"));
    assert_eq!(picker.selected(), Some(date(2024, 2, 29)));

    assert!(picker.input(""));
    assert_eq!(picker.selected(), None);
    assert_eq!(
        *changes.borrow(),
        vec![FieldChange::value(date(2024, 2, 29)), FieldChange::cleared()]
    );
}

#[test]
fn date_picker_popup_and_navigation() {
    let mut picker = DatePicker::new().default_value("2024-01-15");
    assert_eq!(picker.calendar_anchor(), CalendarAnchor::new(2024, 1));

    picker.focus();
    assert!(picker.is_open());
    picker.prev_month();
    assert_eq!(picker.calendar_anchor(), CalendarAnchor::new(2023, 12));
    picker.next_year();
    assert_eq!(picker.calendar_anchor(), CalendarAnchor::new(2024, 12));

    picker.select_day(date(2024, 12, 24));
    assert!(!picker.is_open());
    assert_eq!(picker.selected(), Some(date(2024, 12, 24)));
    assert!(
        picker
            .cells(date(2024, 12, 1))
            .iter()
            .any(|cell| cell.is_selected && cell.date == date(2024, 12, 24))
    );

    let mut disabled = DatePicker::new().disabled(true);
    disabled.click();
    assert!(!disabled.is_open());
}

#[test]
fn controlled_date_picker_keeps_value_and_follows_anchor() {
    let mut picker = DatePicker::new().value(date(2020, 5, 5));
    picker.select_day(date(2020, 5, 6));
    assert_eq!(picker.selected(), Some(date(2020, 5, 5)));

    picker.set_field_value(Some(FieldValue::Date(date(2021, 8, 1))));
    assert_eq!(picker.calendar_anchor(), CalendarAnchor::new(2021, 8));
    assert_eq!(picker.field_value(), Some(FieldValue::Date(date(2021, 8, 1))));

    picker.set_field_value(None);
    assert_eq!(picker.field_value(), None);
    assert_eq!(picker.display_text(), "");
}

#[test]
fn field_control_injects_error_state() {
    let mut input = TextInput::new();
    input.set_field_error(Some("required".into()));
    assert_eq!(input.state(), ComponentState::Invalid);
    assert_eq!(input.error_text().map(|error| error.as_ref()), Some("required"));

    let mut select = fruit_select();
    select.set_field_value(Some(FieldValue::from("apple")));
    assert_eq!(select.field_value(), Some(FieldValue::from("apple")));
    select.set_field_value(Some(FieldValue::Null));
    assert_eq!(select.field_value(), None);
}
