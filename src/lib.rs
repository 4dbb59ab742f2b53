pub mod components;
pub mod contracts;
pub mod form;
pub mod i18n;
pub mod prelude;
pub mod style;

pub use gpui::SharedString;
pub use i18n::{I18nManager, Locale};
