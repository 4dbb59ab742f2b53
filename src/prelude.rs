pub use crate::components::{
    CalendarAnchor, Checkbox, DateFormat, DatePicker, Select, SelectOption, TextInput,
};
pub use crate::contracts::{Disableable, FieldControl, FieldHandlers, Openable};
pub use crate::form::{
    FieldChange, FieldValue, Form, FormContext, FormController, FormError, FormItem, FormModel,
    FormOptions, FormResult, FormRule, FormValues, RuleType, ValidationTrigger,
};
pub use crate::style::{FormLayout, LabelWidth, Size};
pub use crate::{I18nManager, Locale};
