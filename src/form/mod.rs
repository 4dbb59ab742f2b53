mod context;
mod controller;
mod host;
mod item;
mod model;
mod rule;
mod validation;
mod value;


pub use context::{FormContext, ValidationFuture, ValidationSpawner};
pub use controller::{
    FormController, FormError, FormEvent, FormId, FormOptions, FormResult, FormSnapshot,
    SubmitState, SubscriptionId, ValidationTicket, ValidationTrigger,
};
pub use host::Form;
pub use item::{BoundField, FieldPresentation, FormItem};
pub use l2ui_form_derive::FormModel;
pub use model::{FormModel, FromFieldValue, IntoFieldValue};
pub use rule::{BoxedValidationFuture, FormField, FormRule, RuleType, ValidatorOutcome};
pub use validation::{evaluate, evaluate_now, evaluate_with};
pub use value::{ChangeEvent, FieldChange, FieldValue, FormErrors, FormValues, is_empty_value};
