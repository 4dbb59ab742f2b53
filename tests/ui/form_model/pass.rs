use l2ui::form::{FieldValue, FormModel};

#[derive(Clone, Debug, PartialEq, l2ui::form::FormModel)]
struct SignupForm {
    email: String,
    age: Option<i64>,
    agree: bool,
}

fn main() {
    let model = SignupForm {
        email: "a@l2ui.dev".to_string(),
        age: None,
        agree: true,
    };
    let values = model.to_values();
    assert_eq!(SignupForm::field_names(), &["email", "age", "agree"]);
    assert_eq!(values.get("age"), Some(&FieldValue::Null));
    assert_eq!(SignupForm::from_values(&values), Some(model));
}
