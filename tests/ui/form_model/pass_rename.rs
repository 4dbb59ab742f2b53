use l2ui::form::{FormModel, FormValues};

#[derive(l2ui::form::FormModel)]
struct LoginForm {
    #[form(rename = "userName")]
    user_name: String,
    remember: Option<bool>,
}

fn main() {
    assert_eq!(LoginForm::field_names(), &["userName", "remember"]);

    let mut values = FormValues::new();
    values.insert("userName".into(), "ada".into());
    let model = LoginForm::from_values(&values).expect("remember is optional");
    assert_eq!(model.user_name, "ada");
    assert_eq!(model.remember, None);
    assert!(LoginForm::from_values(&FormValues::new()).is_none());
}
