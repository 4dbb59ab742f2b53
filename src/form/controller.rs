use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::join_all;
use futures_timer::Delay;
use gpui::SharedString;

use super::rule::{FormField, FormRule, with_required_shortcut};
use super::validation::evaluate_with;
use super::value::{FieldValue, FormErrors, FormValues};
use crate::i18n::{I18nManager, Locale};
use crate::style::{FormLayout, LabelWidth};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ValidationTicket(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// When a bound field validates itself. Submitting always validates every
/// registered field.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ValidationTrigger {
    OnChange,
    #[default]
    OnBlur,
    OnSubmit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormOptions {
    pub layout: FormLayout,
    pub label_width: Option<LabelWidth>,
    pub trigger: ValidationTrigger,
    pub locale: Locale,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            layout: FormLayout::Vertical,
            label_width: None,
            trigger: ValidationTrigger::OnBlur,
            locale: Locale::System,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    ValuesChanged {
        changed: FormValues,
        all: FormValues,
    },
    ErrorsChanged(FormErrors),
    Reset(FormValues),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormSnapshot {
    pub values: FormValues,
    pub errors: FormErrors,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub is_dirty: bool,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    AlreadySubmitting,
    FieldInvalid {
        field: SharedString,
        message: SharedString,
    },
    ValidationFailed(FormErrors),
    /// A newer validation pass started before this one finished; its result
    /// was discarded.
    Superseded,
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
            FormError::InvalidStateTransition { from, to } => {
                write!(f, "invalid submit state transition: {from:?} -> {to:?}")
            }
            FormError::AlreadySubmitting => f.write_str("form submit is already in progress"),
            FormError::FieldInvalid { field, message } => {
                write!(f, "field `{field}` is invalid: {message}")
            }
            FormError::ValidationFailed(errors) => {
                let fields = errors
                    .keys()
                    .map(|field| field.as_ref())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "form validation failed for: {fields}")
            }
            FormError::Superseded => f.write_str("validation superseded by a newer pass"),
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub(super) type Listener = Arc<dyn Fn(&FormEvent) + Send + Sync>;

pub(super) struct FormState {
    pub(super) id: FormId,
    pub(super) initial_values: FormValues,
    pub(super) values: FormValues,
    pub(super) errors: FormErrors,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) submit_generation: u64,
    pub(super) next_ticket: u64,
    pub(super) pass_ticket: Option<ValidationTicket>,
    pub(super) field_tickets: BTreeMap<SharedString, ValidationTicket>,
}

impl FormState {
    pub(super) fn issue_ticket(&mut self) -> ValidationTicket {
        self.next_ticket += 1;
        ValidationTicket(self.next_ticket)
    }
}

/// The state store of one form instance.
///
/// Cloning yields another handle to the same form; this is the imperative
/// handle a host application keeps to drive the form from outside.
#[derive(Clone)]
pub struct FormController {
    pub(super) options: FormOptions,
    pub(super) i18n: I18nManager,
    pub(super) state: Arc<RwLock<FormState>>,
    pub(super) registry: Arc<RwLock<BTreeMap<SharedString, Vec<FormRule>>>>,
    pub(super) listeners: Arc<RwLock<BTreeMap<SubscriptionId, Listener>>>,
    next_subscription: Arc<AtomicU64>,
}

impl FormController {
    pub fn new(initial_values: FormValues, options: FormOptions) -> Self {
        Self::with_fields(initial_values, Vec::new(), options)
    }

    /// Seeds the form from `initial_values` merged with per-field defaults
    /// (an explicit initial value wins) and registers the fields' rules.
    pub fn with_fields(
        initial_values: FormValues,
        fields: Vec<FormField>,
        options: FormOptions,
    ) -> Self {
        let i18n = I18nManager::with_locale(options.locale.clone());
        let mut initial = initial_values;
        let mut registry = BTreeMap::new();
        for field in fields {
            if let Some(value) = field.initial_value.clone() {
                initial.entry(field.name.clone()).or_insert(value);
            }
            let rules = with_required_shortcut(
                field.rules,
                field.required,
                field.label.as_ref(),
                &field.name,
                &i18n,
            );
            if !rules.is_empty() {
                registry.insert(field.name, rules);
            }
        }

        Self {
            options,
            i18n,
            state: Arc::new(RwLock::new(FormState {
                id: FormId::next(),
                initial_values: initial.clone(),
                values: initial,
                errors: FormErrors::new(),
                submit_state: SubmitState::Idle,
                submit_count: 0,
                submit_generation: 0,
                next_ticket: 0,
                pass_ticket: None,
                field_tickets: BTreeMap::new(),
            })),
            registry: Arc::new(RwLock::new(registry)),
            listeners: Arc::new(RwLock::new(BTreeMap::new())),
            next_subscription: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn i18n(&self) -> &I18nManager {
        &self.i18n
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn value(&self, name: &str) -> FormResult<Option<FieldValue>> {
        Ok(read_lock(&self.state, "reading field value")?
            .values
            .get(name)
            .cloned())
    }

    pub fn values(&self) -> FormResult<FormValues> {
        Ok(read_lock(&self.state, "reading form values")?.values.clone())
    }

    pub fn initial_values(&self) -> FormResult<FormValues> {
        Ok(read_lock(&self.state, "reading initial values")?
            .initial_values
            .clone())
    }

    /// Writes one field. An error recorded for the field is cleared right
    /// away and validations still running against the old value are
    /// discarded; re-validation is up to the caller.
    pub fn set_value(
        &self,
        name: impl Into<SharedString>,
        value: impl Into<FieldValue>,
    ) -> FormResult<()> {
        let name = name.into();
        let value = value.into();
        let mut changed = FormValues::new();
        changed.insert(name.clone(), value);
        self.apply_values(changed)
    }

    /// Writes several fields at once with a single change notification.
    pub fn set_values(&self, values: FormValues) -> FormResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        self.apply_values(values)
    }

    fn apply_values(&self, changed: FormValues) -> FormResult<()> {
        let (all, errors) = {
            let mut state = write_lock(&self.state, "writing form values")?;
            let mut cleared = false;
            for (name, value) in &changed {
                state.values.insert(name.clone(), value.clone());
                state.field_tickets.remove(name);
                cleared |= state.errors.remove(name).is_some();
            }
            state.pass_ticket = None;
            (state.values.clone(), cleared.then(|| state.errors.clone()))
        };

        tracing::debug!(
            fields = ?changed.keys().collect::<Vec<_>>(),
            cleared_errors = errors.is_some(),
            "form values set"
        );
        self.emit(FormEvent::ValuesChanged { changed, all })?;
        if let Some(errors) = errors {
            self.emit(FormEvent::ErrorsChanged(errors))?;
        }
        Ok(())
    }

    pub fn error(&self, name: &str) -> FormResult<Option<SharedString>> {
        Ok(read_lock(&self.state, "reading field error")?
            .errors
            .get(name)
            .cloned())
    }

    pub fn errors(&self) -> FormResult<FormErrors> {
        Ok(read_lock(&self.state, "reading form errors")?.errors.clone())
    }

    /// Records (`Some`) or clears (`None`) the error of one field.
    pub fn set_error(
        &self,
        name: impl Into<SharedString>,
        error: Option<SharedString>,
    ) -> FormResult<()> {
        let name = name.into();
        let errors = {
            let mut state = write_lock(&self.state, "writing field error")?;
            let changed = match error {
                Some(message) => state.errors.insert(name, message.clone()) != Some(message),
                None => state.errors.remove(&name).is_some(),
            };
            changed.then(|| state.errors.clone())
        };
        if let Some(errors) = errors {
            self.emit(FormEvent::ErrorsChanged(errors))?;
        }
        Ok(())
    }

    pub fn clear_error(&self, name: impl Into<SharedString>) -> FormResult<()> {
        self.set_error(name, None)
    }

    pub fn clear_errors(&self) -> FormResult<()> {
        let had_errors = {
            let mut state = write_lock(&self.state, "clearing all field errors")?;
            let had_errors = !state.errors.is_empty();
            state.errors.clear();
            had_errors
        };
        if had_errors {
            self.emit(FormEvent::ErrorsChanged(FormErrors::new()))?;
        }
        Ok(())
    }

    /// Restores the initial snapshot and clears every error. Validation
    /// passes still in flight are discarded when they finish.
    pub fn reset_fields(&self) -> FormResult<()> {
        let values = {
            let mut state = write_lock(&self.state, "resetting form")?;
            state.values = state.initial_values.clone();
            state.errors.clear();
            state.submit_state = SubmitState::Idle;
            let ticket = state.issue_ticket();
            state.pass_ticket = Some(ticket);
            state.field_tickets.clear();
            state.values.clone()
        };
        tracing::debug!(fields = values.len(), "form reset");
        self.emit(FormEvent::Reset(values))
    }

    /// Registers the rules of one field. Re-registering a name replaces its
    /// rules.
    pub fn register_field(
        &self,
        name: impl Into<SharedString>,
        rules: Vec<FormRule>,
    ) -> FormResult<()> {
        let name = name.into();
        tracing::trace!(field = %name, rules = rules.len(), "field registered");
        write_lock(&self.registry, "registering field")?.insert(name, rules);
        Ok(())
    }

    pub fn unregister_field(&self, name: &str) -> FormResult<()> {
        write_lock(&self.registry, "unregistering field")?.remove(name);
        Ok(())
    }

    pub fn registered_fields(&self) -> FormResult<Vec<SharedString>> {
        Ok(read_lock(&self.registry, "reading registered fields")?
            .keys()
            .cloned()
            .collect())
    }

    pub fn rules(&self, name: &str) -> FormResult<Option<Vec<FormRule>>> {
        Ok(read_lock(&self.registry, "reading field rules")?
            .get(name)
            .cloned())
    }

    pub fn is_required(&self, name: &str) -> FormResult<bool> {
        Ok(read_lock(&self.registry, "reading required fields")?
            .get(name)
            .is_some_and(|rules| rules.iter().any(FormRule::is_required)))
    }

    /// Validates one field against its registered rules and records the
    /// outcome. Returns the current value when the field is valid.
    ///
    /// Each call supersedes earlier calls for the same field, and so does a
    /// write to the field; a superseded call writes nothing and returns
    /// [`FormError::Superseded`].
    pub async fn validate_field(
        &self,
        name: impl Into<SharedString>,
    ) -> FormResult<Option<FieldValue>> {
        let name = name.into();
        let rules = self.rules(&name)?.unwrap_or_default();
        let (ticket, value, values) = {
            let mut state = write_lock(&self.state, "starting field validation")?;
            let ticket = state.issue_ticket();
            state.field_tickets.insert(name.clone(), ticket);
            (ticket, state.values.get(&name).cloned(), state.values.clone())
        };

        let debounce = rules
            .iter()
            .filter(|rule| rule.validator.is_some())
            .map(FormRule::debounce_duration)
            .max()
            .unwrap_or_default();
        if !debounce.is_zero() {
            Delay::new(debounce).await;
            if !self.is_current_field_ticket(&name, ticket)? {
                tracing::debug!(field = %name, ticket = ticket.0, "debounced validation superseded");
                return Err(FormError::Superseded);
            }
        }

        let error = evaluate_with(value.as_ref(), &rules, &values, &self.i18n).await;

        let errors = {
            let mut state = write_lock(&self.state, "recording field validation")?;
            if state.field_tickets.get(&name) != Some(&ticket) {
                tracing::debug!(field = %name, ticket = ticket.0, "field validation superseded");
                return Err(FormError::Superseded);
            }
            state.field_tickets.remove(&name);
            let changed = match &error {
                Some(message) => {
                    state.errors.insert(name.clone(), message.clone()) != Some(message.clone())
                }
                None => state.errors.remove(&name).is_some(),
            };
            changed.then(|| state.errors.clone())
        };
        if let Some(errors) = errors {
            self.emit(FormEvent::ErrorsChanged(errors))?;
        }

        match error {
            Some(message) => Err(FormError::FieldInvalid {
                field: name,
                message,
            }),
            None => Ok(value),
        }
    }

    /// Validates every registered field, replaces the error map with the
    /// collected failures and returns the values when all fields pass.
    ///
    /// Every field is checked even after the first failure. A newer call, a
    /// value write or a reset supersedes this one.
    pub async fn validate_fields(&self) -> FormResult<FormValues> {
        let registry = read_lock(&self.registry, "reading field rules")?.clone();
        let (ticket, values) = {
            let mut state = write_lock(&self.state, "starting form validation")?;
            let ticket = state.issue_ticket();
            state.pass_ticket = Some(ticket);
            (ticket, state.values.clone())
        };

        let i18n = &self.i18n;
        let values_ref = &values;
        let results = join_all(registry.iter().map(|(name, rules)| async move {
            let error = evaluate_with(values_ref.get(name), rules, values_ref, i18n).await;
            (name.clone(), error)
        }))
        .await;
        let errors = results
            .into_iter()
            .filter_map(|(name, error)| error.map(|message| (name, message)))
            .collect::<FormErrors>();

        let changed = {
            let mut state = write_lock(&self.state, "recording form validation")?;
            if state.pass_ticket != Some(ticket) {
                tracing::debug!(ticket = ticket.0, "form validation superseded");
                return Err(FormError::Superseded);
            }
            let changed = state.errors != errors;
            state.errors = errors.clone();
            changed
        };
        tracing::debug!(
            fields = registry.len(),
            failed = errors.len(),
            "form validated"
        );
        if changed {
            self.emit(FormEvent::ErrorsChanged(errors.clone()))?;
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(FormError::ValidationFailed(errors))
        }
    }

    fn is_current_field_ticket(&self, name: &str, ticket: ValidationTicket) -> FormResult<bool> {
        Ok(read_lock(&self.state, "checking validation ticket")?
            .field_tickets
            .get(name)
            == Some(&ticket))
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&FormEvent) + Send + Sync + 'static,
    ) -> FormResult<SubscriptionId> {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        write_lock(&self.listeners, "subscribing to form events")?.insert(id, Arc::new(listener));
        Ok(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> FormResult<bool> {
        Ok(write_lock(&self.listeners, "unsubscribing from form events")?
            .remove(&id)
            .is_some())
    }

    pub fn submit_state(&self) -> FormResult<SubmitState> {
        Ok(read_lock(&self.state, "reading submit state")?.submit_state)
    }

    pub fn submit_count(&self) -> FormResult<u32> {
        Ok(read_lock(&self.state, "reading submit count")?.submit_count)
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            values: state.values.clone(),
            errors: state.errors.clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            is_dirty: state.values != state.initial_values,
            is_valid: state.errors.is_empty(),
        })
    }

    pub fn is_field_dirty(&self, name: &str) -> FormResult<bool> {
        let state = read_lock(&self.state, "reading field dirty state")?;
        Ok(state.values.get(name) != state.initial_values.get(name))
    }

    pub(super) fn emit(&self, event: FormEvent) -> FormResult<()> {
        let listeners = read_lock(&self.listeners, "reading form listeners")?
            .values()
            .cloned()
            .collect::<Vec<_>>();
        for listener in listeners {
            listener(&event);
        }
        Ok(())
    }

    /// Starts a submit and returns its generation.
    pub(super) fn begin_submit(&self) -> FormResult<u64> {
        let mut state = write_lock(&self.state, "preparing submit")?;
        if state.submit_state == SubmitState::Submitting {
            return Err(FormError::AlreadySubmitting);
        }
        transition_submit_state(&mut state, SubmitState::Validating)?;
        state.submit_count = state.submit_count.saturating_add(1);
        state.submit_generation += 1;
        Ok(state.submit_generation)
    }

    /// Returns a submit whose validation was discarded to `Idle`, unless a
    /// newer submit has taken over.
    pub(super) fn abandon_submit(&self, generation: u64) -> FormResult<()> {
        let mut state = write_lock(&self.state, "abandoning submit")?;
        if state.submit_generation == generation && state.submit_state == SubmitState::Validating
        {
            transition_submit_state(&mut state, SubmitState::Idle)?;
        }
        Ok(())
    }

    /// Marks a submit as succeeded unless a reset interrupted it.
    pub(super) fn finish_submit(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "finishing submit")?;
        if state.submit_state == SubmitState::Submitting {
            transition_submit_state(&mut state, SubmitState::Succeeded)?;
        }
        Ok(())
    }

    pub(super) fn transition_submit(&self, next: SubmitState) -> FormResult<()> {
        let mut state = write_lock(&self.state, "updating submit state")?;
        transition_submit_state(&mut state, next)
    }
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("FormController");
        debug.field("options", &self.options);
        if let Ok(state) = self.state.read() {
            debug
                .field("id", &state.id)
                .field("values", &state.values)
                .field("errors", &state.errors)
                .field("submit_state", &state.submit_state);
        }
        debug.finish_non_exhaustive()
    }
}

pub(super) fn transition_submit_state(
    state: &mut FormState,
    next: SubmitState,
) -> FormResult<()> {
    let current = state.submit_state;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Validating)
            | (SubmitState::Validating, SubmitState::Submitting)
            | (SubmitState::Validating, SubmitState::Failed)
            | (SubmitState::Submitting, SubmitState::Succeeded)
            | (SubmitState::Submitting, SubmitState::Failed)
            | (SubmitState::Succeeded, SubmitState::Validating)
            | (SubmitState::Failed, SubmitState::Validating)
            | (_, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    state.submit_state = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
