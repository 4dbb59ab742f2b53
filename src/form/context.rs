use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, LazyLock};

use futures::executor::ThreadPool;
use gpui::SharedString;

use super::controller::{FormController, FormError, FormResult, ValidationTrigger};
use super::rule::FormRule;
use crate::i18n::I18nManager;
use crate::style::{FormLayout, LabelWidth};

pub type ValidationFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

static VALIDATION_POOL: LazyLock<Option<ThreadPool>> = LazyLock::new(|| {
    ThreadPool::builder()
        .name_prefix("l2ui-validation-")
        .create()
        .inspect_err(|error| tracing::warn!(%error, "validation pool unavailable"))
        .ok()
});

/// Drives validation futures started by field events.
#[derive(Clone)]
pub struct ValidationSpawner(Arc<dyn Fn(ValidationFuture) + Send + Sync>);

impl ValidationSpawner {
    pub fn new(spawn: impl Fn(ValidationFuture) + Send + Sync + 'static) -> Self {
        Self(Arc::new(spawn))
    }

    /// Runs each future on a shared background pool and returns right away.
    /// Results land in the form's error map when the future finishes.
    pub fn detached() -> Self {
        Self::new(|future| match VALIDATION_POOL.as_ref() {
            Some(pool) => pool.spawn_ok(future),
            None => {
                std::thread::spawn(move || futures::executor::block_on(future));
            }
        })
    }

    /// Runs each future to completion on the calling thread.
    ///
    /// Field events must not fire from inside another `block_on` (an async
    /// submit handler driven by `futures::executor`, for one); the nested
    /// executor panics. Debounce delays block the caller.
    pub fn inline() -> Self {
        Self::new(futures::executor::block_on)
    }

    pub fn spawn(&self, future: impl Future<Output = ()> + Send + 'static) {
        (self.0)(Box::pin(future));
    }
}

impl Default for ValidationSpawner {
    fn default() -> Self {
        Self::detached()
    }
}

impl std::fmt::Debug for ValidationSpawner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValidationSpawner")
    }
}

/// What a form hands to each of its fields.
#[derive(Clone, Debug)]
pub struct FormContext {
    controller: FormController,
    pub(super) layout: FormLayout,
    pub(super) label_width: Option<LabelWidth>,
    pub(super) trigger: ValidationTrigger,
    i18n: I18nManager,
    pub(super) spawner: ValidationSpawner,
}

impl FormContext {
    pub fn new(controller: FormController) -> Self {
        let options = controller.options().clone();
        Self {
            layout: options.layout,
            label_width: options.label_width,
            trigger: options.trigger,
            i18n: controller.i18n().clone(),
            spawner: ValidationSpawner::default(),
            controller,
        }
    }

    pub fn layout(mut self, layout: FormLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn label_width(mut self, width: impl Into<LabelWidth>) -> Self {
        self.label_width = Some(width.into());
        self
    }

    pub fn trigger(mut self, trigger: ValidationTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn spawner(mut self, spawner: ValidationSpawner) -> Self {
        self.spawner = spawner;
        self
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn form_layout(&self) -> FormLayout {
        self.layout
    }

    pub fn form_label_width(&self) -> Option<LabelWidth> {
        self.label_width
    }

    pub fn validation_trigger(&self) -> ValidationTrigger {
        self.trigger
    }

    pub fn i18n(&self) -> &I18nManager {
        &self.i18n
    }

    /// Registers (or replaces) the rules of a field.
    pub fn register_field(
        &self,
        name: impl Into<SharedString>,
        rules: Vec<FormRule>,
    ) -> FormResult<()> {
        self.controller.register_field(name, rules)
    }

    /// Validates a field through the spawner. The outcome lands in the
    /// store's error map; the returned error is only logged.
    pub fn spawn_validation(&self, name: SharedString) {
        let controller = self.controller.clone();
        self.spawner.spawn(async move {
            match controller.validate_field(name.clone()).await {
                Ok(_) | Err(FormError::FieldInvalid { .. }) | Err(FormError::Superseded) => {}
                Err(error) => tracing::debug!(field = %name, %error, "field validation failed"),
            }
        });
    }
}
