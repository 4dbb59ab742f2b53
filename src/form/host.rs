use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::context::{FormContext, ValidationSpawner};
use super::controller::{
    FormController, FormError, FormEvent, FormResult, SubmitState, SubscriptionId,
    ValidationTrigger,
};
use super::value::FormValues;
use crate::i18n::Locale;
use crate::style::{FormLayout, LabelWidth};

type SubmitFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
type SubmitHandler = Arc<dyn Fn(FormValues) -> SubmitFuture + Send + Sync>;
type ResetHandler = Arc<dyn Fn() + Send + Sync>;

/// A form instance: owns the submit and reset flow around a controller.
pub struct Form {
    context: FormContext,
    on_submit: Option<SubmitHandler>,
    on_reset: Option<ResetHandler>,
    subscriptions: Vec<SubscriptionId>,
}

impl Form {
    pub fn new(controller: FormController) -> Self {
        Self {
            context: FormContext::new(controller),
            on_submit: None,
            on_reset: None,
            subscriptions: Vec::new(),
        }
    }

    pub fn layout(mut self, layout: FormLayout) -> Self {
        self.context.layout = layout;
        self
    }

    pub fn label_width(mut self, width: impl Into<LabelWidth>) -> Self {
        self.context.label_width = Some(width.into());
        self
    }

    pub fn trigger(mut self, trigger: ValidationTrigger) -> Self {
        self.context.trigger = trigger;
        self
    }

    /// Switches the message catalog of this form and its controller.
    pub fn locale(self, locale: impl Into<Locale>) -> Self {
        self.context.i18n().set_locale(locale);
        self
    }

    pub fn spawner(mut self, spawner: ValidationSpawner) -> Self {
        self.context.spawner = spawner;
        self
    }

    /// Runs after every submit whose validation passed, with the validated
    /// values.
    pub fn on_submit<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(FormValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: SubmitHandler =
            Arc::new(move |values: FormValues| -> SubmitFuture { Box::pin(handler(values)) });
        self.on_submit = Some(handler);
        self
    }

    pub fn on_reset(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_reset = Some(Arc::new(handler));
        self
    }

    /// Called with the changed fields and the full value map on every write.
    pub fn on_values_change(
        mut self,
        handler: impl Fn(&FormValues, &FormValues) + Send + Sync + 'static,
    ) -> FormResult<Self> {
        let id = self.context.controller().subscribe(move |event| {
            if let FormEvent::ValuesChanged { changed, all } = event {
                handler(changed, all);
            }
        })?;
        self.subscriptions.push(id);
        Ok(self)
    }

    pub fn context(&self) -> &FormContext {
        &self.context
    }

    pub fn controller(&self) -> &FormController {
        self.context.controller()
    }

    /// Validates every field and, when all pass, hands the values to the
    /// submit handler.
    ///
    /// Returns `Ok(false)` when validation failed; errors are then in the
    /// controller's error map. A value written while validation runs
    /// discards this submit with [`FormError::Superseded`].
    pub async fn submit(&self) -> FormResult<bool> {
        let controller = self.context.controller();
        let generation = controller.begin_submit()?;

        let values = match controller.validate_fields().await {
            Ok(values) => values,
            Err(FormError::ValidationFailed(errors)) => {
                controller.transition_submit(SubmitState::Failed)?;
                tracing::debug!(failed = errors.len(), "submit blocked by validation");
                return Ok(false);
            }
            Err(FormError::Superseded) => {
                controller.abandon_submit(generation)?;
                tracing::debug!(generation, "submit validation superseded");
                return Err(FormError::Superseded);
            }
            Err(error) => {
                if let Err(transition) = controller.transition_submit(SubmitState::Failed) {
                    tracing::debug!(%transition, "could not mark submit as failed");
                }
                return Err(error);
            }
        };

        controller.transition_submit(SubmitState::Submitting)?;
        if let Some(handler) = self.on_submit.as_ref() {
            handler(values).await;
        }
        controller.finish_submit()?;
        tracing::debug!("form submitted");
        Ok(true)
    }

    pub fn reset(&self) -> FormResult<()> {
        self.context.controller().reset_fields()?;
        if let Some(handler) = self.on_reset.as_ref() {
            handler();
        }
        Ok(())
    }
}

impl Drop for Form {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            let _ = self.context.controller().unsubscribe(id);
        }
    }
}
