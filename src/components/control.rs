/// A piece of control state that is either driven from outside (controlled)
/// or kept by the control itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Controllable<T> {
    controlled: Option<T>,
    internal: T,
}

impl<T: Clone> Controllable<T> {
    pub fn new(default: T) -> Self {
        Self {
            controlled: None,
            internal: default,
        }
    }

    pub fn set_default(&mut self, default: T) {
        self.internal = default;
    }

    pub fn control(&mut self, value: T) {
        self.controlled = Some(value);
    }

    pub fn release(&mut self) {
        self.controlled = None;
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    pub fn get(&self) -> &T {
        self.controlled.as_ref().unwrap_or(&self.internal)
    }

    /// Applies a change coming from the control itself. Returns `false`
    /// when the value is controlled and stays put.
    pub fn apply(&mut self, next: T) -> bool {
        if self.controlled.is_some() {
            return false;
        }
        self.internal = next;
        true
    }
}

impl<T: Clone + Default> Default for Controllable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

pub fn is_activation_key(key: &str) -> bool {
    key == "space" || key == "enter"
}

pub fn is_dismiss_key(key: &str) -> bool {
    key == "escape"
}
