//! Blocking user-facing side effects the page depends on.

use shared::protocol::Location;

pub trait Confirmer: Send {
    fn confirm(&mut self, prompt: &str) -> bool;
}

pub trait Notifier: Send {
    fn alert(&mut self, message: &str);
}

pub trait Navigator: Send {
    fn navigate(&mut self, location: Location);
}

pub struct PagePorts {
    pub confirmer: Box<dyn Confirmer>,
    pub notifier: Box<dyn Notifier>,
    pub navigator: Box<dyn Navigator>,
}

impl PagePorts {
    pub fn new(
        confirmer: impl Confirmer + 'static,
        notifier: impl Notifier + 'static,
        navigator: impl Navigator + 'static,
    ) -> Self {
        Self {
            confirmer: Box::new(confirmer),
            notifier: Box::new(notifier),
            navigator: Box::new(navigator),
        }
    }
}

/// Answers every prompt the same way.
pub struct FixedConfirmer(pub bool);

impl Confirmer for FixedConfirmer {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}
