//! Terminal-backed confirm, alert, and navigation ports.

use std::{
    io::{self, BufRead, Write},
    sync::{Arc, Mutex},
};

use client_core::{Confirmer, Navigator, Notifier};
use shared::protocol::Location;

pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_affirmative(&answer)
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&mut self, message: &str) {
        eprintln!("alert: {message}");
    }
}

/// Prints each navigation and remembers the last one so the caller can pick an exit status.
#[derive(Clone, Default)]
pub struct PrintingNavigator {
    last: Arc<Mutex<Option<Location>>>,
}

impl PrintingNavigator {
    pub fn last(&self) -> Option<Location> {
        self.last.lock().ok().and_then(|guard| *guard)
    }
}

impl Navigator for PrintingNavigator {
    fn navigate(&mut self, location: Location) {
        println!("-> {}", location.path());
        if let Ok(mut guard) = self.last.lock() {
            *guard = Some(location);
        }
    }
}
