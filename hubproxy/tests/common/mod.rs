#![allow(dead_code)]

use hubproxy::Token;
use std::sync::{Arc, Mutex};

// ============================================================================
// Recorders
// ============================================================================

/// Collects every value pushed by a callback.
#[derive(Clone, Default)]
pub struct Recorder<T> {
    pub seen: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, value: T) {
        self.seen.lock().unwrap().push(value);
    }

    pub fn values(&self) -> Vec<T> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

// ============================================================================
// Token helpers
// ============================================================================

pub fn tokens(values: &[&str]) -> Vec<Token> {
    values.iter().map(|v| Token::from(*v)).collect()
}
