//! Remote operation fakes shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use rotor_model::Outcome;

use crate::remote::RemoteOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub credential: String,
    pub target: String,
    pub message: String,
}

/// Replays scripted outcomes in order, then keeps answering with `fallback`.
pub struct ScriptedRemote {
    script: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRemote {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self::with_fallback(script, Outcome::success(None))
    }

    pub fn with_fallback(script: Vec<Outcome>, fallback: Outcome) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(outcome: Outcome) -> Self {
        Self::with_fallback(Vec::new(), outcome)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteOperation for ScriptedRemote {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn attempt(&self, credential: &str, target: &str, message: &str) -> Outcome {
        self.calls.lock().unwrap().push(Call {
            credential: credential.to_string(),
            target: target.to_string(),
            message: message.to_string(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Succeeds, but only after sleeping for a fixed duration.
pub struct SlowRemote {
    delay: Duration,
    count: AtomicUsize,
}

impl SlowRemote {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            count: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteOperation for SlowRemote {
    async fn attempt(&self, _credential: &str, _target: &str, _message: &str) -> Outcome {
        self.count.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Outcome::success(None)
    }
}
