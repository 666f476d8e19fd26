//! Credential pool with round-robin selection over live entries.

use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::error::CoreError;

/// A secret plus its liveness flag.
///
/// Liveness only ever goes from `true` to `false`.
struct Credential {
    secret: String,
    live: AtomicBool,
}

/// Entry picked by [`CredentialPool::select`].
#[derive(Debug, Clone, Copy)]
pub struct Selected<'a> {
    /// Position in the pool (0-based, stable for the pool lifetime).
    pub index: usize,
    pub secret: &'a str,
}

/// Ordered, fixed-size set of credentials.
///
/// Entries are never removed: revocation flips the liveness flag, so
/// [`CredentialPool::len`] stays stable while [`CredentialPool::live_count`] drops.
pub struct CredentialPool {
    entries: Vec<Credential>,
}

impl CredentialPool {
    pub fn new(secrets: Vec<String>) -> Result<Self, CoreError> {
        if secrets.is_empty() {
            return Err(CoreError::InvalidSpec("credential pool must not be empty".into()));
        }
        let entries = secrets
            .into_iter()
            .map(|secret| Credential {
                secret,
                live: AtomicBool::new(true),
            })
            .collect();
        Ok(Self { entries })
    }

    /// Total number of entries, live or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|c| c.live.load(Ordering::Acquire))
            .count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.live_count() == 0
    }

    pub fn is_live(&self, index: usize) -> bool {
        self.entries
            .get(index)
            .is_some_and(|c| c.live.load(Ordering::Acquire))
    }

    /// Pick the live entry at `cursor mod |live|` and return it with the next cursor.
    ///
    /// The cursor grows without bound and is reduced against the current live subset on
    /// every call, so it needs no reset when entries get revoked.
    pub fn select(&self, cursor: u64) -> Result<(Selected<'_>, u64), CoreError> {
        let live: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, c)| c.live.load(Ordering::Acquire))
            .map(|(i, _)| i)
            .collect();

        if live.is_empty() {
            return Err(CoreError::ExhaustedPool);
        }

        let index = live[(cursor % live.len() as u64) as usize];
        let selected = Selected {
            index,
            secret: &self.entries[index].secret,
        };
        Ok((selected, cursor.wrapping_add(1)))
    }

    /// Permanently revoke the entry at `index`.
    ///
    /// Returns `true` only for the call that actually flipped the flag;
    /// repeated calls and out-of-range indexes are no-ops.
    pub fn invalidate(&self, index: usize) -> bool {
        self.entries
            .get(index)
            .is_some_and(|c| c.live.swap(false, Ordering::AcqRel))
    }

    /// Loggable form of the entry at `index`: `#<n> <first4>…<last2>`.
    pub fn describe(&self, index: usize) -> String {
        match self.entries.get(index) {
            Some(c) => format!("#{} {}", index + 1, mask(&c.secret)),
            None => format!("#{}", index + 1),
        }
    }
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool")
            .field("len", &self.len())
            .field("live", &self.live_count())
            .finish()
    }
}

fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 8 {
        return "****".to_string();
    }
    let head: String = secret.chars().take(4).collect();
    let tail: String = secret.chars().skip(count - 2).collect();
    format!("{head}…{tail}")
}
