//! The keyspace: a map of key to tagged `Value`, a parallel expiry map, and
//! the lazy-expiration policy applied to every read.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use crate::value::Value;

pub type Key = Bytes;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as u64
}

/// The single flat keyspace. Not `Sync`/`Send`-guarded: the server runs on a
/// single-threaded executor and this type is meant to be wrapped in
/// `Rc<RefCell<_>>`, mutated only inside command handlers that hold no
/// suspension points (see `SPEC_FULL.md` §11).
#[derive(Debug, Default)]
pub struct Keyspace {
    data: HashMap<Key, Value>,
    expiry: HashMap<Key, u64>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lazy-expiration: if `key`'s deadline has passed, remove it from both
    /// maps and report it as gone. Must run before any observable read.
    fn reap_if_expired(&mut self, key: &[u8]) -> bool {
        match self.expiry.get(key) {
            Some(&deadline) if now_ms() >= deadline => {
                self.data.remove(key);
                self.expiry.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Stores `value` at `key`, clearing any prior expiry.
    pub fn set(&mut self, key: Key, value: Value) {
        self.expiry.remove(&key);
        self.data.insert(key, value);
    }

    /// Stores `value` at `key` with a deadline `ttl_seconds` from now.
    pub fn set_with_ttl(&mut self, key: Key, value: Value, ttl_seconds: u64) {
        self.expiry.insert(key.clone(), now_ms() + ttl_seconds * 1000);
        self.data.insert(key, value);
    }

    pub fn get(&mut self, key: &[u8]) -> Option<&Value> {
        self.reap_if_expired(key);
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut Value> {
        self.reap_if_expired(key);
        self.data.get_mut(key)
    }

    /// For each key, `SingleBulk(value)` if it holds a `String`, `None`
    /// otherwise (missing and wrong-typed keys both map to `None`).
    pub fn mget<'a>(&mut self, keys: impl IntoIterator<Item = &'a [u8]>) -> Vec<Option<Bytes>> {
        keys.into_iter()
            .map(|k| match self.get(k) {
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns those of `candidates` that currently exist (this repo treats
    /// the argument list as literal candidate keys, not a glob pattern).
    pub fn keys<'a>(&mut self, candidates: impl IntoIterator<Item = &'a [u8]>) -> Vec<Key> {
        candidates
            .into_iter()
            .filter(|k| self.contains(k))
            .map(Bytes::copy_from_slice)
            .collect()
    }

    /// Removes each of `keys`, returning the count actually removed.
    /// Already-expired keys are reaped but not counted.
    pub fn erase<'a>(&mut self, keys: impl IntoIterator<Item = &'a [u8]>) -> usize {
        let mut count = 0;
        for key in keys {
            if self.reap_if_expired(key) {
                continue;
            }
            if self.data.remove(key).is_some() {
                self.expiry.remove(key);
                count += 1;
            }
        }
        count
    }

    /// Installs an expiry on `key`, returning `true` iff the key exists.
    pub fn expire_at(&mut self, key: &[u8], ttl_seconds: u64) -> bool {
        if self.reap_if_expired(key) || !self.data.contains_key(key) {
            return false;
        }
        self.expiry
            .insert(Bytes::copy_from_slice(key), now_ms() + ttl_seconds * 1000);
        true
    }

    /// `None` if `key` is absent or has no expiry; otherwise the remaining
    /// seconds (never negative).
    pub fn ttl(&mut self, key: &[u8]) -> Option<u64> {
        if self.reap_if_expired(key) {
            return None;
        }
        let deadline = *self.expiry.get(key)?;
        let now = now_ms();
        Some(deadline.saturating_sub(now) / 1000)
    }

    /// Removes `key`'s expiry, returning `true` iff one was removed.
    pub fn persist(&mut self, key: &[u8]) -> bool {
        if self.reap_if_expired(key) {
            return false;
        }
        self.expiry.remove(key).is_some()
    }

    pub fn contains(&mut self, key: &[u8]) -> bool {
        self.reap_if_expired(key);
        self.data.contains_key(key)
    }

    /// Best-effort key count; may include not-yet-reaped expired keys.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Synchronous clear.
    pub fn flush(&mut self) {
        self.data.clear();
        self.expiry.clear();
    }

    /// Swaps in empty maps and hands the old ones to a detached background
    /// thread whose only job is to drop them. Returns immediately; the
    /// client-visible size is zero as soon as this returns.
    pub fn flush_async(&mut self) {
        let old_data = std::mem::take(&mut self.data);
        let old_expiry = std::mem::take(&mut self.expiry);
        std::thread::spawn(move || {
            drop(old_data);
            drop(old_expiry);
        });
    }
}
