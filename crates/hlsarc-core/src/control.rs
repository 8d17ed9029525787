//! Transfer control: shared abort tokens.
//!
//! Each in-flight resource download registers a token under its source URL.
//! Setting one token stops only that transfer; `abort_all` also raises the
//! shutdown flag so workers stop picking up new resources.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Cancellation flag checked by a running transfer.
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Registry of source URL -> abort token for in-flight transfers.
#[derive(Debug, Default)]
pub struct AbortRegistry {
    transfers: RwLock<HashMap<String, AbortToken>>,
    shutdown: AtomicBool,
}

impl AbortRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a running transfer; returns the token to pass to the fetch.
    /// A transfer registered after `abort_all` starts out aborted.
    pub fn register(&self, source: &str) -> AbortToken {
        let token = AbortToken::new();
        let mut transfers = self
            .transfers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        transfers.insert(source.to_string(), token.clone());
        // Checked under the lock: an `abort_all` that missed this insert has
        // already raised the flag.
        if self.is_shutdown() {
            token.abort();
        }
        token
    }

    /// Unregister a transfer (call when it finishes, success or failure).
    pub fn unregister(&self, source: &str) {
        self.transfers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(source);
    }

    /// Abort one transfer. Returns false if it is not running.
    pub fn request_abort(&self, source: &str) -> bool {
        match self
            .transfers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
        {
            Some(token) => {
                token.abort();
                true
            }
            None => false,
        }
    }

    /// Abort every running transfer and refuse new ones.
    pub fn abort_all(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        for token in self
            .transfers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            token.abort();
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    pub fn in_flight(&self) -> usize {
        self.transfers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_one_leaves_siblings_running() {
        let reg = AbortRegistry::new();
        let a = reg.register("https://h/a.ts");
        let b = reg.register("https://h/b.ts");
        assert!(reg.request_abort("https://h/a.ts"));
        assert!(a.is_aborted());
        assert!(!b.is_aborted());
        assert!(!reg.is_shutdown());
    }

    #[test]
    fn abort_unknown_is_false() {
        let reg = AbortRegistry::new();
        assert!(!reg.request_abort("https://h/x.ts"));
    }

    #[test]
    fn abort_all_marks_running_and_future() {
        let reg = AbortRegistry::new();
        let a = reg.register("https://h/a.ts");
        reg.abort_all();
        assert!(a.is_aborted());
        assert!(reg.is_shutdown());
        assert!(reg.register("https://h/late.ts").is_aborted());
    }

    #[test]
    fn unregister_removes_token() {
        let reg = AbortRegistry::new();
        reg.register("https://h/a.ts");
        assert_eq!(reg.in_flight(), 1);
        reg.unregister("https://h/a.ts");
        assert_eq!(reg.in_flight(), 0);
    }

    #[test]
    fn register_racing_abort_all_is_always_aborted() {
        for _ in 0..50 {
            let reg = AbortRegistry::new();
            let tokens = std::thread::scope(|scope| {
                let worker = scope.spawn(|| {
                    (0..200)
                        .map(|i| reg.register(&format!("https://h/{i}.ts")))
                        .collect::<Vec<_>>()
                });
                reg.abort_all();
                worker.join().unwrap()
            });
            assert!(tokens.iter().all(AbortToken::is_aborted));
        }
    }
}
