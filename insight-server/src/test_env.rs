//! Environment helpers shared by tests that mutate process variables.

use std::sync::{Mutex, MutexGuard, OnceLock};

/// Serialize tests that touch process environment variables.
pub fn env_lock() -> MutexGuard<'static, ()> {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Set an environment variable for the current process.
pub fn set_env(key: &str, value: &str) {
    unsafe {
        std::env::set_var(key, value);
    }
}

/// Remove an environment variable from the current process.
pub fn remove_env(key: &str) {
    unsafe {
        std::env::remove_var(key);
    }
}
