/// Reversible process-environment mutation.
use std::ffi::{OsStr, OsString};

use tracing::trace;

/// A guard that remembers the pre-scope state of every environment variable
/// it touches and puts it back when dropped.
///
/// Variables that were absent before the scope are removed again, never
/// left as empty strings. Restoration happens in `Drop`, so it also runs when
/// the guarded work returns early or panics.
///
/// The process environment is global: do not hold two scopes that touch the
/// same variable at once, and do not mutate those variables from other
/// threads while a scope is alive.
#[derive(Debug, Default)]
#[must_use = "the environment is restored as soon as the scope is dropped"]
pub struct EnvScope {
    saved: Vec<(OsString, Option<OsString>)>,
}

impl EnvScope {
    /// An empty scope that has not touched anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value` for the lifetime of the scope.
    pub fn set(&mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> &mut Self {
        let key = key.as_ref();
        self.snapshot(key);
        trace!(key = %key.to_string_lossy(), "setting scoped env var");
        // SAFETY: scopes assume exclusive, single-threaded use of the
        // variables they touch (see type docs).
        unsafe { std::env::set_var(key, value) };
        self
    }

    /// Remove `key` for the lifetime of the scope.
    pub fn remove(&mut self, key: impl AsRef<OsStr>) -> &mut Self {
        let key = key.as_ref();
        self.snapshot(key);
        trace!(key = %key.to_string_lossy(), "removing scoped env var");
        // SAFETY: see `set`.
        unsafe { std::env::remove_var(key) };
        self
    }

    /// Record the current value of `key` unless an earlier call already did.
    fn snapshot(&mut self, key: &OsStr) {
        if self.saved.iter().any(|(k, _)| k == key) {
            return;
        }
        self.saved.push((key.to_owned(), std::env::var_os(key)));
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            trace!(
                key = %key.to_string_lossy(),
                restored = previous.is_some(),
                "restoring env var"
            );
            // SAFETY: see `set`.
            unsafe {
                match previous {
                    Some(value) => std::env::set_var(&key, value),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use serial_test::serial;

    use super::*;

    const KEY_A: &str = "DEPLOYER_TEST_SCOPE_A";
    const KEY_B: &str = "DEPLOYER_TEST_SCOPE_B";

    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }

    fn clear_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    #[serial]
    fn test_restores_previous_value() {
        set_env(KEY_A, "original");
        {
            let mut scope = EnvScope::new();
            scope.set(KEY_A, "scoped");
            assert_eq!(std::env::var(KEY_A).unwrap(), "scoped");
        }
        assert_eq!(std::env::var(KEY_A).unwrap(), "original");
        clear_env(KEY_A);
    }

    #[test]
    #[serial]
    fn test_absent_stays_absent() {
        clear_env(KEY_A);
        {
            let mut scope = EnvScope::new();
            scope.set(KEY_A, "scoped");
        }
        // Absent, not collapsed to an empty string.
        assert!(std::env::var_os(KEY_A).is_none());
    }

    #[test]
    #[serial]
    fn test_empty_value_is_preserved_as_empty() {
        set_env(KEY_A, "");
        {
            let mut scope = EnvScope::new();
            scope.set(KEY_A, "scoped");
        }
        assert_eq!(std::env::var_os(KEY_A), Some(OsString::new()));
        clear_env(KEY_A);
    }

    #[test]
    #[serial]
    fn test_repeated_touches_restore_first_snapshot() {
        set_env(KEY_A, "original");
        clear_env(KEY_B);
        {
            let mut scope = EnvScope::new();
            scope.remove(KEY_A).set(KEY_A, "one").set(KEY_A, "two");
            scope.set(KEY_B, "b");
            assert_eq!(scope.saved.len(), 2);
        }
        assert_eq!(std::env::var(KEY_A).unwrap(), "original");
        assert!(std::env::var_os(KEY_B).is_none());
        clear_env(KEY_A);
    }

    #[test]
    #[serial]
    fn test_restores_on_panic() {
        set_env(KEY_A, "original");
        clear_env(KEY_B);
        let result: std::thread::Result<()> = catch_unwind(AssertUnwindSafe(|| {
            let mut scope = EnvScope::new();
            scope.set(KEY_A, "scoped").set(KEY_B, "scoped");
            panic!("body failed");
        }));
        assert!(result.is_err());
        assert_eq!(std::env::var(KEY_A).unwrap(), "original");
        assert!(std::env::var_os(KEY_B).is_none());
        clear_env(KEY_A);
    }

    #[test]
    #[serial]
    fn test_restores_on_early_error_return() {
        fn body(fail: bool) -> Result<(), &'static str> {
            let mut scope = EnvScope::new();
            scope.set(KEY_A, "scoped");
            if fail {
                return Err("cloud CLI failed");
            }
            Ok(())
        }

        clear_env(KEY_A);
        assert_eq!(body(true), Err("cloud CLI failed"));
        assert!(std::env::var_os(KEY_A).is_none());
        assert_eq!(body(false), Ok(()));
        assert!(std::env::var_os(KEY_A).is_none());
    }
}
