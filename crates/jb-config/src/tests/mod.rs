
use std::env;

use tempfile::TempDir;

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Create a temp config directory and set JB_CONFIG_DIR
pub(crate) fn setup_config_dir() -> (TempDir, EnvGuard) {
    let temp = TempDir::new().unwrap();
    let guard = EnvGuard::set("JB_CONFIG_DIR", temp.path().to_str().unwrap());
    (temp, guard)
}

/// Minimal valid auth so validate() passes in tests not about auth
pub(crate) fn set_test_secret() -> EnvGuard {
    EnvGuard::set(
        "JB_AUTH_JWT_SECRET",
        "test-secret-key-for-config-tests-32-bytes",
    )
}
