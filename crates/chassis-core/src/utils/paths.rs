use std::env;
use std::path::{Path, PathBuf};

/// An environment variable's value; comma-delimited values are split into a
/// list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    Single(String),
    List(Vec<String>),
}

/// Look up an environment variable, splitting comma-delimited values.
pub fn env_value(name: &str) -> Option<EnvValue> {
    let raw = env::var(name).ok()?;
    if raw.contains(',') {
        Some(EnvValue::List(raw.split(',').map(str::to_string).collect()))
    } else {
        Some(EnvValue::Single(raw))
    }
}

/// Look up an environment variable with a default.
pub fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Provides the current application file path: the directory holding the
/// running executable.
pub fn app_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn rooted(variable: &str, default_subpath: &str) -> PathBuf {
    let subpath = env_or(variable, default_subpath);
    app_path().join(subpath.trim_start_matches('/'))
}

/// Provides the current application config directory (`CONFIG_DIR` override)
pub fn config_path() -> PathBuf {
    rooted("CONFIG_DIR", "config")
}

/// Provides the current application storage directory (`STORAGE_DIR` override)
pub fn storage_path() -> PathBuf {
    rooted("STORAGE_DIR", "storage")
}

/// Provides the current application public directory (`PUBLIC_DIR` override)
pub fn public_path() -> PathBuf {
    rooted("PUBLIC_DIR", "public")
}

/// Create a random string using the given mask ('a' for lowercase alpha
/// chars, 'A' for uppercase alpha chars, '#' for numeric chars and '!' for
/// special chars).
pub fn random_string(length: usize, mask: &str) -> String {
    use rand::Rng;

    let mut charset = String::new();
    if mask.contains('a') {
        charset.push_str("abcdefghijklmnopqrstuvwxyz");
    }
    if mask.contains('A') {
        charset.push_str("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    }
    if mask.contains('#') {
        charset.push_str("0123456789");
    }
    if mask.contains('!') {
        charset.push_str("~`!@#$%^&*()_+-={}[]:\";'<>?,./|\\");
    }

    let charset: Vec<char> = charset.chars().collect();
    if charset.is_empty() {
        return String::new();
    }

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| charset[rng.gen_range(0..charset.len())])
        .collect()
}
