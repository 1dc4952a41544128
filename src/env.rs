//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, so settings overrides can
//! be exercised without touching the process environment.

use std::collections::HashMap;

/// Environment variable reader.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    #[cfg(test)]
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Look up a variable, treating blank values as unset.
    ///
    /// Settings values are opaque strings where an empty value means
    /// "not configured", so `FOO=` must not clobber a saved setting.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Return the first non-empty value among `names`, in order.
    pub fn first_non_empty(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.non_empty(name))
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_env_reads_cargo_manifest_dir() {
        let env = Env::real();
        assert!(env.var("CARGO_MANIFEST_DIR").is_ok());
    }

    #[test]
    fn mock_env_returns_not_present_for_missing() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        assert!(env.var("NONEXISTENT").is_err());
        assert_eq!(env.non_empty("NONEXISTENT"), None);
    }

    #[test]
    fn non_empty_skips_blank_values() {
        let env = Env::mock([("BLANK", "   "), ("SET", " value ")]);
        assert_eq!(env.non_empty("BLANK"), None);
        assert_eq!(env.non_empty("SET"), Some("value".to_string()));
    }

    #[test]
    fn first_non_empty_respects_order() {
        let env = Env::mock([("PRIMARY", ""), ("FALLBACK", "fb"), ("LAST", "last")]);
        assert_eq!(
            env.first_non_empty(&["PRIMARY", "FALLBACK", "LAST"]),
            Some("fb".to_string())
        );
        assert_eq!(env.first_non_empty(&["MISSING"]), None);
    }
}
