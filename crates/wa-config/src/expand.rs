//! Shell-style expansion of fixture paths.
//!
//! `~` expands to the home directory, `$VAR` and `${VAR}` to the variable's
//! value, `${VAR:-default}` to the default when VAR is unset.

use crate::ConfigError;

/// Expand a fixture path, naming `field` in errors.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}}: {}", e.var_name, e.cause),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_unchanged() {
        assert_eq!(
            expand_path("site/rules.yaml", "fixtures.rules").unwrap(),
            "site/rules.yaml"
        );
    }

    #[test]
    fn test_expands_braced_and_bare_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("WA_TEST_SITE", "blog");
        }
        assert_eq!(
            expand_path("${WA_TEST_SITE}/rules-$WA_TEST_SITE.yaml", "fixtures.rules").unwrap(),
            "blog/rules-blog.yaml"
        );
        unsafe {
            std::env::remove_var("WA_TEST_SITE");
        }
    }

    #[test]
    fn test_default_for_unset_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("WA_TEST_UNSET_CONTEXT");
        }
        assert_eq!(
            expand_path("${WA_TEST_UNSET_CONTEXT:-context.json}", "fixtures.context").unwrap(),
            "context.json"
        );
    }

    #[test]
    fn test_tilde_expands_to_home() {
        let expanded = expand_path("~/wa/contents.json", "fixtures.contents").unwrap();
        if std::env::var_os("HOME").is_some() {
            assert!(!expanded.starts_with('~'));
        }
        assert!(expanded.ends_with("/wa/contents.json"));
    }

    #[test]
    fn test_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("WA_TEST_MISSING");
        }
        let err = expand_path("${WA_TEST_MISSING}/x.json", "fixtures.contents").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("WA_TEST_MISSING"));
        assert!(err.to_string().contains("fixtures.contents"));
    }
}
