use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

/// Substitute environment variables in the format ${VAR_NAME},
/// ${VAR_NAME:-default} or $VAR_NAME
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::-([^}]*))?\}|\$(\w+)").unwrap();
    let mut result = content.to_string();
    let mut missing_vars = Vec::new();

    for caps in re.captures_iter(content) {
        let var_name = caps.get(1).or(caps.get(3)).map(|m| m.as_str()).unwrap_or_default();
        let placeholder = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let fallback = caps.get(2).map(|m| m.as_str());

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {} = \"{}\"", var_name, value);
                result = result.replace(placeholder, &value);
            }
            Err(_) => match fallback {
                Some(default) => {
                    debug!(
                        "Environment variable '{}' not set, using inline default: \"{}\"",
                        var_name, default
                    );
                    result = result.replace(placeholder, default);
                }
                None => {
                    warn!("Environment variable '{}' not set", var_name);
                    missing_vars.push(var_name.to_string());
                    // Keep the placeholder; the validator catches it later
                }
            },
        }
    }

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may use defaults or fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result)
}

/// Get environment variable with a default value
pub fn get_env_or_default(var_name: &str, default: &str) -> String {
    match env::var(var_name) {
        Ok(value) => {
            debug!("Using environment variable: {} = \"{}\"", var_name, value);
            value
        }
        Err(_) => {
            warn!(
                "Environment variable '{}' not set, using default: \"{}\"",
                var_name, default
            );
            default.to_string()
        }
    }
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    let re = Regex::new(r"\$\{(\w+)(?::-([^}]*))?\}|\$(\w+)").unwrap();
    re.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_default_used_when_var_missing() {
        let input = "url: ${DEXFLOW_TEST_MISSING_VAR:-redis://localhost:6379}";
        let out = substitute_env_vars(input).unwrap();
        assert_eq!(out, "url: redis://localhost:6379");
    }

    #[test]
    fn test_placeholder_kept_when_var_missing_without_default() {
        let input = "url: ${DEXFLOW_TEST_MISSING_VAR}";
        let out = substitute_env_vars(input).unwrap();
        assert_eq!(out, input);
        assert!(has_unresolved_env_vars(&out));
    }

    #[test]
    fn test_env_var_substituted() {
        env::set_var("DEXFLOW_TEST_SET_VAR", "hello");
        let out = substitute_env_vars("value: ${DEXFLOW_TEST_SET_VAR}").unwrap();
        assert_eq!(out, "value: hello");
        env::remove_var("DEXFLOW_TEST_SET_VAR");
    }
}
