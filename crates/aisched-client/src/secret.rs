//! Secret reference resolver.
//!
//! The `api_key` in `config.toml` can reference a secret stored outside the
//! file:
//!
//! - `pass::path/in/store`: runs `pass show path/in/store`, returns first line
//! - `env::VAR_NAME`: reads `$VAR_NAME` from the environment
//! - anything else: returned as-is (plain text)

/// Resolves a value that may contain a secret reference prefix.
pub fn resolve(value: &str) -> Result<String, String> {
    if let Some(path) = value.strip_prefix("pass::") {
        resolve_pass(path)
    } else if let Some(var) = value.strip_prefix("env::") {
        resolve_env(var)
    } else {
        Ok(value.to_string())
    }
}

/// Returns true if `value` is a reference rather than the secret itself.
pub fn is_reference(value: &str) -> bool {
    value.starts_with("pass::") || value.starts_with("env::")
}

/// Masks a secret for display. References are shown unchanged.
pub fn redact(value: &str) -> String {
    if is_reference(value) {
        return value.to_string();
    }
    let count = value.chars().count();
    if count <= 12 {
        return "***".to_string();
    }
    let head: String = value.chars().take(3).collect();
    let tail: String = value.chars().skip(count - 4).collect();
    format!("{}…{}", head, tail)
}

/// Runs `pass show <path>` and returns the first line of stdout.
fn resolve_pass(path: &str) -> Result<String, String> {
    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| format!("failed to run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "`pass show {}` failed (exit {}): {}",
            path,
            output.status,
            stderr.trim()
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("`pass show {}` produced no output", path))
}

/// Reads an environment variable.
fn resolve_env(var: &str) -> Result<String, String> {
    std::env::var(var).map_err(|_| format!("environment variable `{}` is not set", var))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passthrough() {
        assert_eq!(resolve("sk-abc").unwrap(), "sk-abc");
        assert_eq!(resolve("").unwrap(), "");
    }

    #[test]
    fn env_prefix_resolves() {
        unsafe {
            std::env::set_var("_AISCHED_TEST_SECRET", "my-secret-value");
        }
        assert_eq!(resolve("env::_AISCHED_TEST_SECRET").unwrap(), "my-secret-value");
        unsafe {
            std::env::remove_var("_AISCHED_TEST_SECRET");
        }
    }

    #[test]
    fn env_prefix_missing_var_errors() {
        let result = resolve("env::_AISCHED_NONEXISTENT_VAR_12345");
        assert!(result.unwrap_err().contains("not set"));
    }

    #[test]
    fn pass_prefix_missing_entry_errors() {
        let result = resolve("pass::nonexistent/entry/that/should/not/exist/12345");
        assert!(result.is_err());
    }

    #[test]
    fn redact_masks_long_keys() {
        assert_eq!(redact("sk-proj-1234567890abcdef"), "sk-…cdef");
        assert_eq!(redact("short"), "***");
        assert_eq!(redact("env::OPENAI_API_KEY"), "env::OPENAI_API_KEY");
    }
}
