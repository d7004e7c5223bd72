//! `aisched models`: list the model registry.

use aisched_providers::{DEFAULT_MODEL, supported_models};

use crate::error::ClientResult;

/// Print every supported model with its adapter family.
pub fn list(current: &str) -> ClientResult<()> {
    for line in lines(current) {
        println!("{}", line);
    }
    Ok(())
}

fn lines(current: &str) -> Vec<String> {
    supported_models()
        .map(|(model, family)| {
            let mut line = format!("{:<26}{}", model, family.adapter().name());
            if model == DEFAULT_MODEL {
                line.push_str(" (default)");
            }
            if model == current {
                line.insert_str(0, "* ");
            } else {
                line.insert_str(0, "  ");
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_current_and_default() {
        let lines = lines("gemini-pro");
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("  gpt-3.5-turbo"));
        assert!(lines[0].ends_with("openai (default)"));
        assert!(lines.iter().any(|l| l.starts_with("* gemini-pro") && l.ends_with("gemini")));
    }
}
