//! Pre-flight checks before talking to the model.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail on the first request.

use crate::config::ModelSettings;
use crate::error::{CutlineError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Resolving an instruction requires an API key.
    Ask,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, model: &ModelSettings) -> Result<()> {
    match operation {
        Operation::Ask => {
            check_api_key(model)?;
        }
    }
    Ok(())
}

/// Check that an API key is configured.
fn check_api_key(model: &ModelSettings) -> Result<()> {
    match model.resolve_api_key() {
        Some(_) => Ok(()),
        None => Err(CutlineError::Config(format!(
            "{} not set. Set it with: export {}='...' (or model.api_key in the config file)",
            model.api_key_env, model.api_key_env
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_ask_requires_key() {
        let mut model = ModelSettings {
            api_key: None,
            api_key_env: "CUTLINE_PREFLIGHT_UNSET".to_string(),
            ..ModelSettings::default()
        };
        assert!(matches!(
            check(Operation::Ask, &model),
            Err(CutlineError::Config(_))
        ));

        model.api_key = Some("key".to_string());
        assert!(check(Operation::Ask, &model).is_ok());
    }
}
