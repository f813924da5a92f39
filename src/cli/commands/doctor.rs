//! Doctor command - verify configuration and credentials.

use crate::catalog::list_tools;
use crate::cli::Output;
use crate::config::{ModelSettings, Prompts, Settings};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Cutline Doctor");
    println!();
    println!("Checking configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Model").bold());
    let model_checks = vec![
        check_api_key(&settings.model),
        CheckResult::ok("Endpoint", &settings.model.base_url),
        CheckResult::ok("Model", &settings.model.model),
    ];
    for check in &model_checks {
        check.print();
    }
    checks.extend(model_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![
        check_config_file(),
        check_prompts(settings),
        CheckResult::ok("Tool catalog", &format!("{} tools", list_tools().len())),
    ];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Cutline.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Cutline is ready to use.");
    }

    Ok(())
}

/// Check if an API key is configured.
fn check_api_key(model: &ModelSettings) -> CheckResult {
    let name = model.api_key_env.as_str();
    match model.resolve_api_key() {
        Some(key) => CheckResult::ok(name, &format!("configured ({})", mask_key(&key))),
        None => CheckResult::error(
            name,
            "not set",
            &format!("Set with: export {}='...'", name),
        ),
    }
}

/// Check that the prompt templates load.
fn check_prompts(settings: &Settings) -> CheckResult {
    match Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    ) {
        Ok(_) => match &settings.prompts.custom_dir {
            Some(dir) => CheckResult::ok("Prompts", &format!("custom ({})", dir)),
            None => CheckResult::ok("Prompts", "built-in"),
        },
        Err(e) => CheckResult::error(
            "Prompts",
            &e.to_string(),
            "Check intent.toml in prompts.custom_dir",
        ),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override", config_path.display()),
        )
    }
}

/// Show only the edges of a secret.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("short"), "*****");
        assert_eq!(mask_key("AIzaSyExampleKey1234"), "AIza...1234");
    }

    #[test]
    fn test_missing_key_is_error() {
        let model = ModelSettings {
            api_key: None,
            api_key_env: "CUTLINE_DOCTOR_UNSET".to_string(),
            ..ModelSettings::default()
        };
        assert_eq!(check_api_key(&model).status, CheckStatus::Error);
    }
}
