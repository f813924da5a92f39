//! CLI output formatting utilities.

use crate::catalog::{PropertyType, ToolDescriptor};
use crate::intent::ResolvedIntent;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a tool with its arguments.
    pub fn tool(tool: &ToolDescriptor) {
        println!("  {} {}", style("*").cyan(), style(tool.name).bold());
        println!("    {}", content_preview(tool.description, 100));

        let schema = &tool.argument_schema;
        for prop in &schema.properties {
            let marker = if schema.required.contains(&prop.name) {
                style("required").yellow()
            } else {
                style("optional").dim()
            };
            println!(
                "      {} {} ({})",
                style(prop.name).cyan(),
                type_name(prop.kind),
                marker
            );
        }
    }

    /// Print a resolved intent.
    pub fn intent(intent: &ResolvedIntent) {
        match intent {
            ResolvedIntent::ToolCall(call) => {
                println!(
                    "\n{} {}",
                    style("Tool call:").green().bold(),
                    style(&call.function_name).bold()
                );
                for (key, value) in &call.arguments {
                    Output::kv(key, &value.to_string());
                }
                println!();
            }
            ResolvedIntent::Message(text) => {
                println!("\n{}\n", text);
            }
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

fn type_name(kind: PropertyType) -> &'static str {
    match kind {
        PropertyType::String => "string",
        PropertyType::Integer => "integer",
        PropertyType::Number => "number",
        PropertyType::Boolean => "boolean",
        PropertyType::StringArray => "string[]",
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_len: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_len {
        content
    } else {
        let cut: String = content.chars().take(max_len).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short", 10), "short");
        assert_eq!(content_preview("line one\nline two", 100), "line one line two");
        assert_eq!(content_preview("abcdefghij", 4), "abcd...");
    }
}
