//! Tools command - print the tool catalog.

use crate::catalog::list_tools;
use crate::cli::Output;
use anyhow::Result;

/// Run the tools command.
pub fn run_tools(json: bool) -> Result<()> {
    let tools = list_tools();

    if json {
        let rendered: Vec<_> = tools.iter().map(|t| t.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    Output::header(&format!("Editing tools ({})", tools.len()));
    for tool in tools {
        Output::tool(tool);
    }
    println!();

    Ok(())
}
