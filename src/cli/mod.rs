//! CLI module for Cutline.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Cutline - natural-language commands for a video-editing timeline
///
/// Turns an editing instruction into one structured tool call (or a short
/// reply) that a timeline editor can apply.
#[derive(Parser, Debug)]
#[command(name = "cutline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API used by the timeline editor
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resolve a single instruction and print the result
    Ask {
        /// The editing instruction
        message: String,

        /// JSON file with the current timeline state
        #[arg(short, long)]
        timeline: Option<String>,

        /// JSON file with the media bin items (an array)
        #[arg(short, long)]
        media_bin: Option<String>,

        /// Print the raw response JSON
        #[arg(long)]
        json: bool,
    },

    /// List the editing tools the model can call
    Tools {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check configuration and credentials
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_with_context_files() {
        let cli = Cli::try_parse_from([
            "cutline",
            "-v",
            "ask",
            "add cardboard to track 2",
            "--timeline",
            "timeline.json",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Ask {
                message,
                timeline,
                media_bin,
                json,
            } => {
                assert_eq!(message, "add cardboard to track 2");
                assert_eq!(timeline.as_deref(), Some("timeline.json"));
                assert!(media_bin.is_none());
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["cutline", "serve"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve {
                host: None,
                port: None
            }
        ));
    }
}
