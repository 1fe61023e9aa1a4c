//! Command-line interface for clab-tools.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::inventory::NodeSelector;
use crate::output::OutputFormat;

/// clab-tools - operate the network devices of a containerlab topology
///
/// Runs commands and pushes configuration across lab devices through
/// vendor-specific drivers.
#[derive(Parser, Debug, Clone)]
#[command(name = "clab-tools")]
#[command(version)]
#[command(about = "Command and configuration toolkit for containerlab devices", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the inventory file
    #[arg(short = 'i', long, global = true, env = "CLAB_TOOLS_INVENTORY")]
    pub inventory: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short = 'c', long, global = true, env = "CLAB_TOOLS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an operational command on devices
    Run(commands::run::RunArgs),

    /// Push configuration to devices
    Config(commands::config::ConfigArgs),

    /// Collect device facts
    Facts(commands::facts::FactsArgs),

    /// List inventory nodes
    Nodes(commands::nodes::NodesArgs),

    /// Show registered drivers
    Drivers(commands::drivers::DriversArgs),
}

/// Which inventory nodes to target; the options are mutually exclusive
#[derive(Args, Debug, Clone, Default)]
pub struct SelectorArgs {
    /// Target a single node by name
    #[arg(long, conflicts_with_all = ["kind", "nodes", "all"])]
    pub node: Option<String>,

    /// Target every node of a containerlab kind
    #[arg(long, conflicts_with_all = ["nodes", "all"])]
    pub kind: Option<String>,

    /// Target a comma-separated list of node names
    #[arg(long, value_delimiter = ',', conflicts_with = "all")]
    pub nodes: Vec<String>,

    /// Target every node in the inventory
    #[arg(long)]
    pub all: bool,
}

impl SelectorArgs {
    /// Convert CLI flags into a node selector
    pub fn to_selector(&self) -> Result<NodeSelector> {
        if let Some(ref name) = self.node {
            Ok(NodeSelector::Name(name.clone()))
        } else if let Some(ref kind) = self.kind {
            Ok(NodeSelector::Kind(kind.clone()))
        } else if !self.nodes.is_empty() {
            Ok(NodeSelector::List(self.nodes.clone()))
        } else if self.all {
            Ok(NodeSelector::All)
        } else {
            Err(Error::Usage(
                "Select targets with --node, --kind, --nodes or --all".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_requires_a_choice() {
        let args = SelectorArgs::default();
        assert!(args.to_selector().is_err());
    }

    #[test]
    fn test_selector_mapping() {
        let args = SelectorArgs {
            node: Some("r1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            args.to_selector().unwrap(),
            NodeSelector::Name("r1".to_string())
        );

        let args = SelectorArgs {
            nodes: vec!["r1".to_string(), "r2".to_string()],
            ..Default::default()
        };
        assert_eq!(
            args.to_selector().unwrap(),
            NodeSelector::List(vec!["r1".to_string(), "r2".to_string()])
        );

        let args = SelectorArgs {
            all: true,
            ..Default::default()
        };
        assert_eq!(args.to_selector().unwrap(), NodeSelector::All);
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "clab-tools",
            "run",
            "--command",
            "show version",
            "--all",
            "-i",
            "lab.yaml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Run(_)));
        assert_eq!(cli.inventory.as_deref().unwrap().to_str(), Some("lab.yaml"));
    }

    #[test]
    fn test_cli_rejects_conflicting_selectors() {
        let result = Cli::try_parse_from([
            "clab-tools",
            "run",
            "--command",
            "show version",
            "--node",
            "r1",
            "--all",
        ]);
        assert!(result.is_err());
    }
}
