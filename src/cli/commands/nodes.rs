//! Nodes command - list inventory nodes

use clap::Parser;

use super::CommandContext;
use crate::error::Result;
use crate::output::{self, OutputFormat};

/// Arguments for the nodes command
#[derive(Parser, Debug, Clone)]
pub struct NodesArgs {}

impl NodesArgs {
    /// Execute the nodes command; returns the process exit code
    pub async fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let inventory = ctx.load_inventory()?;

        match ctx.format {
            OutputFormat::Json => output::print_json(&inventory.nodes),
            _ => {
                if !inventory.lab.is_empty() {
                    output::header(&format!("LAB [{}]", inventory.lab));
                }
                output::print_table(
                    &["NAME", "HOST", "KIND", "VENDOR"],
                    inventory.nodes.iter().map(|n| {
                        vec![
                            n.name.clone(),
                            n.host.clone(),
                            n.kind.clone(),
                            n.vendor.clone().unwrap_or_else(|| "-".to_string()),
                        ]
                    }),
                );
            }
        }

        Ok(0)
    }
}
