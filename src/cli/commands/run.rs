//! Run command - execute an operational command on devices

use clap::Parser;

use super::CommandContext;
use crate::cli::SelectorArgs;
use crate::error::{Error, Result};
use crate::node::{CommandManager, CommandSummary, RunOptions};
use crate::output::{self, OutputFormat};

/// Arguments for the run command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// The command to execute
    #[arg(short = 'C', long, required = true)]
    pub command: String,

    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Command timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Run devices concurrently
    #[arg(short = 'p', long)]
    pub parallel: bool,

    /// Maximum concurrent device sessions
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,
}

impl RunArgs {
    /// Execute the run command; returns the process exit code
    pub async fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let nodes = ctx.select_nodes(&self.selector.to_selector()?)?;

        let options = RunOptions {
            timeout: self.timeout,
            parallel: self.parallel || ctx.settings.runner.parallel,
            workers: self.workers.unwrap_or(ctx.settings.runner.workers),
        };

        let manager = CommandManager::new(ctx.registry.clone(), ctx.settings.node.clone());
        let results = manager.run(&nodes, &self.command, &options).await;

        if ctx.format != OutputFormat::Json {
            output::header(&format!("RUN [{}]", self.command));
        }
        output::print_command_results(&results, ctx.format);

        let summary = CommandSummary::from_results(&results);
        if summary.all_succeeded() {
            Ok(0)
        } else {
            Err(Error::DevicesFailed {
                failed: summary.failed,
                total: summary.total,
            })
        }
    }
}
