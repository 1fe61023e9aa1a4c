//! Config command - push configuration to devices

use clap::Parser;
use std::path::PathBuf;

use super::CommandContext;
use crate::cli::SelectorArgs;
use crate::error::{Error, Result};
use crate::node::{
    ConfigFormat, ConfigLoadMethod, ConfigManager, ConfigPushOptions, ConfigSource, ConfigSummary,
};
use crate::output::{self, OutputFormat};

/// Arguments for the config command
#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    /// Local configuration file to push
    #[arg(short = 'f', long, conflicts_with = "device_file", required_unless_present = "device_file")]
    pub file: Option<PathBuf>,

    /// Configuration file path already on each device
    #[arg(long)]
    pub device_file: Option<String>,

    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Configuration content format
    #[arg(long, default_value = "text")]
    pub format: ConfigFormat,

    /// How the content combines with the existing configuration
    #[arg(short = 'm', long, default_value = "merge")]
    pub method: ConfigLoadMethod,

    /// Preview without leaving changes on the device
    #[arg(long)]
    pub dry_run: bool,

    /// Commit comment
    #[arg(long)]
    pub comment: Option<String>,

    /// Run devices concurrently
    #[arg(short = 'p', long)]
    pub parallel: bool,

    /// Maximum concurrent device sessions
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,
}

impl ConfigArgs {
    /// Execute the config command; returns the process exit code
    pub async fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let nodes = ctx.select_nodes(&self.selector.to_selector()?)?;

        // clap guarantees exactly one of the two sources
        let source = if let Some(ref path) = self.file {
            ConfigSource::LocalFile(path.clone())
        } else if let Some(ref path) = self.device_file {
            ConfigSource::DeviceFile(path.clone())
        } else {
            unreachable!("clap enforces file or device-file")
        };

        let options = ConfigPushOptions {
            format: self.format,
            method: self.method,
            dry_run: self.dry_run,
            comment: self.comment.clone(),
            parallel: self.parallel || ctx.settings.runner.parallel,
            workers: self.workers.unwrap_or(ctx.settings.runner.workers),
        };

        let manager = ConfigManager::new(ctx.registry.clone(), ctx.settings.node.clone());
        let results = manager.push(&nodes, &source, &options).await?;

        if ctx.format != OutputFormat::Json {
            let label = if self.dry_run { "CONFIG (dry run)" } else { "CONFIG" };
            output::header(label);
        }
        output::print_config_results(&results, ctx.format);

        let summary = ConfigSummary::from_results(&results);
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
