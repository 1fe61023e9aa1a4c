//! Output and reporting for clab-tools

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use crate::node::command_manager::CommandSummary;
use crate::node::config_manager::ConfigSummary;
use crate::node::{CommandResult, ConfigResult};

/// How results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Per-device colored lines
    #[default]
    Text,
    /// Aligned table
    Table,
    /// JSON array
    Json,
}

/// Print a section header
pub fn header(name: &str) {
    let header = format!("{} ", name);
    let stars = "*".repeat(80_usize.saturating_sub(header.len()));
    println!("\n{}{}", header.bright_white().bold(), stars.bright_black());
}

fn ok_line(device: &str, detail: &str) {
    println!("{}: [{}] {}", "ok".green(), device.bright_white().bold(), detail);
}

fn changed_line(device: &str, detail: &str) {
    println!(
        "{}: [{}] {}",
        "changed".yellow(),
        device.bright_white().bold(),
        detail
    );
}

fn failed_line(device: &str, msg: &str) {
    println!(
        "{}: [{}] => {}",
        "failed".red().bold(),
        device.bright_white().bold(),
        msg
    );
}

/// Render results of a command run
pub fn print_command_results(results: &[CommandResult], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(results),
        OutputFormat::Table => {
            print_table(
                &["DEVICE", "STATUS", "EXIT", "DURATION"],
                results.iter().map(|r| {
                    vec![
                        r.device.clone(),
                        if r.is_success() { "ok".into() } else { "failed".into() },
                        r.exit_code.to_string(),
                        format!("{:.2}s", r.duration),
                    ]
                }),
            );
            print_command_recap(&CommandSummary::from_results(results));
        }
        OutputFormat::Text => {
            for result in results {
                if result.is_success() {
                    ok_line(&result.device, "");
                    for line in result.output.lines() {
                        println!("    {}", line);
                    }
                } else {
                    failed_line(
                        &result.device,
                        result.error.as_deref().unwrap_or("unknown error"),
                    );
                }
            }
            print_command_recap(&CommandSummary::from_results(results));
        }
    }
}

/// Render results of a configuration push
pub fn print_config_results(results: &[ConfigResult], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(results),
        OutputFormat::Table => {
            print_table(
                &["DEVICE", "STATUS", "MESSAGE"],
                results.iter().map(|r| {
                    let status = if !r.success {
                        "failed"
                    } else if r.diff.is_some() {
                        "changed"
                    } else {
                        "ok"
                    };
                    vec![r.device.clone(), status.into(), r.message.clone()]
                }),
            );
            print_config_recap(&ConfigSummary::from_results(results));
        }
        OutputFormat::Text => {
            for result in results {
                if !result.success {
                    failed_line(
                        &result.device,
                        result.error.as_deref().unwrap_or(&result.message),
                    );
                } else if let Some(ref diff) = result.diff {
                    changed_line(&result.device, &result.message);
                    for line in diff.lines() {
                        let colored = if line.starts_with('+') {
                            line.green().to_string()
                        } else if line.starts_with('-') {
                            line.red().to_string()
                        } else {
                            line.bright_black().to_string()
                        };
                        println!("    {}", colored);
                    }
                } else {
                    ok_line(&result.device, &result.message);
                }
            }
            print_config_recap(&ConfigSummary::from_results(results));
        }
    }
}

/// Print the recap line for a command run
pub fn print_command_recap(summary: &CommandSummary) {
    header("RECAP");
    println!(
        "{}={}  {}={}  {}={}",
        "total".bright_white(),
        summary.total,
        "ok".green(),
        summary.succeeded,
        "failed".red(),
        summary.failed,
    );
    for device in &summary.failed_devices {
        println!("  {} {}", "failed:".red(), device);
    }
}

/// Print the recap line for a configuration push
pub fn print_config_recap(summary: &ConfigSummary) {
    header("RECAP");
    println!(
        "{}={}  {}={}  {}={}  {}={}",
        "total".bright_white(),
        summary.total,
        "changed".yellow(),
        summary.succeeded - summary.unchanged,
        "unchanged".green(),
        summary.unchanged,
        "failed".red(),
        summary.failed,
    );
    for device in &summary.failed_devices {
        println!("  {} {}", "failed:".red(), device);
    }
}

/// Serialize anything to pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Print rows under a header with column alignment
pub fn print_table<I>(columns: &[&str], rows: I)
where
    I: IntoIterator<Item = Vec<String>>,
{
    let rows: Vec<Vec<String>> = rows.into_iter().collect();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_line: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
        .collect();
    println!("{}", header_line.join("  ").bright_white().bold());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  "));
    }
}
