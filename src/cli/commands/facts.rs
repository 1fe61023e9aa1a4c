//! Facts command - collect device facts

use clap::Parser;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use super::CommandContext;
use crate::cli::SelectorArgs;
use crate::error::{Error, Result};
use crate::node::command_manager::connection_params;
use crate::output::{self, OutputFormat};

/// Facts collected from one device, or the error that prevented it
#[derive(Debug, Clone, Serialize)]
pub struct FactsRecord {
    pub device: String,
    pub success: bool,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub facts: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Arguments for the facts command
#[derive(Parser, Debug, Clone)]
pub struct FactsArgs {
    #[command(flatten)]
    pub selector: SelectorArgs,
}

impl FactsArgs {
    /// Execute the facts command; returns the process exit code
    pub async fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let nodes = ctx.select_nodes(&self.selector.to_selector()?)?;

        let mut records = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let params = connection_params(node, &ctx.settings.node);
            let record = match ctx.registry.resolve_and_construct(params) {
                Ok(mut driver) => match driver.connect().await {
                    Ok(()) => {
                        let facts = driver.get_facts().await;
                        driver.disconnect().await;
                        match facts {
                            Ok(facts) => FactsRecord {
                                device: node.name.clone(),
                                success: true,
                                facts,
                                error: None,
                            },
                            Err(e) => failed_record(&node.name, e.to_string()),
                        }
                    }
                    Err(e) => failed_record(&node.name, e.to_string()),
                },
                Err(e) => failed_record(&node.name, e.to_string()),
            };

            if !record.success {
                warn!(node = %node.name, error = ?record.error, "Fact collection failed");
            }
            records.push(record);
        }

        match ctx.format {
            OutputFormat::Json => output::print_json(&records),
            _ => {
                output::header("FACTS");
                print_facts_text(&records);
            }
        }

        let failed = records.iter().filter(|r| !r.success).count();
        if failed == 0 {
            Ok(0)
        } else {
            Err(Error::DevicesFailed {
                failed,
                total: records.len(),
            })
        }
    }
}

fn failed_record(device: &str, error: String) -> FactsRecord {
    FactsRecord {
        device: device.to_string(),
        success: false,
        facts: HashMap::new(),
        error: Some(error),
    }
}

fn print_facts_text(records: &[FactsRecord]) {
    for record in records {
        if record.success {
            println!("{}:", record.device);
            let mut keys: Vec<&String> = record.facts.keys().collect();
            keys.sort();
            for key in keys {
                println!("  {:<12} {}", key, record.facts[key]);
            }
        } else {
            println!(
                "{}: failed ({})",
                record.device,
                record.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
