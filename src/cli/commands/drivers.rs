//! Drivers command - show registered drivers

use clap::Parser;
use serde::Serialize;

use super::CommandContext;
use crate::error::Result;
use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize)]
struct RegistryView {
    drivers: Vec<String>,
    vendors: Vec<String>,
    device_types: Vec<String>,
}

/// Arguments for the drivers command
#[derive(Parser, Debug, Clone)]
pub struct DriversArgs {}

impl DriversArgs {
    /// Execute the drivers command; returns the process exit code
    pub async fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let view = RegistryView {
            drivers: ctx.registry.driver_names(),
            vendors: ctx.registry.vendors(),
            device_types: ctx.registry.device_types(),
        };

        match ctx.format {
            OutputFormat::Json => output::print_json(&view),
            _ => {
                output::header("DRIVERS");
                println!("drivers:      {}", view.drivers.join(", "));
                println!("vendors:      {}", view.vendors.join(", "));
                println!("device types: {}", view.device_types.join(", "));
            }
        }

        Ok(0)
    }
}
