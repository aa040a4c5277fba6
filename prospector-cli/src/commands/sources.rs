//! Sources command - list sources and their configuration status.

use anyhow::Result;
use prospector_sources::SourceRegistry;
use serde_json::json;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Runs the sources command.
pub fn run(cli: &Cli) -> Result<()> {
    let rows: Vec<_> = SourceRegistry::all()
        .iter()
        .map(|desc| {
            let configured = std::env::var(desc.api_key_env)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false);
            (desc, configured)
        })
        .collect();

    if cli.format == OutputFormat::Json {
        let entries: Vec<_> = rows
            .iter()
            .map(|(desc, configured)| {
                json!({
                    "source": desc.cli_name(),
                    "display_name": desc.display_name(),
                    "api_key_env": desc.api_key_env,
                    "monthly_requests": desc.limits().monthly_requests,
                    "configured": configured,
                })
            })
            .collect();
        println!("{}", JsonFormatter::new(cli.pretty).format(&entries)?);
        return Ok(());
    }

    println!(
        "{:<12} {:<10} {:<22} {:>10}   {}",
        "Source", "Name", "Key env", "Monthly", "Status"
    );
    for (desc, configured) in rows {
        let status = if configured {
            if cli.no_color {
                "✓ configured".to_string()
            } else {
                "\x1b[32m✓ configured\x1b[0m".to_string()
            }
        } else if cli.no_color {
            "✗ missing key".to_string()
        } else {
            "\x1b[31m✗ missing key\x1b[0m".to_string()
        };

        println!(
            "{:<12} {:<10} {:<22} {:>10}   {}",
            desc.cli_name(),
            desc.display_name(),
            desc.api_key_env,
            desc.limits().monthly_requests,
            status
        );
    }
    println!("{:<12} {:<10} {:<22} {:>10}   built in", "manual", "Manual", "-", "-");

    Ok(())
}
