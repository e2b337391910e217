use std::path::Path;
use std::process;

use ceh_eval::RuleCatalog;

use crate::config::Config;
use crate::{loader, report_error, OutputFormat};

/// Load a catalog and report what the loader skipped or weakened.
///
/// Labels missing from the transcoding table are listed too, but only
/// skipped rules and dropped clauses make the check fail: a missing label
/// may well be a raw record path.
pub(crate) fn cmd_check(rules_path: &Path, config: &Config, output: OutputFormat, quiet: bool) {
    let document = match loader::read_catalog(rules_path) {
        Ok(d) => d,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let catalog = match RuleCatalog::from_document(&document) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!("error: {}: {}", rules_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let problems = catalog.diagnostics();
    let untranscoded = catalog.transcoding_misses(&config.transcoding_table());

    if !quiet {
        match output {
            OutputFormat::Json => {
                let result = serde_json::json!({
                    "rules": catalog.len(),
                    "problems": problems.iter().map(|d| d.to_json()).collect::<Vec<_>>(),
                    "untranscoded": untranscoded.iter().map(|d| d.to_json()).collect::<Vec<_>>(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result)
                        .unwrap_or_else(|e| format!("serialization error: {}", e))
                );
            }
            OutputFormat::Text => {
                println!(
                    "{} rule(s) loaded from {}",
                    catalog.len(),
                    rules_path.display()
                );
                if problems.is_empty() {
                    println!("No problems found.");
                } else {
                    println!("{} problem(s):", problems.len());
                    for d in problems {
                        println!("  {}", d);
                    }
                }
                if !untranscoded.is_empty() {
                    println!("{} raw path(s):", untranscoded.len());
                    for d in &untranscoded {
                        println!("  {}", d);
                    }
                }
            }
        }
    }

    if !problems.is_empty() {
        process::exit(1);
    }
}
