use std::path::Path;
use std::process;

use ceh_eval::types::{format_date, parse_date};
use ceh_eval::{Engine, Evaluation, RuleCatalog};

use crate::config::Config;
use crate::{loader, report_error, OutputFormat};

pub(crate) fn cmd_eval(
    record_path: &Path,
    rules_path: &Path,
    date: Option<&str>,
    all: bool,
    config: &Config,
    output: OutputFormat,
    quiet: bool,
) {
    let today = match date.map(parse_date).transpose() {
        Ok(d) => d,
        Err(e) => {
            report_error(&format!("error: --date: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let record = match loader::read_record(record_path) {
        Ok(r) => r,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

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

    let engine = Engine::new(catalog, config.transcoding_table()).with_policy(config.selection);
    let evaluation = match today {
        Some(d) => engine.evaluate_at(&record, d),
        None => engine.evaluate(&record),
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&engine, &evaluation, all),
        OutputFormat::Text => print_text(&evaluation, all),
    }
}

fn print_json(engine: &Engine, evaluation: &Evaluation, all: bool) {
    let mut out = serde_json::Map::new();
    out.insert("result".to_string(), evaluation.to_json());
    if all {
        let matches: Vec<serde_json::Value> = evaluation
            .matches
            .iter()
            .map(|m| {
                serde_json::json!({
                    "name": m.name,
                    "priority": m.priority,
                    "created_at": format_date(m.created_at),
                    "code": m.code,
                    "condition_count": m.condition_count,
                })
            })
            .collect();
        out.insert("matches".to_string(), serde_json::Value::Array(matches));
    }
    let diagnostics: Vec<serde_json::Value> = engine
        .catalog()
        .diagnostics()
        .iter()
        .chain(&evaluation.diagnostics)
        .map(|d| d.to_json())
        .collect();
    out.insert(
        "diagnostics".to_string(),
        serde_json::Value::Array(diagnostics),
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(out))
            .unwrap_or_else(|e| format!("serialization error: {}", e))
    );
}

fn print_text(evaluation: &Evaluation, all: bool) {
    match &evaluation.selected {
        Some(s) => {
            println!("Selected rule: {}", s.name);
            println!("  message:  {}", s.message);
            println!("  priority: {}", s.priority);
            println!("  code:     {}", s.code);
            println!("  created:  {}", format_date(s.created_at));
            match s.validity {
                Some(v) => println!("  validity: {}", format_date(v)),
                None => println!("  validity: none"),
            }
        }
        None => println!("No rule matched."),
    }
    if all && !evaluation.matches.is_empty() {
        println!("{} match(es):", evaluation.matches.len());
        for m in &evaluation.matches {
            println!(
                "  [{}] {} (code: {}, conditions: {})",
                m.priority, m.name, m.code, m.condition_count
            );
        }
    }
}
