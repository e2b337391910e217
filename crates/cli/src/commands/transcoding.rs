use crate::config::Config;
use crate::OutputFormat;

pub(crate) fn cmd_transcoding(config: &Config, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    let table = config.transcoding_table();
    match output {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .iter()
                .map(|(label, path)| (label.to_string(), serde_json::json!(path)))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(map))
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
        OutputFormat::Text => {
            let width = table.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
            for (label, path) in table.iter() {
                let pad = width - label.chars().count();
                println!("{}{}  {}", label, " ".repeat(pad), path);
            }
        }
    }
}
