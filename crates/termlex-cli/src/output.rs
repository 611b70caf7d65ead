use std::collections::BTreeMap;

use colored::Colorize;

use crate::cli::OutputFormat;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print the per-OID result sets, sorted for stable output.
pub fn print_lexicon(lexicon: &BTreeMap<String, Vec<String>>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(lexicon).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Text => {
            for (oid, entries) in lexicon {
                println!("{} ({} entries)", oid.cyan(), entries.len());
                for entry in entries {
                    println!("  {entry}");
                }
            }
        }
    }
}
