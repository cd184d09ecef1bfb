//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::envelope::Metadata;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    eprintln!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    eprintln!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the fields of a decoded metadata bundle as a table.
pub fn print_metadata_table(meta: &Metadata) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    table.add_row(vec!["algorithm".to_string(), meta.algorithm.clone()]);
    table.add_row(vec![
        "salt".to_string(),
        format!("{} ({} bytes)", BASE64.encode(meta.salt), meta.salt.len()),
    ]);
    table.add_row(vec![
        "iv".to_string(),
        format!("{} ({} bytes)", BASE64.encode(meta.iv), meta.iv.len()),
    ]);

    match meta.kdf_params() {
        Ok(params) => {
            let implied = if meta.kdf.is_none() { " (implied)" } else { "" };
            table.add_row(vec!["kdf".to_string(), format!("{}{implied}", params.name())]);
            table.add_row(vec![
                "iterations".to_string(),
                params.iterations().to_string(),
            ]);
        }
        Err(e) => {
            table.add_row(vec!["kdf".to_string(), format!("unusable: {e}")]);
        }
    }
    if let Some(m) = meta.memory_kib {
        table.add_row(vec!["memory_kib".to_string(), m.to_string()]);
    }
    if let Some(p) = meta.parallelism {
        table.add_row(vec!["parallelism".to_string(), p.to_string()]);
    }

    println!("{table}");
}
