//! Terminal output helpers
//!
//! Human output goes through `console` styling; `--json` switches every
//! command to a machine-readable document on stdout.

use console::style;
use serde::Serialize;

use crate::error::{HubError, Result};

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| HubError::Serialization(e.to_string()))?;
    println!("{text}");
    Ok(())
}

pub fn heading(text: &str) {
    println!("{}", style(text).bold().underlined());
}

pub fn success(text: &str) {
    println!("{} {text}", style("ok").green().bold());
}

pub fn note(text: &str) {
    println!("{}", style(text).dim());
}

pub fn error(text: &str) {
    eprintln!("{} {text}", style("error").red().bold());
}
