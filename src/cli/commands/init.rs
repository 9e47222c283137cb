use clap::Args;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output;
use crate::config::HubConfig;
use crate::error::Result;

#[derive(Args)]
pub struct InitArgs {}

pub fn run(config: HubConfig, _args: &InitArgs, json: bool) -> Result<()> {
    let ctx = AppContext::init(config)?;
    let path = ctx.config.database.path.display().to_string();
    let version = ctx.db.schema_version();

    if json {
        return output::emit_json(&json!({
            "database": path,
            "schema_version": version,
        }));
    }
    output::success(&format!("database ready at {path} (schema v{version})"));
    Ok(())
}
