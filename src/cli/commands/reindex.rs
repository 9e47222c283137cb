use clap::Args;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output;
use crate::config::HubConfig;
use crate::error::Result;
use crate::search;

#[derive(Args)]
pub struct ReindexArgs {}

pub fn run(config: HubConfig, _args: &ReindexArgs, json: bool) -> Result<()> {
    let ctx = AppContext::open(config)?;
    let indexed = search::rebuild_index(&ctx.db)?;

    if json {
        return output::emit_json(&json!({ "indexed": indexed }));
    }
    output::success(&format!("indexed {indexed} record(s)"));
    Ok(())
}
