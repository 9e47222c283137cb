use clap::Args;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output;
use crate::config::HubConfig;
use crate::error::Result;
use crate::seed::seed_demo;

#[derive(Args)]
pub struct SeedArgs {}

pub fn run(config: HubConfig, _args: &SeedArgs, json: bool) -> Result<()> {
    let ctx = AppContext::open(config)?;
    let summary = seed_demo(&ctx)?;

    if json {
        return output::emit_json(&json!({
            "organizations": summary.organizations,
            "records": summary.records,
        }));
    }
    output::success(&format!(
        "seeded {} records across {} organizations",
        summary.records, summary.organizations
    ));
    Ok(())
}
