use clap::Args;
use console::style;
use serde_json::json;

use crate::app::AppContext;
use crate::browse::FilterSet;
use crate::cli::output;
use crate::config::HubConfig;
use crate::content::ContentKind;
use crate::error::{HubError, Result};

#[derive(Args)]
pub struct ChoicesArgs {
    /// Show only this facet (omit to list every facet)
    pub facet: Option<String>,

    /// Show the facets of this kind's listing instead of the unscoped one
    #[arg(long)]
    pub kind: Option<ContentKind>,
}

pub fn run(config: HubConfig, args: &ChoicesArgs, json: bool) -> Result<()> {
    let ctx = AppContext::open(config)?;
    let set = FilterSet::for_kind(args.kind);
    let mut facets = set.all_choices(&ctx.filter_ctx())?;

    if let Some(wanted) = &args.facet {
        facets.retain(|(name, _)| *name == wanted.as_str());
        if facets.is_empty() {
            return Err(HubError::UnknownFilter(wanted.clone()));
        }
    }

    if json {
        let doc: Vec<_> = facets
            .iter()
            .map(|(name, choices)| json!({ "facet": name, "choices": choices }))
            .collect();
        return output::emit_json(&doc);
    }

    for (name, choices) in &facets {
        output::heading(name);
        if choices.is_empty() {
            output::note("  (free text)");
            continue;
        }
        for choice in choices {
            println!("  {:<20} {}", style(&choice.value).cyan(), choice.label);
        }
    }
    Ok(())
}
