use clap::Args;
use console::style;
use serde_json::json;

use crate::app::AppContext;
use crate::browse::{Audience, BrowseRequest, FilterSet};
use crate::cli::output;
use crate::config::HubConfig;
use crate::content::ContentKind;
use crate::error::{HubError, Result};

#[derive(Args)]
pub struct BrowseArgs {
    /// Restrict the listing to one content kind (e.g. green-fund)
    #[arg(long)]
    pub kind: Option<ContentKind>,

    /// Browse as this audience
    #[arg(long, default_value = "member")]
    pub audience: Audience,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Sort key (see `hub choices sort` for the valid keys)
    #[arg(long)]
    pub sort: Option<String>,

    /// Only records with images
    #[arg(long)]
    pub gallery: bool,

    /// Sustainability topic slug
    #[arg(long)]
    pub topic: Vec<String>,

    /// Submitting organization id
    #[arg(long)]
    pub org: Vec<String>,

    /// Keyword tag slug; repeat to require several tags at once
    #[arg(long)]
    pub tag: Vec<String>,

    /// Enrollment bucket (lt_5000, 5k_10k, 10k_20k, gt_20k)
    #[arg(long)]
    pub fte: Vec<String>,

    /// Country ISO code
    #[arg(long)]
    pub country: Vec<String>,

    /// US state code
    #[arg(long)]
    pub state: Vec<String>,

    /// Canadian province code
    #[arg(long)]
    pub province: Vec<String>,

    /// Carnegie class
    #[arg(long = "institution-type")]
    pub institution_type: Vec<String>,

    /// Publication year
    #[arg(long)]
    pub year: Option<String>,

    /// Creation year
    #[arg(long)]
    pub created: Option<String>,

    /// Academic discipline id
    #[arg(long)]
    pub discipline: Vec<String>,

    /// Institutional office id
    #[arg(long)]
    pub office: Vec<String>,

    /// Academic program type id
    #[arg(long = "program-type")]
    pub program_type: Vec<String>,

    /// Course material type
    #[arg(long = "material-type")]
    pub material_type: Vec<String>,

    /// Course level
    #[arg(long = "course-level")]
    pub course_level: Vec<String>,

    /// Outreach material type
    #[arg(long = "outreach-type")]
    pub outreach_type: Vec<String>,

    /// Publication material type id
    #[arg(long = "publication-type")]
    pub publication_type: Vec<String>,

    /// Conference name id
    #[arg(long)]
    pub conference: Vec<String>,

    /// Green power installation id
    #[arg(long)]
    pub installation: Vec<String>,

    /// Green power ownership model
    #[arg(long)]
    pub ownership: Vec<String>,

    /// Green power project size bucket
    #[arg(long)]
    pub size: Vec<String>,

    /// Green fund student fee bucket
    #[arg(long)]
    pub fee: Vec<String>,

    /// Green fund annual budget bucket
    #[arg(long)]
    pub budget: Vec<String>,

    /// Green fund primary funding source id
    #[arg(long = "funding-source")]
    pub funding_source: Vec<String>,

    /// Revolving fund (yes/no)
    #[arg(long)]
    pub revolving: Vec<String>,

    /// Extra facet selection as NAME=VALUE, repeatable
    #[arg(short = 'f', long = "facet", value_name = "NAME=VALUE")]
    pub facets: Vec<String>,

    /// Show at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,
}

impl BrowseArgs {
    fn request(&self) -> Result<BrowseRequest> {
        let mut request = BrowseRequest::new(self.kind, self.audience);

        let single = [
            ("search", &self.search),
            ("sort", &self.sort),
            ("year", &self.year),
            ("created", &self.created),
        ];
        for (name, value) in single {
            if let Some(value) = value {
                request = request.with_param(name, value.clone());
            }
        }

        if self.gallery {
            request = request.with_param("gallery", "true");
        }

        let multi: [(&str, &[String]); 23] = [
            ("topic", &self.topic),
            ("org", &self.org),
            ("tag", &self.tag),
            ("fte", &self.fte),
            ("country", &self.country),
            ("state", &self.state),
            ("province", &self.province),
            ("institution-type", &self.institution_type),
            ("discipline", &self.discipline),
            ("office", &self.office),
            ("program-type", &self.program_type),
            ("material-type", &self.material_type),
            ("course-level", &self.course_level),
            ("outreach-type", &self.outreach_type),
            ("publication-type", &self.publication_type),
            ("conference", &self.conference),
            ("installation", &self.installation),
            ("ownership", &self.ownership),
            ("size", &self.size),
            ("fee", &self.fee),
            ("budget", &self.budget),
            ("funding-source", &self.funding_source),
            ("revolving", &self.revolving),
        ];
        for (name, values) in multi {
            for value in values {
                request = request.with_param(name, value.clone());
            }
        }

        for facet in &self.facets {
            let Some((name, value)) = facet.split_once('=') else {
                return Err(HubError::UnknownFilter(format!(
                    "facet '{facet}' is not NAME=VALUE"
                )));
            };
            request = request.with_param(name.trim(), value.trim());
        }
        Ok(request)
    }
}

pub fn run(config: HubConfig, args: &BrowseArgs, json: bool) -> Result<()> {
    let ctx = AppContext::open(config)?;
    let request = args.request()?;
    let set = FilterSet::for_kind(args.kind);
    let mut result = set.browse(&ctx.filter_ctx(), &ctx.gate, &request)?;
    if let Some(limit) = args.limit {
        result.records.truncate(limit);
    }

    if json {
        return output::emit_json(&json!({
            "total": result.total,
            "shown": result.records.len(),
            "records": result.records,
        }));
    }

    let listing = args.kind.map_or("all records", ContentKind::label);
    output::heading(&format!("{listing}: {} result(s)", result.total));
    for record in &result.records {
        let published = record
            .published
            .map_or_else(|| "unpublished".to_string(), |dt| dt.format("%Y-%m-%d").to_string());
        println!(
            "  {:>5}  {}  {}  {}",
            style(record.id).cyan(),
            style(format!("{:<20}", record.kind.slug())).dim(),
            style(&record.title).bold(),
            style(published).dim(),
        );
    }
    if result.records.len() < result.total {
        output::note(&format!(
            "({} more not shown)",
            result.total - result.records.len()
        ));
    }
    Ok(())
}
