use ds_config::DsConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct SectionRow {
    section: &'static str,
    status: &'static str,
    detail: String,
}

const fn status(configured: bool) -> &'static str {
    if configured { "configured" } else { "not configured" }
}

fn rows(config: &DsConfig) -> Vec<SectionRow> {
    let github = &config.github;
    let gemini = &config.gemini;
    vec![
        SectionRow {
            section: "github",
            status: status(github.is_configured()),
            detail: format!(
                "{}/{} @ {} ({})",
                or_dash(&github.owner),
                or_dash(&github.repo),
                github.branch().unwrap_or("default branch"),
                github.api_url
            ),
        },
        SectionRow {
            section: "gemini",
            status: status(gemini.is_configured()),
            detail: format!("{} with {}s deadline", gemini.model, gemini.timeout_secs),
        },
        SectionRow {
            section: "storage",
            status: "configured",
            detail: format!(
                "{} backend, local path {}",
                config.storage.backend, config.storage.local_path
            ),
        },
        SectionRow {
            section: "general",
            status: "configured",
            detail: format!(
                "data root '{}', sectors [{}], baseline {}",
                config.general.data_root,
                config.general.sectors.join(", "),
                if config.general.require_baseline {
                    "required"
                } else {
                    "optional"
                }
            ),
        },
    ]
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// `dsh config`: show which sections are set. Secrets are never printed.
pub fn handle(config: &DsConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&rows(config), flags.format)
}
