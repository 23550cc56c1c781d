use ds_config::DsConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &DsConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &DsConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.github.is_configured() && has_single_underscore_key(&env_keys, "DIFFSHAME_GITHUB")
    {
        warnings.push(
            "GitHub config appears default while DIFFSHAME_GITHUB_* env vars exist. Use double underscores (example: DIFFSHAME_GITHUB__TOKEN)."
                .to_string(),
        );
    }

    if !config.gemini.is_configured() && has_single_underscore_key(&env_keys, "DIFFSHAME_GEMINI")
    {
        warnings.push(
            "Gemini config appears default while DIFFSHAME_GEMINI_* env vars exist. Use double underscores (example: DIFFSHAME_GEMINI__API_KEY)."
                .to_string(),
        );
    }

    warnings
}

/// `DIFFSHAME_GITHUB_TOKEN` matches, `DIFFSHAME_GITHUB__TOKEN` does not.
fn has_single_underscore_key(keys: &[String], section: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(section)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}

#[cfg(test)]
mod tests {
    use ds_config::{DsConfig, GeminiConfig, GitHubConfig};

    use super::collect_unconfigured_warnings;

    fn env(keys: &[&str]) -> Vec<(String, String)> {
        keys.iter()
            .map(|key| ((*key).to_string(), "value".to_string()))
            .collect()
    }

    #[test]
    fn warns_for_single_underscore_keys() {
        let warnings = collect_unconfigured_warnings(
            &DsConfig::default(),
            env(&["DIFFSHAME_GITHUB_TOKEN", "DIFFSHAME_GEMINI_API_KEY"]),
        );

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("DIFFSHAME_GITHUB__TOKEN"));
    }

    #[test]
    fn partial_double_underscore_config_is_not_a_typo() {
        let warnings = collect_unconfigured_warnings(
            &DsConfig::default(),
            env(&["DIFFSHAME_GITHUB__OWNER", "DIFFSHAME_LOG"]),
        );

        assert!(warnings.is_empty());
    }

    #[test]
    fn does_not_warn_when_sections_are_configured() {
        let config = DsConfig {
            github: GitHubConfig {
                token: "ghp_abc".to_string(),
                owner: "someone".to_string(),
                repo: "room".to_string(),
                ..Default::default()
            },
            gemini: GeminiConfig {
                api_key: "AIza".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let warnings = collect_unconfigured_warnings(
            &config,
            env(&["DIFFSHAME_GITHUB_TOKEN", "DIFFSHAME_GEMINI_API_KEY"]),
        );

        assert!(warnings.is_empty());
    }
}
