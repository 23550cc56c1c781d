use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(flags, std::io::stdout().is_terminal()));
}

fn resolve(flags: &GlobalFlags, is_tty: bool) -> UiPrefs {
    let table_color = is_tty
        && flags.format == OutputFormat::Table
        && !flags.quiet
        && std::env::var_os("NO_COLOR").is_none();

    let progress = is_tty && !flags.quiet && flags.format != OutputFormat::Json;

    let term_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        table_color,
        progress,
        term_width,
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        progress: false,
        term_width: None,
    })
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::cli::{GlobalFlags, OutputFormat};

    fn flags(format: OutputFormat, quiet: bool) -> GlobalFlags {
        GlobalFlags {
            format,
            quiet,
            verbose: false,
            project: None,
        }
    }

    #[test]
    fn no_decoration_without_a_terminal() {
        let prefs = resolve(&flags(OutputFormat::Table, false), false);
        assert!(!prefs.table_color);
        assert!(!prefs.progress);
    }

    #[test]
    fn json_output_never_shows_progress() {
        let prefs = resolve(&flags(OutputFormat::Json, false), true);
        assert!(!prefs.progress);
        assert!(!prefs.table_color);
    }

    #[test]
    fn quiet_suppresses_progress() {
        let prefs = resolve(&flags(OutputFormat::Table, true), true);
        assert!(!prefs.progress);
    }
}
