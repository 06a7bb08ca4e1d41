use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Terminal styles for appdb output
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    /// Table names in listings and import lines
    pub table: Style,
    /// CSV files that were read but not loaded
    pub skipped: Style,
}

impl Theme {
    /// Colored on an interactive terminal unless `NO_COLOR` is set
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::for_terminal(console::Term::stdout().is_term() && !no_color)
    }

    pub fn for_terminal(colored: bool) -> Self {
        if !colored {
            return Self::plain();
        }
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            table: Style::new().blue().bold(),
            skipped: Style::new().yellow().italic(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            table: Style::new(),
            skipped: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_theme_emits_no_escapes() {
        let theme = Theme::for_terminal(false);
        let rendered = "equipes".style(theme.table.clone()).to_string();
        assert_eq!(rendered, "equipes");
    }

    #[test]
    fn test_colored_theme_styles_tables() {
        let theme = Theme::for_terminal(true);
        let rendered = "equipes".style(theme.table.clone()).to_string();
        assert!(rendered.contains("equipes"));
        assert!(rendered.contains('\u{1b}'));
    }
}
