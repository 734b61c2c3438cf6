use ratatui::style::Style;

#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub danger: Style,
    pub border: Style,
    /// Patched over everything outside a modal sheet while it is open.
    pub backdrop: Style,
    pub sheet: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().yellow(),
            danger: Style::default().red(),
            border: Style::default().yellow(),
            backdrop: Style::default().dim(),
            sheet: Style::default(),
        }
    }
}
