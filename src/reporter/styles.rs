pub use console::{Style, StyledObject, Term};

pub struct Styles {
    pub style_heading: Style,
    pub style_principal: Style,
    pub style_action: Style,
    pub style_error: Style,
    pub style_notice: Style,
}

impl Styles {
    /// Styles for output written to `term`. Color is only applied when
    /// requested and `term` is an attended terminal.
    pub fn for_term(use_color: bool, term: &Term) -> Self {
        Self::new(use_color && term.is_term())
    }

    pub fn new(styles_enabled: bool) -> Self {
        Self {
            style_heading: Style::new().bold().green().force_styling(styles_enabled),
            style_principal: Style::new().bright().cyan().force_styling(styles_enabled),
            style_action: Style::new().yellow().force_styling(styles_enabled),
            style_error: Style::new().bold().red().force_styling(styles_enabled),
            style_notice: Style::new().cyan().force_styling(styles_enabled),
        }
    }
}
