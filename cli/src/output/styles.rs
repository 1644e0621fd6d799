//! Stylesheet for the progress markers.

use owo_colors::Style;

/// One style per message kind. `Default` is the uncolored sheet.
#[derive(Default, Clone, Copy)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub info: Style,
    pub step: Style,
    pub header: Style,
}

impl Styles {
    /// The colored sheet used on an interactive terminal.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            info: Style::new().blue(),
            step: Style::new().cyan(),
            header: Style::new().bold().cyan(),
        }
    }
}
