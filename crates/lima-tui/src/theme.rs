//! Light/dark color palettes.
//!
//! Every color the renderer uses comes through here so that toggling
//! the theme twice restores the exact original assignments.

use lima_client::VmStatus;
use ratatui::style::{Color, Modifier, Style};

/// Current palette. Light is the default, matching terminals with a
/// white background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    light: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self { light: true }
    }
}

impl Theme {
    /// Flip between light and dark.
    pub fn toggle(&mut self) {
        self.light = !self.light;
    }

    /// Whether the light palette is active.
    #[must_use]
    pub fn is_light(&self) -> bool {
        self.light
    }

    /// Default foreground for table cells and panel text.
    #[must_use]
    pub fn text(&self) -> Color {
        if self.light { Color::Black } else { Color::White }
    }

    /// Background for every widget.
    #[must_use]
    pub fn background(&self) -> Color {
        if self.light { Color::White } else { Color::Black }
    }

    /// Style of the table header row.
    #[must_use]
    pub fn header(&self) -> Style {
        let bg = if self.light { Color::DarkGray } else { Color::Green };
        Style::default()
            .fg(Color::White)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of the selected table row.
    #[must_use]
    pub fn selection(&self) -> Style {
        let style = if self.light {
            Style::default().fg(Color::White).bg(Color::Blue)
        } else {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        };
        style.add_modifier(Modifier::BOLD)
    }

    /// Foreground for block titles.
    #[must_use]
    pub fn title(&self) -> Color {
        if self.light { Color::Blue } else { Color::Cyan }
    }

    /// Style of the status bar line.
    #[must_use]
    pub fn status_bar(&self) -> Style {
        if self.light {
            Style::default().fg(Color::DarkGray).bg(Color::White)
        } else {
            Style::default().fg(Color::Gray).bg(Color::Black)
        }
    }

    /// Foreground for a status cell, by status category.
    #[must_use]
    pub fn status_color(&self, status: &VmStatus) -> Color {
        match status {
            VmStatus::Running => Color::Green,
            VmStatus::Stopped => Color::Red,
            VmStatus::Starting => Color::Yellow,
            VmStatus::Stopping => Color::LightYellow,
            VmStatus::Other(_) => self.text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_colors(theme: &Theme) -> Vec<Color> {
        let statuses = [
            VmStatus::Running,
            VmStatus::Stopped,
            VmStatus::Starting,
            VmStatus::Stopping,
            VmStatus::Other("Broken".into()),
        ];
        let mut colors = vec![theme.text(), theme.background(), theme.title()];
        colors.extend(statuses.iter().map(|s| theme.status_color(s)));
        colors
    }

    #[test]
    fn defaults_to_light() {
        assert!(Theme::default().is_light());
    }

    #[test]
    fn toggle_twice_restores_all_assignments() {
        let original = Theme::default();
        let mut theme = original;
        theme.toggle();
        assert_ne!(all_colors(&original), all_colors(&theme));
        assert_ne!(original.header(), theme.header());
        theme.toggle();
        assert_eq!(all_colors(&original), all_colors(&theme));
        assert_eq!(original.header(), theme.header());
        assert_eq!(original.selection(), theme.selection());
        assert_eq!(original.status_bar(), theme.status_bar());
    }

    #[test]
    fn status_colors_by_category() {
        let theme = Theme::default();
        assert_eq!(theme.status_color(&VmStatus::Running), Color::Green);
        assert_eq!(theme.status_color(&VmStatus::Stopped), Color::Red);
        assert_eq!(theme.status_color(&VmStatus::Starting), Color::Yellow);
        assert_eq!(
            theme.status_color(&VmStatus::Other("Paused".into())),
            theme.text()
        );
    }
}
