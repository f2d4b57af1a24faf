use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

/// Hauteur réservée à la barre de statut.
pub const STATUS_HEIGHT: u16 = 1;

/// État affiché dans la barre de statut.
pub struct StatusInfo<'a> {
    /// FPS moyen mesuré.
    pub fps: f64,
    /// Nom de la palette active (preset ou "custom").
    pub palette_name: &'a str,
    /// Nombre d'entrées de la palette.
    pub palette_len: usize,
    /// Threshold de dither courant.
    pub threshold: f32,
    /// Dither actif ou non.
    pub dither: bool,
    /// Animation en pause.
    pub paused: bool,
}

/// Construit la ligne de statut. Séparée du draw pour rester testable.
#[must_use]
pub fn status_line(info: &StatusInfo<'_>) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let accent = Style::default().fg(Color::Cyan);

    let mut spans = vec![
        Span::styled(format!(" {:>5.1} fps ", info.fps), accent),
        Span::styled("│ ", dim),
        Span::styled(
            format!("{} ({}) ", info.palette_name, info.palette_len),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled("│ ", dim),
        Span::styled(
            if info.dither {
                format!("dither {:.3} ", info.threshold)
            } else {
                "dither off ".to_string()
            },
            accent,
        ),
    ];
    if info.paused {
        spans.push(Span::styled("│ ", dim));
        spans.push(Span::styled(
            "PAUSED ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled("│ ? help  q quit", dim));
    Line::from(spans)
}

/// Dessine la barre de statut sur une ligne.
pub fn draw_status(frame: &mut Frame<'_>, area: Rect, info: &StatusInfo<'_>) {
    frame.render_widget(Paragraph::new(status_line(info)), area);
}

/// Dessine l'overlay d'aide centré (touche ?).
pub fn draw_help(frame: &mut Frame<'_>, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from("  q / Esc     quit"),
        Line::from("  Space       pause / resume orbit"),
        Line::from("  p / P       next / previous palette preset"),
        Line::from("  + / -       raise / lower dither threshold"),
        Line::from("  d           toggle dither"),
        Line::from("  ← → ↑ ↓     nudge orbit azimuth / elevation"),
        Line::from("  s           toggle status bar"),
        Line::from("  ?           close this help"),
        Line::from(""),
    ];
    let height = (lines.len() as u16 + 2).min(area.height);
    let width = 44.min(area.width);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" ditherglass "),
        ),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(info: &StatusInfo<'_>) -> String {
        status_line(info)
            .spans
            .iter()
            .map(|s| s.content.clone().into_owned())
            .collect()
    }

    #[test]
    fn status_line_shows_palette_and_threshold() {
        let info = StatusInfo {
            fps: 29.7,
            palette_name: "glass",
            palette_len: 8,
            threshold: 0.03,
            dither: true,
            paused: false,
        };
        let text = rendered(&info);
        assert!(text.contains("glass (8)"));
        assert!(text.contains("dither 0.030"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn status_line_flags_pause_and_dither_off() {
        let info = StatusInfo {
            fps: 0.0,
            palette_name: "mono",
            palette_len: 2,
            threshold: 0.5,
            dither: false,
            paused: true,
        };
        let text = rendered(&info);
        assert!(text.contains("dither off"));
        assert!(text.contains("PAUSED"));
    }
}
