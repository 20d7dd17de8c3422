//! Styling helpers for the interactive UI

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::messages::MessageType;
use crate::grid::CellShade;

/// Cell style for a shade class
pub fn shade_style(shade: CellShade) -> Style {
    match shade {
        CellShade::Full => Style::default().fg(Color::Black).bg(Color::Green),
        CellShade::Partial => Style::default().fg(Color::Black).bg(Color::LightGreen),
        CellShade::Overload => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
        CellShade::Reserved => Style::default().fg(Color::Black).bg(Color::Yellow),
        CellShade::Vacation => Style::default().fg(Color::Black).bg(Color::LightBlue),
        CellShade::NonWorking => Style::default().fg(Color::DarkGray).bg(Color::Rgb(40, 40, 40)),
        CellShade::Empty => Style::default().fg(Color::Gray),
    }
}

/// Get style for message type
pub fn get_message_style(message_type: MessageType) -> Style {
    match message_type {
        MessageType::Info => Style::default().fg(Color::Cyan),
        MessageType::Warning => Style::default().fg(Color::Yellow),
    }
}

/// Label style used for "Key: value" lines
pub fn label_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Rectangle of the given size centered in `area`, clipped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(50, 10, area), Rect::new(25, 15, 50, 10));
        // larger than the area is clipped
        assert_eq!(centered_rect(200, 80, area), area);
    }

    #[test]
    fn test_overload_stands_out() {
        assert_eq!(shade_style(CellShade::Overload).bg, Some(Color::Red));
        assert_ne!(shade_style(CellShade::Full), shade_style(CellShade::Partial));
    }
}
