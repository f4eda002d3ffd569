//! Notification overlay in the top-right corner

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::wizard::{Level, Notification, Notifications};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

/// Rect of `width` x `height` anchored to the top-right of `r`, pushed down
/// by `offset` rows. None if it does not fit.
pub(crate) fn top_right_rect(width: u16, height: u16, offset: u16, r: Rect) -> Option<Rect> {
    let width = width.min(r.width);
    let y = r.y.checked_add(offset)?;
    if y + height > r.y + r.height {
        return None;
    }
    Some(Rect {
        x: r.x + r.width - width,
        y,
        width,
        height,
    })
}

fn color(level: Level) -> Color {
    match level {
        Level::Success => Color::Green,
        Level::Warning => Color::Yellow,
        Level::Error => Color::Red,
    }
}

fn render_one(frame: &mut Frame, area: Rect, notification: &Notification) {
    let color = color(notification.level);
    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", notification.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(notification.message.as_str())
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

/// Newest toast on top
pub fn render_notifications(frame: &mut Frame, area: Rect, notifications: &Notifications) {
    let newest_first: Vec<&Notification> = notifications.iter().collect();
    for (i, notification) in newest_first.into_iter().rev().enumerate() {
        let offset = 1 + i as u16 * TOAST_HEIGHT;
        let Some(rect) = top_right_rect(TOAST_WIDTH, TOAST_HEIGHT, offset, area) else {
            break;
        };
        render_one(frame, rect, notification);
    }
}
