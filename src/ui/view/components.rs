//! 通用 UI 组件
//!
//! 弹窗、下拉框、按钮等通用组件

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::models::LoadState;

pub const ACCENT: Color = Color::Rgb(0x34, 0xCB, 0x79);

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str, color: Color) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [组件] 下拉框：显示当前值、加载状态与展开箭头
pub fn render_select_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    is_placeholder: bool,
    state: &LoadState,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let value_style = if is_placeholder {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };

    let status = match state {
        LoadState::Loading => Span::styled(" carregando…", Style::default().fg(Color::Yellow)),
        LoadState::Failed(_) => Span::styled(" erro [r]", Style::default().fg(Color::Red)),
        LoadState::Idle | LoadState::Loaded(_) => Span::raw(""),
    };

    let line = Line::from(vec![
        Span::styled(value.to_string(), value_style),
        status,
        Span::styled("  ▾", Style::default().fg(Color::Gray)),
    ]);

    let field = Paragraph::new(line)
        .block(Block::default().title(title).borders(Borders::ALL).border_style(border_style));
    frame.render_widget(field, area);
}

/// [组件] 主按钮
pub fn render_button(frame: &mut Frame, area: Rect, label: &str, is_focused: bool) {
    let style = if is_focused {
        Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT)
    };

    let button = Paragraph::new(format!("→  {}", label))
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(ACCENT)));
    frame.render_widget(button, area);
}
