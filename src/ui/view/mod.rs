//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::{Alert, App, AppMode, Dropdown, Field};
use crate::models::LoadState;
use components::{ACCENT, render_button, render_dialog_framework, render_select_field};
use layouts::centered_rect;

const HEADLINE: &str = "Seu marketplace de coleta de resíduos";
const DESCRIPTION: &str = "Ajudamos pessoas a encontrarem pontos de coleta de forma eficiente.";

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Min(4),    // 宣传语
            Constraint::Length(3), // 州
            Constraint::Length(3), // 城市
            Constraint::Length(3), // 按钮
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_hero(frame, chunks[1]);
    render_field(frame, app, Dropdown::Region, chunks[2]);
    render_field(frame, app, Dropdown::SubRegion, chunks[3]);
    render_button(frame, chunks[4], "Entrar", app.focus == Field::Submit);
    render_help(frame, app, chunks[5]);

    // 渲染弹窗
    match &app.mode {
        AppMode::Picking(dropdown) => render_picker_dialog(frame, app, *dropdown),
        AppMode::Alert(alert) => render_alert_dialog(frame, alert),
        AppMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("♻ Ecoleta")
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_hero(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            HEADLINE,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(DESCRIPTION, Style::default().fg(Color::Gray))),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), area);
}

fn render_field(frame: &mut Frame, app: &App, dropdown: Dropdown, area: Rect) {
    let (title, field) = match dropdown {
        Dropdown::Region => ("Estado", Field::Region),
        Dropdown::SubRegion => ("Cidade", Field::SubRegion),
    };
    let list = app.options_for(dropdown);
    let title = match list.state {
        LoadState::Loaded(_) => format!("{} ({})", title, list.len() - 1),
        _ => title.to_string(),
    };

    render_select_field(
        frame,
        area,
        &title,
        app.display_label(dropdown),
        app.selected_value(dropdown).is_empty(),
        &list.state,
        app.focus == field,
    );
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match &app.mode {
        AppMode::Normal => "[j/k] navegar  [Enter] abrir/entrar  [r] tentar novamente  [q] sair",
        AppMode::Picking(_) => "digite para filtrar  [↑/↓] mover  [Enter] escolher  [Esc] cancelar",
        AppMode::Alert(_) => "[Enter] fechar",
    };

    let status = match (&app.message, &app.regions.state) {
        (Some(message), _) => message.clone(),
        (None, LoadState::Loaded(at)) => format!("estados atualizados às {}", at.format("%H:%M")),
        (None, _) => String::new(),
    };

    let text = if status.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, status)
    };

    let style = if app.message.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    };

    let help = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_picker_dialog(frame: &mut Frame, app: &App, dropdown: Dropdown) {
    let title = match dropdown {
        Dropdown::Region => "Selecione o estado",
        Dropdown::SubRegion => "Selecione a cidade",
    };
    let area = centered_rect(60, 70, frame.area());
    let inner = render_dialog_framework(frame, area, title, ACCENT);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    let filter = Paragraph::new(app.picker.filter.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().title("Filtro").borders(Borders::ALL));
    frame.render_widget(filter, chunks[0]);

    let selected = app.selected_value(dropdown);
    let items: Vec<ListItem> = app
        .visible_options(dropdown)
        .iter()
        .map(|(_, option)| {
            let marker = if !option.is_placeholder() && option.value == selected {
                "✓ "
            } else {
                "  "
            };
            let style = if option.is_placeholder() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(
                format!("{}{}", marker, option.label),
                style,
            )))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
    );

    let mut state = ListState::default();
    state.select(Some(app.picker.cursor));

    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_alert_dialog(frame: &mut Frame, alert: &Alert) {
    let area = centered_rect(50, 25, frame.area());
    let inner = render_dialog_framework(frame, area, &alert.title, Color::Red);

    let dialog = Paragraph::new(format!("{}\n\n[Enter] OK", alert.message))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });

    frame.render_widget(dialog, inner);
}
