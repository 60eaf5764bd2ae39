//! UI rendering module

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::App;
use qrtransfer_core::{LogLevel, Role, SelectionWiring};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(6), // Selector
            Constraint::Min(5),    // Log
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_selector(frame, app, chunks[1]);
    draw_logs(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let role = app.current_role();
    let role_style = match role {
        Role::Undefined => Style::default().fg(Color::DarkGray),
        _ => Style::default().fg(Color::Yellow).bold(),
    };

    let line = Line::from(vec![
        Span::raw(" 当前角色: "),
        Span::styled(role.label(), role_style),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" QR Transfer "),
    );

    frame.render_widget(header, area);
}

fn draw_selector(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let current = app.current_role().value().to_string();
    let items: Vec<ListItem> = app
        .option_rows()
        .into_iter()
        .map(|row| {
            let marker = if row.value == current { "●" } else { "○" };
            ListItem::new(format!("{} {}", marker, row.label))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.highlighted));
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" 👤 选择角色 "))
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, chunks[0], &mut state);

    let help_text = match app.wiring() {
        SelectionWiring::DisplayOnly => "仅展示: 选择不会改变角色\n按 'w' 连接选择事件",
        SelectionWiring::Wired => "已连接: Enter 确认角色\n按 'w' 恢复仅展示",
    };

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title(" 帮助 "))
        .wrap(Wrap { trim: true });

    frame.render_widget(help, chunks[1]);
}

fn draw_logs(frame: &mut Frame, app: &App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let mut items: Vec<ListItem> = app
        .visible_logs()
        .rev()
        .take(height)
        .map(|entry| {
            let style = match entry.level {
                LogLevel::Error => Style::default().fg(Color::Red),
                LogLevel::Warn => Style::default().fg(Color::Yellow),
                LogLevel::Info => Style::default(),
                LogLevel::Debug | LogLevel::Trace => Style::default().fg(Color::DarkGray),
            };
            ListItem::new(entry.to_string()).style(style)
        })
        .collect();
    items.reverse();

    let title = format!(" 📋 日志 [{}] ", app.log_level);
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(list, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(format!(
        " {} │ [↑/↓]选择 [Enter]确认 [w]切换 [d]日志级别 [c]清空 [q]退出",
        app.wiring().name()
    ))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(status, area);
}
