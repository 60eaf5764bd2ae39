//! Application state

use qrtransfer_core::{AppSettings, LogEntry, LogLevel, Role, RoleSelector, SelectionWiring};
use tokio::sync::mpsc;

const MAX_LOGS: usize = 500;

/// 异步事件 (来自日志层)
#[derive(Debug)]
pub enum AppEvent {
    LogMessage { level: String, message: String },
}

/// 渲染树中的一个选项，供列表控件使用
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRow {
    pub value: String,
    pub label: String,
}

pub struct App {
    pub selector: RoleSelector,
    /// 列表控件的高亮位置，默认第一项
    pub highlighted: usize,
    pub logs: Vec<LogEntry>,
    pub log_level: LogLevel,
    pub event_tx: mpsc::Sender<AppEvent>,
    event_rx: mpsc::Receiver<AppEvent>,
}

impl App {
    pub fn new(settings: &AppSettings) -> Self {
        let (event_tx, event_rx) = mpsc::channel(256);
        let log_level = if settings.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };

        let mut app = Self {
            selector: RoleSelector::with_wiring(settings.selection_wiring),
            highlighted: 0,
            logs: Vec::new(),
            log_level,
            event_tx,
            event_rx,
        };
        app.add_log(LogLevel::Info, "QR Transfer TUI 启动");
        app.add_log(
            LogLevel::Info,
            "按 ↑/↓ 选择角色, Enter 确认, 'w' 切换处理方式, 'q' 退出",
        );
        app
    }

    /// 从渲染出的 UI 树中提取选项
    pub fn option_rows(&self) -> Vec<OptionRow> {
        self.selector
            .render()
            .elements()
            .filter(|e| e.tag == "option")
            .map(|e| OptionRow {
                value: e.attribute("value").unwrap_or_default().to_string(),
                label: e.text_content(),
            })
            .collect()
    }

    pub fn current_role(&self) -> Role {
        self.selector.current_role()
    }

    pub fn wiring(&self) -> SelectionWiring {
        self.selector.wiring()
    }

    pub fn next_option(&mut self) {
        let len = self.option_rows().len();
        if len > 0 {
            self.highlighted = (self.highlighted + 1) % len;
        }
    }

    pub fn previous_option(&mut self) {
        let len = self.option_rows().len();
        if len > 0 {
            self.highlighted = self.highlighted.checked_sub(1).unwrap_or(len - 1);
        }
    }

    /// 提交高亮的选项，相当于下拉框的 change 事件
    pub fn commit_selection(&mut self) {
        let Some(row) = self.option_rows().into_iter().nth(self.highlighted) else {
            return;
        };

        let before = self.selector.current_role();
        let after = self.selector.on_option_value_changed(&row.value);

        if before == after {
            if self.wiring() == SelectionWiring::DisplayOnly {
                self.add_log(
                    LogLevel::Warn,
                    format!("选择了 {}，但选择器仅展示，角色未改变", row.label),
                );
            }
        } else {
            self.add_log(LogLevel::Info, format!("当前角色: {after}"));
        }
    }

    pub fn toggle_wiring(&mut self) {
        let wiring = self.wiring().toggled();
        self.selector.set_wiring(wiring);
        self.add_log(LogLevel::Info, format!("处理方式切换为: {}", wiring.name()));
    }

    pub fn toggle_log_level(&mut self) {
        self.log_level = self.log_level.toggled_verbosity();
        self.add_log(LogLevel::Info, format!("日志级别: {}", self.log_level));
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    pub fn add_log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(LogEntry::new(level, message));
        if self.logs.len() > MAX_LOGS {
            let overflow = self.logs.len() - MAX_LOGS;
            self.logs.drain(..overflow);
        }
    }

    /// 当前显示级别下可见的日志
    pub fn visible_logs(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.logs.iter().filter(|e| e.level <= self.log_level)
    }

    /// 处理积压的异步事件
    pub fn tick(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::LogMessage { level, message } => {
                    let level = level.parse().unwrap_or(LogLevel::Info);
                    self.add_log(level, message);
                }
            }
        }
    }
}
