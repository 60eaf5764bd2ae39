//! QR Transfer TUI - 角色选择终端界面
//!
//! 使用 ratatui 挂载角色选择器，每一帧调用组件的渲染结果绘制列表。
//!
//! # 参数
//!
//! - `--wired`: 让选择事件更新当前角色 (覆盖配置文件)
//! - `-v, --verbose`: 日志面板显示 debug 级别
//!
//! # 日志
//!
//! 日志默认显示在 TUI 的日志面板中。
//! 如需输出到文件进行调试，设置 RUST_LOG 环境变量：
//!
//! ```bash
//! RUST_LOG=debug cargo run -p qrtransfer-tui 2>> /tmp/qrtransfer.log
//! ```

mod app;
mod tui_log;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use qrtransfer_core::{AppSettings, SelectionWiring};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, AppEvent};
use tui_log::TuiLogLayer;

#[derive(Parser, Debug)]
#[command(name = "qrtransfer-tui", version, about = "QR Transfer 角色选择终端界面")]
struct Args {
    /// 让选择事件更新当前角色
    #[arg(long)]
    wired: bool,

    /// 日志面板显示 debug 级别
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// 命令行参数覆盖配置文件
    fn apply(&self, settings: &mut AppSettings) {
        if self.wired {
            settings.selection_wiring = SelectionWiring::Wired;
        }
        if self.verbose {
            settings.verbose = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = AppSettings::load();
    args.apply(&mut settings);

    let app = App::new(&settings);

    // 初始化日志系统，发送到 TUI 日志面板
    init_logging(app.event_tx.clone());
    tracing::debug!("Settings: {:?}", settings);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// 初始化日志系统
///
/// - 总是将日志发送到 TUI 日志面板
/// - 如果设置了 RUST_LOG，同时输出到 stderr
fn init_logging(log_tx: tokio::sync::mpsc::Sender<AppEvent>) {
    // 桥接 log crate（qrtransfer-core 使用）到 tracing
    let _ = tracing_log::LogTracer::init();

    let tui_layer = TuiLogLayer::new(log_tx);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,qrtransfer_core=debug"));

    if std::env::var("RUST_LOG").is_ok() {
        use tracing_subscriber::fmt;

        let stderr_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tui_layer)
            .with(stderr_layer)
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tui_layer)
            .try_init();
    }
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        // 使用 poll 避免无限阻塞
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Up | KeyCode::Char('k') => app.previous_option(),
                KeyCode::Down | KeyCode::Char('j') => app.next_option(),
                KeyCode::Enter => app.commit_selection(),
                KeyCode::Char('w') => app.toggle_wiring(),
                KeyCode::Char('d') => app.toggle_log_level(),
                KeyCode::Char('c') => app.clear_logs(),
                _ => {}
            }
        }

        app.tick();
    }
}
