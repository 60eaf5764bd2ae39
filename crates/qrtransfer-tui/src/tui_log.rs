//! TUI 日志层
//!
//! 自定义 tracing Layer，将日志转发到 TUI 的日志面板。

use crate::app::AppEvent;
use std::fmt;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// 转发日志到 TUI 的 Layer
pub struct TuiLogLayer {
    tx: mpsc::Sender<AppEvent>,
}

impl TuiLogLayer {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl<S> Layer<S> for TuiLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let message = visitor
            .message
            .or(visitor.first_field)
            .unwrap_or_else(|| event.metadata().target().to_string());

        // 面板来不及消费时丢弃，不阻塞调用方
        let _ = self.tx.try_send(AppEvent::LogMessage {
            level: event.metadata().level().to_string(),
            message,
        });
    }
}

/// 提取 `message` 字段，没有时退回第一个字段
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    first_field: Option<String>,
}

impl MessageVisitor {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else if self.first_field.is_none() {
            self.first_field = Some(format!("{}={}", field.name(), value));
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }
}
