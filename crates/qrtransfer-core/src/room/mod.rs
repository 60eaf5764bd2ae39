//! 房间
//!
//! 发送端把二维码内容发布到房间，加入房间的接收端收到变更通知。
//!
//! 每个房间是一个独立的 tokio 任务，[`Room`] 只是通过命令通道与其通信的句柄。
//! 超过 `max_idle` 没有收到任何命令时房间自动关闭。

mod pool;
#[cfg(test)]
mod tests;

pub use pool::{RoomPassword, RoomPool};

use crate::error::RoomError;
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// 默认空闲超时
pub const DEFAULT_MAX_IDLE: Duration = Duration::from_secs(120);

const COMMAND_BUFFER: usize = 32;

/// 客户端 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 房间推送给客户端的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// 二维码内容已更新
    QrCodeChanged(String),
    /// 房间已关闭
    Closed,
}

enum RoomCommand {
    Join {
        id: ClientId,
        events: mpsc::UnboundedSender<ClientEvent>,
    },
    Leave(ClientId),
    SetQrCode(String),
    GetQrCode(oneshot::Sender<String>),
    ClientCount(oneshot::Sender<usize>),
    Close,
}

/// 房间句柄
#[derive(Clone)]
pub struct Room {
    id: Uuid,
    commands: mpsc::Sender<RoomCommand>,
    closed: CancellationToken,
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Room {
    /// 在当前 tokio 运行时上启动房间
    pub fn spawn(max_idle: Duration) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let closed = CancellationToken::new();
        let id = Uuid::new_v4();

        let actor = RoomActor {
            id,
            max_idle,
            qr_code: String::new(),
            clients: HashMap::new(),
            commands: rx,
        };
        tokio::spawn(actor.run(closed.clone()));

        Self {
            id,
            commands: tx,
            closed,
        }
    }

    /// 房间实例 ID，同名的新房间 ID 不同
    pub fn id(&self) -> Uuid {
        self.id
    }

    async fn send(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RoomError::Closed)
    }

    /// 加入房间
    pub async fn join(&self) -> Result<RoomClient, RoomError> {
        let id = ClientId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.send(RoomCommand::Join { id, events: tx }).await?;
        Ok(RoomClient { id, events: rx })
    }

    /// 离开房间
    pub async fn leave(&self, id: ClientId) -> Result<(), RoomError> {
        self.send(RoomCommand::Leave(id)).await
    }

    /// 更新二维码内容并通知所有客户端
    pub async fn set_qr_code(&self, code: impl Into<String>) -> Result<(), RoomError> {
        self.send(RoomCommand::SetQrCode(code.into())).await
    }

    /// 当前二维码内容
    pub async fn qr_code(&self) -> Result<String, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.send(RoomCommand::GetQrCode(tx)).await?;
        rx.await.map_err(|_| RoomError::Closed)
    }

    pub async fn client_count(&self) -> Result<usize, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.send(RoomCommand::ClientCount(tx)).await?;
        rx.await.map_err(|_| RoomError::Closed)
    }

    /// 关闭房间，对已关闭的房间无效果
    pub async fn close(&self) {
        if self.send(RoomCommand::Close).await.is_ok() {
            self.closed().await;
        }
    }

    /// 等待房间关闭
    pub async fn closed(&self) {
        self.closed.cancelled().await;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}

/// 已加入房间的客户端
#[derive(Debug)]
pub struct RoomClient {
    id: ClientId,
    events: mpsc::UnboundedReceiver<ClientEvent>,
}

impl RoomClient {
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// 等待下一个事件，房间任务结束后返回 `None`
    pub async fn recv(&mut self) -> Option<ClientEvent> {
        self.events.recv().await
    }

    /// 非阻塞读取事件
    pub fn try_recv(&mut self) -> Option<ClientEvent> {
        self.events.try_recv().ok()
    }
}

struct RoomActor {
    id: Uuid,
    max_idle: Duration,
    qr_code: String,
    clients: HashMap<ClientId, mpsc::UnboundedSender<ClientEvent>>,
    commands: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self, closed: CancellationToken) {
        debug!("Room {} started", self.id);
        let mut deadline = self.next_deadline();

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    if !self.handle(command) {
                        info!("Room {} closed", self.id);
                        break;
                    }
                    deadline = self.next_deadline();
                }
                () = idle_expired(deadline) => {
                    info!("Room {} idle for {:?}, closing", self.id, self.max_idle);
                    break;
                }
            }
        }

        // 先关闭命令通道，之后的命令立即失败
        self.commands.close();
        for events in self.clients.values() {
            let _ = events.send(ClientEvent::Closed);
        }
        closed.cancel();
    }

    /// 超时过大无法表示时不设截止时间
    fn next_deadline(&self) -> Option<Instant> {
        Instant::now().checked_add(self.max_idle)
    }

    /// 返回 false 表示房间应当关闭
    fn handle(&mut self, command: RoomCommand) -> bool {
        match command {
            RoomCommand::Join { id, events } => {
                debug!("Client {} joined room {}", id, self.id);
                self.clients.insert(id, events);
            }
            RoomCommand::Leave(id) => {
                debug!("Client {} left room {}", id, self.id);
                self.clients.remove(&id);
            }
            RoomCommand::SetQrCode(code) => {
                // 顺便清理已断开的客户端
                self.clients
                    .retain(|_, events| events.send(ClientEvent::QrCodeChanged(code.clone())).is_ok());
                self.qr_code = code;
            }
            RoomCommand::GetQrCode(reply) => {
                let _ = reply.send(self.qr_code.clone());
            }
            RoomCommand::ClientCount(reply) => {
                let _ = reply.send(self.clients.len());
            }
            RoomCommand::Close => return false,
        }
        true
    }
}

async fn idle_expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
