//! 房间池
//!
//! 按名称管理房间。创建房间时生成密码，修改和删除房间都需要校验密码。

use super::Room;
use crate::config::AppSettings;
use crate::error::RoomError;
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// 房间密码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomPassword(pub u32);

impl RoomPassword {
    pub fn random() -> Self {
        Self(rand::random())
    }
}

impl fmt::Display for RoomPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct RoomEntry {
    room: Room,
    password: RoomPassword,
}

/// 房间池
#[derive(Clone)]
pub struct RoomPool {
    rooms: Arc<Mutex<HashMap<String, RoomEntry>>>,
    max_idle: Duration,
}

impl RoomPool {
    pub fn new(max_idle: Duration) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            max_idle,
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(settings.room_idle_timeout())
    }

    /// 创建房间，返回随机生成的密码
    pub async fn create_room(&self, name: &str) -> Result<RoomPassword, RoomError> {
        let password = RoomPassword::random();
        self.create_room_with_password(name, password).await?;
        Ok(password)
    }

    /// 使用指定密码创建房间
    pub async fn create_room_with_password(
        &self,
        name: &str,
        password: RoomPassword,
    ) -> Result<(), RoomError> {
        let room = {
            let mut rooms = self.rooms.lock().await;
            if rooms.contains_key(name) {
                return Err(RoomError::AlreadyExists(name.to_string()));
            }
            let room = Room::spawn(self.max_idle);
            rooms.insert(
                name.to_string(),
                RoomEntry {
                    room: room.clone(),
                    password,
                },
            );
            room
        };

        info!("Room created: {}", name);
        self.monitor(name.to_string(), room);
        Ok(())
    }

    /// 房间自行关闭 (例如空闲超时) 后从池中移除
    fn monitor(&self, name: String, room: Room) {
        let rooms = Arc::clone(&self.rooms);
        tokio::spawn(async move {
            room.closed().await;
            let mut rooms = rooms.lock().await;
            // 同名房间可能已被删除并重新创建
            if rooms.get(&name).is_some_and(|e| e.room.id() == room.id()) {
                rooms.remove(&name);
                debug!("Room removed from pool: {}", name);
            }
        });
    }

    /// 获取房间 (不校验密码)
    pub async fn get_room(&self, name: &str) -> Result<Room, RoomError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(name)
            .map(|e| e.room.clone())
            .ok_or_else(|| RoomError::NotFound(name.to_string()))
    }

    /// 获取房间并校验密码
    pub async fn authorize(&self, name: &str, password: RoomPassword) -> Result<Room, RoomError> {
        let rooms = self.rooms.lock().await;
        let entry = rooms
            .get(name)
            .ok_or_else(|| RoomError::NotFound(name.to_string()))?;
        if entry.password != password {
            return Err(RoomError::WrongPassword);
        }
        Ok(entry.room.clone())
    }

    /// 更新房间的二维码内容
    pub async fn update_qr_code(
        &self,
        name: &str,
        password: RoomPassword,
        code: impl Into<String>,
    ) -> Result<(), RoomError> {
        let room = self.authorize(name, password).await?;
        room.set_qr_code(code).await
    }

    /// 删除房间，已加入的客户端收到关闭事件
    pub async fn delete_room(&self, name: &str, password: RoomPassword) -> Result<(), RoomError> {
        let room = {
            let mut rooms = self.rooms.lock().await;
            let entry = rooms
                .get(name)
                .ok_or_else(|| RoomError::NotFound(name.to_string()))?;
            if entry.password != password {
                return Err(RoomError::WrongPassword);
            }
            rooms
                .remove(name)
                .map(|e| e.room)
                .ok_or_else(|| RoomError::NotFound(name.to_string()))?
        };

        room.close().await;
        info!("Room deleted: {}", name);
        Ok(())
    }

    /// 所有房间名称 (已排序)
    pub async fn room_names(&self) -> Vec<String> {
        let rooms = self.rooms.lock().await;
        let mut names: Vec<String> = rooms.keys().cloned().collect();
        names.sort();
        names
    }
}
