//! 应用配置
//!
//! 从 `~/.config/qrtransfer/settings.toml` 读取设置，文件缺失或无效时使用默认值。

use crate::selector::SelectionWiring;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 应用设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// 角色选择事件的处理方式
    pub selection_wiring: SelectionWiring,
    /// 房间空闲超时 (秒)
    pub room_idle_timeout_secs: u64,
    /// 详细日志模式
    pub verbose: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            selection_wiring: SelectionWiring::DisplayOnly,
            room_idle_timeout_secs: crate::room::DEFAULT_MAX_IDLE.as_secs(),
            verbose: false,
        }
    }
}

impl AppSettings {
    /// 获取配置文件路径
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("qrtransfer")
            .join("settings.toml")
    }

    /// 加载设置
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// 从指定文件加载设置
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    debug!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn room_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.room_idle_timeout_secs)
    }
}
