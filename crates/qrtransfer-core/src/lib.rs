//! QR Transfer Core Library
//!
//! 二维码传输的核心库: 角色选择模型与进程内的房间会话。
//!
//! # 模块
//!
//! - **role**: 发送者/接收者角色与固定的角色目录
//! - **selector**: 角色选择器组件
//! - **view**: 组件渲染出的 UI 树
//! - **room**: 房间与房间池，用于在发送端和接收端之间同步二维码内容
//! - **config**: 应用设置
//! - **logging**: UI 日志条目
//!
//! # 使用示例
//!
//! ## 角色选择
//!
//! ```
//! use qrtransfer_core::{Role, RoleSelector, SelectionWiring};
//!
//! let mut selector = RoleSelector::with_wiring(SelectionWiring::Wired);
//! assert_eq!(selector.current_role(), Role::Undefined);
//!
//! let html = selector.render().to_string();
//! assert!(html.starts_with("<select><option value=\"0\">发送者</option>"));
//!
//! selector.on_option_value_changed("1");
//! assert_eq!(selector.current_role(), Role::Receiver);
//! ```
//!
//! ## 房间
//!
//! ```ignore
//! use qrtransfer_core::{ClientEvent, RoomPool};
//!
//! let pool = RoomPool::new(Duration::from_secs(120));
//! let password = pool.create_room("room1").await?;
//!
//! // 接收端加入房间
//! let mut client = pool.get_room("room1").await?.join().await?;
//!
//! // 发送端更新二维码内容
//! pool.update_qr_code("room1", password, "payload").await?;
//! assert_eq!(client.recv().await, Some(ClientEvent::QrCodeChanged("payload".into())));
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod role;
pub mod room;
pub mod selector;
pub mod view;

pub use config::AppSettings;
pub use error::{RoleError, RoomError};
pub use logging::{LogEntry, LogLevel};
pub use role::{ROLE_CATALOG, Role, RoleOption};
pub use room::{ClientEvent, ClientId, Room, RoomClient, RoomPassword, RoomPool};
pub use selector::{RoleSelector, SelectionWiring};
pub use view::{Element, Node};
