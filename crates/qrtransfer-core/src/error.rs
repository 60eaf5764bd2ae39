//! 错误类型

use thiserror::Error;

/// 角色解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    /// 数值不对应任何角色
    #[error("invalid role value: {0}")]
    InvalidValue(u8),
    /// 选项元素的 value 属性无法解析
    #[error("invalid option value: {0:?}")]
    InvalidOptionValue(String),
    /// 角色存在，但不是可选项 (例如 Undefined)
    #[error("role {0} is not selectable")]
    NotSelectable(u8),
}

/// 房间操作错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room name already exists: {0}")]
    AlreadyExists(String),
    #[error("could not get a non-exist room: {0}")]
    NotFound(String),
    #[error("wrong password")]
    WrongPassword,
    #[error("room is closed")]
    Closed,
}
