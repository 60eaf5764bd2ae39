//! 角色定义
//!
//! 用户在一次二维码传输中扮演的角色，以及供选择器展示的固定角色目录。

use crate::error::RoleError;
use std::fmt;

/// 传输角色
///
/// 数值与选项元素的 `value` 属性一一对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Role {
    Sender = 0,
    Receiver = 1,
    /// 初始哨兵值，不是可选项
    #[default]
    Undefined = 2,
}

impl Role {
    /// 获取数值
    pub fn value(self) -> u8 {
        self as u8
    }

    /// 获取显示名称
    pub fn label(self) -> &'static str {
        match self {
            Role::Sender => "发送者",
            Role::Receiver => "接收者",
            Role::Undefined => "未选择",
        }
    }

    /// 是否可以由用户选择
    pub fn is_selectable(self) -> bool {
        !matches!(self, Role::Undefined)
    }

    /// 从选项元素的 `value` 属性解析
    ///
    /// 只接受可选角色，`Undefined` 会被拒绝。
    pub fn from_option_value(value: &str) -> Result<Self, RoleError> {
        let raw: u8 = value
            .trim()
            .parse()
            .map_err(|_| RoleError::InvalidOptionValue(value.to_string()))?;
        let role = Role::try_from(raw)?;
        if !role.is_selectable() {
            return Err(RoleError::NotSelectable(raw));
        }
        Ok(role)
    }
}

impl TryFrom<u8> for Role {
    type Error = RoleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Sender),
            1 => Ok(Role::Receiver),
            2 => Ok(Role::Undefined),
            other => Err(RoleError::InvalidValue(other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 选择器中的一个选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleOption {
    pub label: &'static str,
    pub value: Role,
}

/// 角色目录，顺序决定选项的渲染顺序
pub static ROLE_CATALOG: [RoleOption; 2] = [
    RoleOption {
        label: "发送者",
        value: Role::Sender,
    },
    RoleOption {
        label: "接收者",
        value: Role::Receiver,
    },
];
