//! 角色选择器组件
//!
//! 以下拉框形式展示 [`ROLE_CATALOG`]，并记录当前选中的角色。
//!
//! 选择事件有两条处理路径，由 [`SelectionWiring`] 决定:
//! - `DisplayOnly`: 仅展示，选择事件不影响当前角色 (默认)
//! - `Wired`: 选择事件更新当前角色

use crate::role::{ROLE_CATALOG, Role, RoleOption};
use crate::view::Element;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// 选择事件的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionWiring {
    #[default]
    DisplayOnly,
    Wired,
}

impl SelectionWiring {
    /// 获取显示名称
    pub fn name(self) -> &'static str {
        match self {
            SelectionWiring::DisplayOnly => "仅展示",
            SelectionWiring::Wired => "已连接",
        }
    }

    /// 切换到另一条路径
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SelectionWiring::DisplayOnly => SelectionWiring::Wired,
            SelectionWiring::Wired => SelectionWiring::DisplayOnly,
        }
    }
}

/// 角色选择器
#[derive(Debug, Clone, Default)]
pub struct RoleSelector {
    current: Role,
    wiring: SelectionWiring,
}

impl RoleSelector {
    /// 创建仅展示的选择器
    pub fn new() -> Self {
        Self::default()
    }

    /// 以指定的处理方式创建，初始角色仍为未选择
    pub fn with_wiring(wiring: SelectionWiring) -> Self {
        Self {
            current: Role::Undefined,
            wiring,
        }
    }

    /// 当前角色
    pub fn current_role(&self) -> Role {
        self.current
    }

    /// 角色目录
    pub fn role_catalog() -> &'static [RoleOption] {
        &ROLE_CATALOG
    }

    /// 当前的处理方式
    pub fn wiring(&self) -> SelectionWiring {
        self.wiring
    }

    /// 切换处理方式，当前角色保持不变
    pub fn set_wiring(&mut self, wiring: SelectionWiring) {
        self.wiring = wiring;
    }

    /// 渲染为 `select` 元素
    ///
    /// 每个目录项对应一个 `option`，`value` 为角色数值，文本为角色名称。
    /// 不设置 `selected` 属性。
    pub fn render(&self) -> Element {
        Self::role_catalog()
            .iter()
            .fold(Element::new("select"), |select, option| {
                select.child(
                    Element::new("option")
                        .attr("value", option.value.value().to_string())
                        .text(option.label),
                )
            })
    }

    /// 选择变更事件
    ///
    /// 返回处理后的当前角色。
    pub fn on_selection_changed(&mut self, new_role: Role) -> Role {
        match self.wiring {
            SelectionWiring::DisplayOnly => {
                debug!("Selection of {new_role:?} ignored: selector is display-only");
            }
            SelectionWiring::Wired if !new_role.is_selectable() => {
                warn!("Ignoring selection of non-selectable role {new_role:?}");
            }
            SelectionWiring::Wired => {
                debug!("Role changed: {:?} -> {:?}", self.current, new_role);
                self.current = new_role;
            }
        }
        self.current
    }

    /// 以选项元素的 `value` 属性触发选择变更
    pub fn on_option_value_changed(&mut self, value: &str) -> Role {
        match Role::from_option_value(value) {
            Ok(role) => self.on_selection_changed(role),
            Err(e) => {
                warn!("Ignoring selection event: {e}");
                self.current
            }
        }
    }
}
