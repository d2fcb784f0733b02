//! 快捷键名称
//!
//! [`Name`] 是绑定快捷键的稳定标识；[`NameTable`] 维护进程内已声明的名称，
//! 只负责纯粹的声明与去重，默认值的持久化由注册表完成。

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::shortcut::Shortcut;

/// 快捷键名称
///
/// 相等性和哈希只比较 `raw_value`。默认快捷键在声明时确定，之后不变。
#[derive(Clone)]
pub struct Name {
    raw: Arc<str>,
    default: Option<Shortcut>,
}

impl Name {
    /// 构造名称（无副作用）
    ///
    /// 通常应通过 [`crate::registry::Registry::declare`] 获得名称。
    pub fn new(raw: impl Into<Arc<str>>, default: Option<Shortcut>) -> Self {
        Self {
            raw: raw.into(),
            default,
        }
    }

    pub fn raw_value(&self) -> &str {
        &self.raw
    }

    pub fn default_shortcut(&self) -> Option<Shortcut> {
        self.default
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Name").field(&&*self.raw).finish()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// 声明结果
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: Name,
    /// 是否为首次声明
    pub is_new: bool,
}

/// 已声明名称表，按声明顺序保存
#[derive(Debug, Default)]
pub struct NameTable {
    order: Vec<Name>,
    index: HashMap<Arc<str>, usize>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明名称
    ///
    /// 已声明时返回已有名称，忽略新的默认值（首次声明生效）。
    pub fn declare(&mut self, raw: &str, default: Option<Shortcut>) -> Declaration {
        if let Some(&position) = self.index.get(raw) {
            let existing = self.order[position].clone();
            if existing.default_shortcut() != default {
                tracing::warn!(
                    name = %existing,
                    "Shortcut name redeclared with a different default; keeping the first declaration"
                );
            }
            return Declaration {
                name: existing,
                is_new: false,
            };
        }

        let name = Name::new(raw, default);
        self.index.insert(Arc::clone(&name.raw), self.order.len());
        self.order.push(name.clone());
        tracing::debug!(name = %name, "Shortcut name declared");

        Declaration { name, is_new: true }
    }

    pub fn get(&self, raw: &str) -> Option<&Name> {
        self.index.get(raw).map(|&position| &self.order[position])
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.index.contains_key(name.raw_value())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 按声明顺序的快照
    pub fn snapshot(&self) -> NameList {
        NameList {
            names: self.order.iter().cloned().collect(),
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }
}

/// 名称快照
///
/// 有限、可重复遍历；之后的声明不会影响已取得的快照。
#[derive(Debug, Clone)]
pub struct NameList {
    names: Arc<[Name]>,
}

impl NameList {
    pub fn iter(&self) -> std::slice::Iter<'_, Name> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_slice(&self) -> &[Name] {
        &self.names
    }
}

impl<'a> IntoIterator for &'a NameList {
    type Item = &'a Name;
    type IntoIter = std::slice::Iter<'a, Name>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
