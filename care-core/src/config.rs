use serde::{Deserialize, Serialize};

use crate::context::{DEFAULT_HIERARCHY_SEPARATOR, GROUP_SEPARATOR};
use crate::CareError;

/// Cấu hình phạm vi phím tắt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShortcutConfig {
    /// Ký tự phân cách giữa các cấp trong một đường dẫn phạm vi.
    pub hierarchy_separator: String,
    /// Phạm vi luôn được xét sau cùng khi tra phím tắt.
    pub global_scope: String,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            hierarchy_separator: DEFAULT_HIERARCHY_SEPARATOR.to_string(),
            global_scope: "global".to_string(),
        }
    }
}

impl ShortcutConfig {
    /// Kiểm tra và trả về ký tự phân cấp đã hợp lệ.
    pub fn separator(&self) -> Result<HierarchySeparator, CareError> {
        HierarchySeparator::new(&self.hierarchy_separator)
    }
}

/// Ký tự phân cấp đã qua kiểm tra: không rỗng và không chứa `&`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HierarchySeparator(String);

impl HierarchySeparator {
    pub fn new(raw: &str) -> Result<Self, CareError> {
        if raw.is_empty() {
            return Err(CareError::EmptySeparator);
        }
        if raw.contains(GROUP_SEPARATOR) {
            return Err(CareError::SeparatorClash(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HierarchySeparator {
    fn default() -> Self {
        Self(DEFAULT_HIERARCHY_SEPARATOR.to_string())
    }
}

impl std::fmt::Display for HierarchySeparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
