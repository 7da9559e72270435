//! Mở rộng chuỗi ngữ cảnh phím tắt thành danh sách phạm vi tiền tố.
//!
//! Chuỗi `"facility:patient&billing:invoice"` gồm hai nhóm ngăn bởi `&`, mỗi nhóm là
//! một đường dẫn phân cấp ngăn bởi `:`. Kết quả liệt kê mọi tiền tố của từng nhóm, từ
//! tổng quát đến cụ thể, không lặp lại:
//! `["facility", "facility:patient", "billing", "billing:invoice"]`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::config::{HierarchySeparator, ShortcutConfig};
use crate::CareError;

/// Ký tự phân nhóm cố định giữa các đường dẫn độc lập.
pub const GROUP_SEPARATOR: &str = "&";

/// Ký tự phân cấp mặc định.
pub const DEFAULT_HIERARCHY_SEPARATOR: &str = ":";

/// Mở rộng `context_key` với ký tự phân cấp tùy chọn.
///
/// Hàm không bao giờ lỗi: ký tự phân cấp không hợp lệ (rỗng hoặc chứa `&`) được thay
/// bằng `":"`, đầu vào rỗng hay chỉ có ký tự phân cách cho ra danh sách rỗng.
pub fn expand_shortcut_context(context_key: &str, hierarchy_separator: &str) -> Vec<String> {
    let separator = match HierarchySeparator::new(hierarchy_separator) {
        Ok(separator) => separator,
        Err(err) => {
            warn!(%err, "falling back to default hierarchy separator");
            HierarchySeparator::default()
        }
    };
    expand_with(context_key, &separator).into_vec()
}

/// Mở rộng với ký tự phân cấp mặc định `":"`.
pub fn expand_default(context_key: &str) -> Vec<String> {
    expand_with(context_key, &HierarchySeparator::default()).into_vec()
}

/// Bộ mở rộng gắn với một ký tự phân cấp đã kiểm tra.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextExpander {
    separator: HierarchySeparator,
}

impl ContextExpander {
    pub fn new(separator: HierarchySeparator) -> Self {
        Self { separator }
    }

    pub fn from_config(config: &ShortcutConfig) -> Result<Self, CareError> {
        Ok(Self::new(config.separator()?))
    }

    pub fn separator(&self) -> &HierarchySeparator {
        &self.separator
    }

    pub fn expand(&self, context_key: &str) -> ExpandedContext {
        expand_with(context_key, &self.separator)
    }

    /// Tách một phạm vi đơn lẻ theo ký tự phân cấp của bộ mở rộng.
    pub fn scope_path(&self, raw: &str) -> Option<ScopePath> {
        ScopePath::parse(raw, &self.separator)
    }
}

fn expand_with(context_key: &str, separator: &HierarchySeparator) -> ExpandedContext {
    if context_key.trim().is_empty() {
        return ExpandedContext::default();
    }

    let sep = separator.as_str();
    let normalized = normalize(context_key, sep);
    if normalized.is_empty() {
        return ExpandedContext::default();
    }

    let mut scopes = Vec::new();
    let mut seen = HashSet::new();

    for group in normalized
        .split(GROUP_SEPARATOR)
        .map(str::trim)
        .filter(|group| !group.is_empty())
    {
        // Separators next to `&` survive normalization, so empty segments are skipped here.
        let segments: Vec<&str> = group.split(sep).filter(|s| !s.is_empty()).collect();
        for depth in 1..=segments.len() {
            let scope = segments[..depth].join(sep);
            if seen.insert(scope.clone()) {
                scopes.push(scope);
            }
        }
    }

    trace!(context_key, ?scopes, "expanded shortcut context");
    ExpandedContext(scopes)
}

/// Gộp các ký tự phân cấp liên tiếp và bỏ ký tự phân cấp ở hai đầu chuỗi.
fn normalize(input: &str, sep: &str) -> String {
    input
        .split(sep)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Danh sách phạm vi đã mở rộng, theo thứ tự từ tổng quát đến cụ thể trong mỗi nhóm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandedContext(Vec<String>);

impl ExpandedContext {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.iter().any(|entry| entry == scope)
    }

    /// Duyệt ngược: phạm vi cụ thể nhất của nhóm cuối trước tiên.
    pub fn most_specific_first(&self) -> impl Iterator<Item = &str> {
        self.0.iter().rev().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for ExpandedContext {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Một đường dẫn phạm vi, ví dụ `facility → patient → home`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopePath {
    segments: Vec<String>,
    separator: HierarchySeparator,
}

impl ScopePath {
    /// Trả về `None` khi chuỗi không có đoạn nào khác rỗng.
    pub fn parse(raw: &str, separator: &HierarchySeparator) -> Option<Self> {
        let segments: Vec<String> = raw
            .trim()
            .split(separator.as_str())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return None;
        }

        Some(Self {
            segments,
            separator: separator.clone(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Phạm vi cha trực tiếp, `None` với phạm vi gốc.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
            separator: self.separator.clone(),
        })
    }

    /// Đúng khi `self` là tiền tố thực sự của `other`.
    pub fn is_ancestor_of(&self, other: &ScopePath) -> bool {
        self.depth() < other.depth() && other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(self.separator.as_str()))
    }
}
