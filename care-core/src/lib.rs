//! Logic lõi dùng chung cho front-end lâm sàng: mở rộng ngữ cảnh phím tắt,
//! gom nhóm mốc thời gian và dựng đường dẫn API từ template.

pub mod buckets;
pub mod config;
pub mod context;
pub mod template;

pub use buckets::{date_bucket, group_by_bucket, parse_timestamp, BucketGroup, DateBucket};
pub use config::{HierarchySeparator, ShortcutConfig};
pub use context::{
    expand_default, expand_shortcut_context, ContextExpander, ExpandedContext, ScopePath,
    DEFAULT_HIERARCHY_SEPARATOR, GROUP_SEPARATOR,
};
pub use template::RouteTemplate;

/// Lỗi chung của các tiện ích lõi.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CareError {
    #[error("Ký tự phân cấp không được để trống")]
    EmptySeparator,
    #[error("Ký tự phân cấp {0:?} trùng với ký tự phân nhóm \"&\"")]
    SeparatorClash(String),
    #[error("Template chưa đóng ngoặc tại vị trí {0}")]
    UnclosedPlaceholder(usize),
    #[error("Dấu '}}' thừa tại vị trí {0}")]
    UnexpectedBrace(usize),
    #[error("Tên tham số không hợp lệ: {0:?}")]
    InvalidPlaceholder(String),
    #[error("Thiếu tham số cho placeholder {0:?}")]
    MissingParam(String),
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
}
