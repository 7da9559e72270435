//! Gom nhóm bản ghi có mốc thời gian theo ngày tương đối (hôm nay, hôm qua, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CareError;

/// Nhóm thời gian, khai báo theo thứ tự hiển thị.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DateBucket {
    Future,
    Today,
    Yesterday,
    LastSevenDays,
    LastThirtyDays,
    Older,
    Undated,
}

impl DateBucket {
    pub const ALL: [DateBucket; 7] = [
        DateBucket::Future,
        DateBucket::Today,
        DateBucket::Yesterday,
        DateBucket::LastSevenDays,
        DateBucket::LastThirtyDays,
        DateBucket::Older,
        DateBucket::Undated,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DateBucket::Future => "Sắp tới",
            DateBucket::Today => "Hôm nay",
            DateBucket::Yesterday => "Hôm qua",
            DateBucket::LastSevenDays => "7 ngày qua",
            DateBucket::LastThirtyDays => "30 ngày qua",
            DateBucket::Older => "Cũ hơn",
            DateBucket::Undated => "Không rõ thời gian",
        }
    }
}

/// Một nhóm cùng các phần tử thuộc về nó.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BucketGroup<T> {
    pub bucket: DateBucket,
    pub items: Vec<T>,
}

/// Xếp một mốc thời gian vào nhóm, so theo ngày lịch UTC với `anchor`.
pub fn date_bucket(timestamp: Option<DateTime<Utc>>, anchor: DateTime<Utc>) -> DateBucket {
    let Some(timestamp) = timestamp else {
        return DateBucket::Undated;
    };

    let days_ago = anchor
        .date_naive()
        .signed_duration_since(timestamp.date_naive())
        .num_days();

    match days_ago {
        d if d < 0 => DateBucket::Future,
        0 => DateBucket::Today,
        1 => DateBucket::Yesterday,
        2..=6 => DateBucket::LastSevenDays,
        7..=29 => DateBucket::LastThirtyDays,
        _ => DateBucket::Older,
    }
}

/// Gom các phần tử theo nhóm; bỏ qua nhóm rỗng, giữ nguyên thứ tự đầu vào trong nhóm.
pub fn group_by_bucket<T, F>(items: Vec<T>, key: F, anchor: DateTime<Utc>) -> Vec<BucketGroup<T>>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let mut slots: Vec<Vec<T>> = DateBucket::ALL.iter().map(|_| Vec::new()).collect();

    for item in items {
        let bucket = date_bucket(key(&item), anchor);
        slots[bucket as usize].push(item);
    }

    DateBucket::ALL
        .into_iter()
        .zip(slots)
        .filter(|(_, items)| !items.is_empty())
        .map(|(bucket, items)| BucketGroup { bucket, items })
        .collect()
}

/// Đọc mốc thời gian RFC 3339 và chuyển về UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CareError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| CareError::Parse(format!("{value:?}: {err}")))
}
