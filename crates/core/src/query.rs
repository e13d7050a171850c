//! List query helpers: pagination, date bounds and text matching.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page metadata returned next to every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub pages: usize,
}

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Normalize raw query values. Pages start at 1; the limit is clamped to
    /// `1..=MAX_PAGE_SIZE` and falls back to `default_limit`.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of records skipped before this page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    /// Slice one page out of an already filtered and sorted list.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> (Vec<T>, Pagination) {
        let total = items.len();
        let page: Vec<T> = items
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect();
        let pagination = Pagination {
            total,
            page: self.page,
            limit: self.limit,
            pages: total.div_ceil(self.limit as usize),
        };
        (page, pagination)
    }
}

/// Which end of a date range a value bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// Inclusive lower bound; a bare date means its first instant.
    Start,
    /// Inclusive upper bound; a bare date covers the whole day.
    End,
}

/// Parse `YYYY-MM-DD` or RFC 3339 into an instant.
///
/// # Errors
///
/// Returns a message naming the rejected value.
pub fn parse_date_bound(raw: &str, bound: DateBound) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date: {raw}"))?;
    let start = date.and_time(NaiveTime::MIN).and_utc();
    match bound {
        DateBound::Start => Ok(start),
        DateBound::End => date
            .checked_add_days(Days::new(1))
            .map(|next| next.and_time(NaiveTime::MIN).and_utc() - chrono::Duration::nanoseconds(1))
            .ok_or_else(|| format!("invalid date: {raw}")),
    }
}

/// An inclusive instant range with optional ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parse optional `dateFrom` / `dateTo` query values.
    ///
    /// # Errors
    ///
    /// Returns a message when either value is not a date.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        Ok(Self {
            from: from
                .filter(|s| !s.trim().is_empty())
                .map(|s| parse_date_bound(s, DateBound::Start))
                .transpose()?,
            to: to
                .filter(|s| !s.trim().is_empty())
                .map(|s| parse_date_bound(s, DateBound::End))
                .transpose()?,
        })
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| instant >= from) && self.to.is_none_or(|to| instant <= to)
    }
}

/// Case-insensitive substring match. An empty needle matches everything.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Trimmed, non-empty search term from a query value.
#[must_use]
pub fn search_term(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_page_request_normalizes() {
        assert_eq!(
            PageRequest::new(None, None, 10),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            PageRequest::new(Some(0), Some(0), 10),
            PageRequest { page: 1, limit: 1 }
        );
        assert_eq!(PageRequest::new(Some(3), Some(500), 10).limit, 100);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=25).collect();
        let (page, meta) = PageRequest::new(Some(3), Some(10), 10).paginate(items);
        assert_eq!(page, vec![21, 22, 23, 24, 25]);
        assert_eq!(
            meta,
            Pagination {
                total: 25,
                page: 3,
                limit: 10,
                pages: 3
            }
        );
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let (page, meta) = PageRequest::new(Some(9), Some(10), 10).paginate(vec![1, 2, 3]);
        assert!(page.is_empty());
        assert_eq!(meta.pages, 1);
        assert_eq!(meta.total, 3);
    }

    #[test]
    fn test_paginate_empty_list() {
        let (page, meta) = PageRequest::new(None, None, 50).paginate(Vec::<u8>::new());
        assert!(page.is_empty());
        assert_eq!(meta.pages, 0);
    }

    #[test]
    fn test_date_only_end_covers_whole_day() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-01")).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap();
        let next = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();

        assert!(range.contains(late));
        assert!(!range.contains(next));
        assert!(!range.contains(before));
    }

    #[test]
    fn test_rfc3339_bounds_are_exact() {
        let range = DateRange::parse(None, Some("2024-03-01T12:00:00Z")).unwrap();
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 1).unwrap()));
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(DateRange::parse(Some("yesterday"), None).is_err());
        assert!(DateRange::parse(Some(""), Some(" ")).unwrap() == DateRange::default());
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Laptop Pro 15", "laptop"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Mouse", "cable"));
    }
}
