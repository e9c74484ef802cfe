//! Cursor pagination over ordered child collections.
//!
//! Scenario lists, test-case lists and run-result lists all page the same
//! way: skip past the element whose key equals the cursor, then take at most
//! `size` elements. A cursor that matches nothing is ignored and paging starts
//! from the beginning. A size that is absent or not positive means "no limit".

use serde::Deserialize;

/// Anything that can be addressed by a cursor.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl<T: Keyed + ?Sized> Keyed for &T {
    fn key(&self) -> &str {
        (**self).key()
    }
}

/// Query parameters accepted by list endpoints.
///
/// `cursor`/`size` is the primary scheme. `offset`/`limit` is only honoured
/// when no cursor is given, for clients of the older offset listing.
/// Numbers are kept as raw strings and read leniently, so `size=` or
/// `size=abc` behave as if the parameter were absent.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageParams {
    pub cursor: Option<String>,
    pub size: Option<String>,
    pub offset: Option<String>,
    /// Older clients send the window length as `query`.
    #[serde(alias = "query")]
    pub limit: Option<String>,
}

impl PageParams {
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }

    pub fn size(&self) -> Option<i64> {
        self.size.as_deref().and_then(parse_leading_int)
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset.as_deref().and_then(parse_leading_int)
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(parse_leading_int)
    }

    pub fn apply<'a, T: Keyed>(&self, items: &'a [T]) -> &'a [T] {
        let (offset, window_len) = (self.offset(), self.limit());
        if self.cursor().is_none() && (offset.is_some() || window_len.is_some()) {
            let window = offset_window(items, offset, window_len);
            return limit(window, self.size());
        }
        paginate(items, self.cursor(), self.size())
    }
}

/// Leading decimal integer of `raw` after optional whitespace and sign, so
/// `"20"`, `" 7px"` and `"-3"` parse while `""` and `"abc"` do not.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Elements strictly after `cursor` (or from the start if the cursor is
/// absent or unknown), truncated to `size` when `size` is positive.
pub fn paginate<'a, T: Keyed>(items: &'a [T], cursor: Option<&str>, size: Option<i64>) -> &'a [T] {
    limit(after_cursor(items, cursor), size)
}

fn after_cursor<'a, T: Keyed>(items: &'a [T], cursor: Option<&str>) -> &'a [T] {
    let Some(cursor) = cursor else {
        return items;
    };
    match items.iter().position(|item| item.key() == cursor) {
        Some(idx) => &items[idx + 1..],
        None => items,
    }
}

fn limit<T>(items: &[T], size: Option<i64>) -> &[T] {
    match size {
        Some(n) if n > 0 => &items[..items.len().min(n as usize)],
        _ => items,
    }
}

/// `items[offset .. offset + limit]`, clamped to the slice. Negative offsets
/// count as zero; a missing or non-positive limit means "to the end".
pub fn offset_window<T>(items: &[T], offset: Option<i64>, limit: Option<i64>) -> &[T] {
    let start = offset.unwrap_or(0).max(0) as usize;
    let start = start.min(items.len());
    let rest = &items[start..];
    match limit {
        Some(n) if n > 0 => &rest[..rest.len().min(n as usize)],
        _ => rest,
    }
}
