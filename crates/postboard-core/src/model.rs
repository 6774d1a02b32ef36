// ── Domain model ──
//
// Raw `Post`/`User` records come straight from the API crate. Everything
// else here is derived: the joined `EnrichedPost`, the pagination
// configuration the controls mutate, and the read-only page view handed
// to renderers.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

pub use postboard_api::{Post, User};

/// Default page size.
pub const DEFAULT_LIMIT: usize = 10;

/// A post joined with its author. `user` is `None` when no user matched
/// the post's `userId`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPost {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub user: Option<User>,
}

impl EnrichedPost {
    /// Author display name, or a placeholder for unmatched posts.
    pub fn author_name(&self) -> &str {
        self.user.as_ref().map_or("unknown author", |u| u.name.as_str())
    }

    pub fn author_email(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.email.as_str())
    }
}

/// Sort order selectable from the control panel.
///
/// Labels match the dropdown values exactly. Unknown labels fall back to
/// [`OrderBy::IdAsc`] via [`OrderBy::from_label`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum OrderBy {
    #[strum(serialize = "A-Z")]
    #[serde(rename = "A-Z")]
    TitleAsc,
    #[strum(serialize = "Z-A")]
    #[serde(rename = "Z-A")]
    TitleDesc,
    #[default]
    #[strum(serialize = "id ASC")]
    #[serde(rename = "id ASC")]
    IdAsc,
    #[strum(serialize = "id DESC")]
    #[serde(rename = "id DESC")]
    IdDesc,
}

impl OrderBy {
    /// Parse a dropdown label, falling back to ascending id.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Page size, current page, and sort order.
///
/// `page` is signed: without clamping, prev clicks can walk below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub limit: usize,
    pub page: i64,
    pub order_by: OrderBy,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: 1,
            order_by: OrderBy::default(),
        }
    }
}

impl PaginationConfig {
    /// Pull `page` into `[1, max(total_pages, 1)]`.
    pub fn clamp_page(&mut self, total_pages: usize) {
        let last = i64::try_from(total_pages.max(1)).unwrap_or(i64::MAX);
        self.page = self.page.clamp(1, last);
    }
}

/// Derived pagination metadata, recomputed on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Page {} of {} ({} items)",
            self.current_page, self.total_pages, self.total_items
        )
    }
}

/// The render-ready page: the ordered slice plus its metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PageView {
    pub items: Vec<EnrichedPost>,
    pub info: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn order_by_labels_round_trip() {
        for order in OrderBy::iter() {
            assert_eq!(OrderBy::from_label(order.label()), order);
            assert_eq!(order.to_string(), order.label());
        }
    }

    #[test]
    fn unknown_order_label_falls_back_to_id_asc() {
        assert_eq!(OrderBy::from_label("newest first"), OrderBy::IdAsc);
        assert_eq!(OrderBy::from_label(""), OrderBy::IdAsc);
        assert_eq!(OrderBy::from_label("a-z"), OrderBy::IdAsc);
    }

    #[test]
    fn clamp_page_bounds() {
        let mut config = PaginationConfig {
            page: -3,
            ..PaginationConfig::default()
        };
        config.clamp_page(4);
        assert_eq!(config.page, 1);

        config.page = 9;
        config.clamp_page(4);
        assert_eq!(config.page, 4);

        config.page = 2;
        config.clamp_page(0);
        assert_eq!(config.page, 1);
    }

    #[test]
    fn page_info_display() {
        let info = PageInfo {
            current_page: 2,
            total_pages: 10,
            total_items: 100,
            has_prev_page: true,
            has_next_page: true,
        };
        assert_eq!(info.to_string(), "Page 2 of 10 (100 items)");
    }
}
