// ── Runtime board configuration ──
//
// These types describe where the collections live and how pagination
// behaves. They never touch disk: the CLI/TUI builds a `BoardConfig`
// (usually through `postboard-config`) and hands it in.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use postboard_api::TlsMode;

use crate::model::PaginationConfig;

pub const DEFAULT_POSTS_URL: &str = "https://jsonplaceholder.typicode.com/posts";
pub const DEFAULT_USERS_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// How `total_pages` is derived from the item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TotalPagesRounding {
    /// `total_items / limit`, rounded down. A trailing partial page is not
    /// counted and cannot be reached with next.
    #[default]
    Floor,
    /// `total_items / limit`, rounded up.
    Ceil,
}

/// Which part of the collection the sort order applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortScope {
    /// Slice in fetch order, then sort only the visible page.
    #[default]
    Page,
    /// Sort the whole joined collection, then slice.
    Collection,
}

/// Named bundles of pagination rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PolicyPreset {
    /// Unclamped page counter, floor rounding, per-page sorting.
    #[default]
    Legacy,
    /// Clamped page counter, ceiling rounding, whole-collection sorting.
    Corrected,
}

/// Pagination rules applied by the pipeline and the control handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePolicy {
    /// Keep `page` inside `[1, max(total_pages, 1)]`.
    pub clamp_pages: bool,
    pub total_pages: TotalPagesRounding,
    pub sort_scope: SortScope,
}

impl PagePolicy {
    pub fn legacy() -> Self {
        Self {
            clamp_pages: false,
            total_pages: TotalPagesRounding::Floor,
            sort_scope: SortScope::Page,
        }
    }

    pub fn corrected() -> Self {
        Self {
            clamp_pages: true,
            total_pages: TotalPagesRounding::Ceil,
            sort_scope: SortScope::Collection,
        }
    }

    pub fn from_preset(preset: PolicyPreset) -> Self {
        match preset {
            PolicyPreset::Legacy => Self::legacy(),
            PolicyPreset::Corrected => Self::corrected(),
        }
    }
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self::legacy()
    }
}

/// Configuration for a single board.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Posts collection endpoint.
    pub posts_url: Url,
    /// Users collection endpoint.
    pub users_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    pub tls: TlsMode,
    /// Initial page size, page, and sort order.
    pub pagination: PaginationConfig,
    pub policy: PagePolicy,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            posts_url: DEFAULT_POSTS_URL
                .parse()
                .expect("default posts URL is valid"),
            users_url: DEFAULT_USERS_URL
                .parse()
                .expect("default users URL is valid"),
            timeout: Duration::from_secs(30),
            tls: TlsMode::System,
            pagination: PaginationConfig::default(),
            policy: PagePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_map_to_policies() {
        assert_eq!(PagePolicy::from_preset(PolicyPreset::Legacy), PagePolicy::legacy());
        assert_eq!(
            PagePolicy::from_preset(PolicyPreset::Corrected),
            PagePolicy::corrected()
        );
        assert_eq!(PagePolicy::default(), PagePolicy::legacy());
    }

    #[test]
    fn enum_labels_parse() {
        assert_eq!("ceil".parse::<TotalPagesRounding>().ok(), Some(TotalPagesRounding::Ceil));
        assert_eq!("collection".parse::<SortScope>().ok(), Some(SortScope::Collection));
        assert_eq!("corrected".parse::<PolicyPreset>().ok(), Some(PolicyPreset::Corrected));
        assert!("round".parse::<TotalPagesRounding>().is_err());
    }

    #[test]
    fn default_config_points_at_jsonplaceholder() {
        let config = BoardConfig::default();
        assert_eq!(config.posts_url.as_str(), DEFAULT_POSTS_URL);
        assert_eq!(config.users_url.as_str(), DEFAULT_USERS_URL);
        assert_eq!(config.pagination, PaginationConfig::default());
    }
}
