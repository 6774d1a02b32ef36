// ── Derived-state pipeline ──
//
// Pure functions from raw collections and pagination settings to a
// render-ready page. Nothing here touches the board, the bus, or a
// renderer; the board calls `compute` on every refresh.

use std::ops::Range;

use tracing::{debug, warn};

use crate::config::{PagePolicy, SortScope, TotalPagesRounding};
use crate::model::{EnrichedPost, OrderBy, PageInfo, PageView, PaginationConfig, Post, User};
use crate::store::AppState;

/// Join every post with its author by linear search over `users`.
///
/// Posts whose `user_id` matches no user keep `user: None`.
pub fn join(posts: &[Post], users: &[User]) -> Vec<EnrichedPost> {
    let mut unmatched = 0usize;

    let enriched: Vec<EnrichedPost> = posts
        .iter()
        .map(|post| {
            let user = users.iter().find(|u| u.id == post.user_id).cloned();
            if user.is_none() {
                unmatched += 1;
            }
            EnrichedPost {
                id: post.id,
                title: post.title.clone(),
                body: post.body.clone(),
                user,
            }
        })
        .collect();

    if unmatched > 0 && !users.is_empty() {
        warn!(unmatched, "posts without a matching user");
    }
    enriched
}

/// Pagination metadata for `total_items` under `config`.
pub fn page_info(
    config: &PaginationConfig,
    total_items: usize,
    rounding: TotalPagesRounding,
) -> PageInfo {
    let total_pages = total_pages(total_items, config.limit, rounding);
    let last = i64::try_from(total_pages).unwrap_or(i64::MAX);

    PageInfo {
        current_page: config.page,
        total_pages,
        total_items,
        has_prev_page: config.page > 1,
        has_next_page: config.page < last,
    }
}

pub fn total_pages(total_items: usize, limit: usize, rounding: TotalPagesRounding) -> usize {
    if limit == 0 {
        return 0;
    }
    match rounding {
        TotalPagesRounding::Floor => total_items / limit,
        TotalPagesRounding::Ceil => total_items.div_ceil(limit),
    }
}

/// Index range of the current page within a collection of `total_items`.
///
/// Pages below 1 or past the data give an empty range.
pub fn page_range(config: &PaginationConfig, total_items: usize) -> Range<usize> {
    let Some(offset) = config
        .page
        .checked_sub(1)
        .and_then(|p| usize::try_from(p).ok())
    else {
        return 0..0;
    };

    let start = offset
        .checked_mul(config.limit)
        .unwrap_or(usize::MAX)
        .min(total_items);
    let end = start.saturating_add(config.limit).min(total_items);
    start..end
}

/// Slice the current page out of `full` and compute its metadata.
pub fn paginate(
    config: &PaginationConfig,
    full: &[EnrichedPost],
    rounding: TotalPagesRounding,
) -> (Vec<EnrichedPost>, PageInfo) {
    let info = page_info(config, full.len(), rounding);
    let range = page_range(config, full.len());
    let items = full.get(range).map(<[EnrichedPost]>::to_vec).unwrap_or_default();
    (items, info)
}

/// Reorder `items` in place.
///
/// Title orders use plain string comparison. The sort is stable, but
/// callers should not rely on the relative order of equal titles.
pub fn sort(order_by: OrderBy, items: &mut [EnrichedPost]) {
    match order_by {
        OrderBy::TitleAsc => items.sort_by(|a, b| a.title.cmp(&b.title)),
        // True descending order, not a one-sided ">" comparison.
        OrderBy::TitleDesc => items.sort_by(|a, b| b.title.cmp(&a.title)),
        OrderBy::IdAsc => items.sort_by_key(|p| p.id),
        OrderBy::IdDesc => items.sort_by(|a, b| b.id.cmp(&a.id)),
    }
}

/// Recompute the page view from the current state.
pub fn compute(state: &AppState, policy: &PagePolicy) -> PageView {
    let config = &state.pagination;

    let (items, info) = match policy.sort_scope {
        SortScope::Page => {
            let (mut items, info) = paginate(config, &state.enriched, policy.total_pages);
            sort(config.order_by, &mut items);
            (items, info)
        }
        SortScope::Collection => {
            let mut ordered = state.enriched.as_ref().clone();
            sort(config.order_by, &mut ordered);
            paginate(config, &ordered, policy.total_pages)
        }
    };

    debug!(
        page = info.current_page,
        total_pages = info.total_pages,
        items = items.len(),
        order = %config.order_by,
        "page recomputed"
    );

    PageView { items, info }
}
