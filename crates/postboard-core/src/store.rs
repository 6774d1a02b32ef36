// ── Application state ──
//
// A single record owned by the board: raw collections, the joined
// collection derived from them, the pagination settings the controls
// mutate, and the last computed page view.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bus::{BoardEvent, DropdownChange};
use crate::config::PagePolicy;
use crate::error::CoreError;
use crate::model::{EnrichedPost, OrderBy, PageView, PaginationConfig, Post, User};
use crate::pipeline;

/// Dropdown value after numeric coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlValue {
    Number(i64),
    Text(String),
}

impl ControlValue {
    /// Numbers when the raw value parses as an integer, text otherwise.
    pub fn coerce(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map_or_else(|_| Self::Text(raw.to_owned()), Self::Number)
    }
}

/// Dropdown fields the board accepts.
pub const CONTROL_FIELDS: [&str; 3] = ["limit", "page", "orderBy"];

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub posts: Vec<Post>,
    pub users: Vec<User>,
    /// Posts joined with their authors, in fetch order.
    pub enriched: Arc<Vec<EnrichedPost>>,
    pub pagination: PaginationConfig,
    /// Result of the last refresh.
    pub view: Arc<PageView>,
}

impl AppState {
    pub fn new(pagination: PaginationConfig) -> Self {
        Self {
            pagination,
            ..Self::default()
        }
    }

    /// Replace the raw posts and rebuild the joined collection.
    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.rejoin();
    }

    /// Replace the raw users and rebuild the joined collection.
    pub fn set_users(&mut self, users: Vec<User>) {
        self.users = users;
        self.rejoin();
    }

    fn rejoin(&mut self) {
        self.enriched = Arc::new(pipeline::join(&self.posts, &self.users));
    }

    fn total_pages(&self, policy: &PagePolicy) -> usize {
        pipeline::total_pages(self.enriched.len(), self.pagination.limit, policy.total_pages)
    }

    /// Apply a control event to the pagination settings.
    pub fn apply(&mut self, event: &BoardEvent, policy: &PagePolicy) -> Result<(), CoreError> {
        match event {
            BoardEvent::DropdownChange(change) => self.apply_dropdown(change, policy)?,
            BoardEvent::PrevClick => {
                self.pagination.page = self.pagination.page.saturating_sub(1);
                if policy.clamp_pages {
                    self.pagination.clamp_page(self.total_pages(policy));
                }
            }
            BoardEvent::NextClick => {
                self.pagination.page = self.pagination.page.saturating_add(1);
                if policy.clamp_pages {
                    self.pagination.clamp_page(self.total_pages(policy));
                }
            }
        }
        debug!(?event, pagination = ?self.pagination, "control applied");
        Ok(())
    }

    fn apply_dropdown(
        &mut self,
        change: &DropdownChange,
        policy: &PagePolicy,
    ) -> Result<(), CoreError> {
        let value = ControlValue::coerce(&change.value);
        let invalid = |reason: &str| CoreError::InvalidControl {
            field: change.field.clone(),
            value: change.value.clone(),
            reason: reason.into(),
        };

        match change.field.as_str() {
            "limit" => {
                let limit = match value {
                    ControlValue::Number(n) => usize::try_from(n)
                        .ok()
                        .filter(|&n| n > 0)
                        .ok_or_else(|| invalid("page size must be a positive integer"))?,
                    ControlValue::Text(_) => return Err(invalid("page size must be a number")),
                };
                self.pagination.limit = limit;
            }
            "page" => match value {
                ControlValue::Number(n) => self.pagination.page = n,
                ControlValue::Text(_) => return Err(invalid("page must be a number")),
            },
            "orderBy" => {
                self.pagination.order_by = match value {
                    ControlValue::Text(label) => OrderBy::from_label(&label),
                    ControlValue::Number(_) => OrderBy::default(),
                };
            }
            other => {
                warn!(field = other, value = %change.value, "ignoring unknown dropdown field");
                return Ok(());
            }
        }

        if policy.clamp_pages {
            self.pagination.clamp_page(self.total_pages(policy));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state_with_items(count: u64) -> AppState {
        let mut state = AppState::default();
        state.set_users(vec![User {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            username: None,
            phone: None,
            website: None,
            extra: serde_json::Map::new(),
        }]);
        state.set_posts(
            (1..=count)
                .map(|id| Post {
                    id,
                    user_id: 1,
                    title: format!("post {id}"),
                    body: String::new(),
                })
                .collect(),
        );
        state
    }

    #[test]
    fn coerce_numbers_and_text() {
        assert_eq!(ControlValue::coerce("5"), ControlValue::Number(5));
        assert_eq!(ControlValue::coerce(" 20 "), ControlValue::Number(20));
        assert_eq!(ControlValue::coerce("-2"), ControlValue::Number(-2));
        assert_eq!(ControlValue::coerce("A-Z"), ControlValue::Text("A-Z".into()));
        assert_eq!(ControlValue::coerce("id ASC"), ControlValue::Text("id ASC".into()));
    }

    #[test]
    fn set_posts_and_users_rejoin() {
        let mut state = AppState::default();
        state.set_posts(vec![Post {
            id: 1,
            user_id: 7,
            title: "t".into(),
            body: "b".into(),
        }]);
        assert!(state.enriched[0].user.is_none());

        state.set_users(vec![User {
            id: 7,
            name: "Grace".into(),
            email: "grace@example.com".into(),
            username: None,
            phone: None,
            website: None,
            extra: serde_json::Map::new(),
        }]);
        assert_eq!(state.enriched[0].author_name(), "Grace");
    }

    #[test]
    fn limit_dropdown_sets_numeric_limit() {
        let mut state = state_with_items(30);
        state
            .apply(&BoardEvent::dropdown("limit", "5"), &PagePolicy::legacy())
            .unwrap();
        assert_eq!(state.pagination.limit, 5);
    }

    #[test]
    fn limit_rejects_zero_and_text() {
        let mut state = state_with_items(30);
        for bad in ["0", "-4", "ten"] {
            let err = state
                .apply(&BoardEvent::dropdown("limit", bad), &PagePolicy::legacy())
                .unwrap_err();
            assert!(matches!(err, CoreError::InvalidControl { .. }), "{bad}");
        }
        assert_eq!(state.pagination.limit, 10);
    }

    #[test]
    fn order_dropdown_falls_back_for_unknown_labels() {
        let mut state = state_with_items(3);
        let policy = PagePolicy::legacy();

        state.apply(&BoardEvent::dropdown("orderBy", "Z-A"), &policy).unwrap();
        assert_eq!(state.pagination.order_by, OrderBy::TitleDesc);

        state.apply(&BoardEvent::dropdown("orderBy", "sideways"), &policy).unwrap();
        assert_eq!(state.pagination.order_by, OrderBy::IdAsc);

        state.apply(&BoardEvent::dropdown("orderBy", "42"), &policy).unwrap();
        assert_eq!(state.pagination.order_by, OrderBy::IdAsc);
    }

    #[test]
    fn page_dropdown_sets_page() {
        let mut state = state_with_items(30);
        state
            .apply(&BoardEvent::dropdown("page", "3"), &PagePolicy::legacy())
            .unwrap();
        assert_eq!(state.pagination.page, 3);
    }

    #[test]
    fn unknown_dropdown_field_is_ignored() {
        let mut state = state_with_items(30);
        let before = state.pagination;
        state
            .apply(&BoardEvent::dropdown("posts", "[]"), &PagePolicy::legacy())
            .unwrap();
        assert_eq!(state.pagination, before);
    }

    #[test]
    fn prev_at_first_page_goes_to_zero_without_clamping() {
        let mut state = state_with_items(30);
        state.apply(&BoardEvent::PrevClick, &PagePolicy::legacy()).unwrap();
        assert_eq!(state.pagination.page, 0);
        state.apply(&BoardEvent::PrevClick, &PagePolicy::legacy()).unwrap();
        assert_eq!(state.pagination.page, -1);
    }

    #[test]
    fn prev_at_first_page_stays_with_clamping() {
        let mut state = state_with_items(30);
        state.apply(&BoardEvent::PrevClick, &PagePolicy::corrected()).unwrap();
        assert_eq!(state.pagination.page, 1);
    }

    #[test]
    fn next_past_last_page_without_clamping() {
        let mut state = state_with_items(13);
        state.apply(&BoardEvent::NextClick, &PagePolicy::legacy()).unwrap();
        state.apply(&BoardEvent::NextClick, &PagePolicy::legacy()).unwrap();
        assert_eq!(state.pagination.page, 3);
    }

    #[test]
    fn next_is_capped_with_clamping() {
        let mut state = state_with_items(13);
        let policy = PagePolicy::corrected();
        for _ in 0..5 {
            state.apply(&BoardEvent::NextClick, &policy).unwrap();
        }
        assert_eq!(state.pagination.page, 2);
    }

    #[test]
    fn limit_change_clamps_page_with_clamping() {
        let mut state = state_with_items(30);
        let policy = PagePolicy::corrected();
        state.apply(&BoardEvent::dropdown("page", "3"), &policy).unwrap();
        assert_eq!(state.pagination.page, 3);

        state.apply(&BoardEvent::dropdown("limit", "20"), &policy).unwrap();
        assert_eq!(state.pagination.page, 2);
    }

    #[test]
    fn control_fields_are_all_handled() {
        let mut state = state_with_items(30);
        for field in CONTROL_FIELDS {
            let value = if field == "orderBy" { "A-Z" } else { "2" };
            state
                .apply(&BoardEvent::dropdown(field, value), &PagePolicy::legacy())
                .unwrap();
        }
        assert_eq!(state.pagination.limit, 2);
        assert_eq!(state.pagination.page, 2);
        assert_eq!(state.pagination.order_by, OrderBy::TitleAsc);
    }
}
