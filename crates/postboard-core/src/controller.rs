// ── Board orchestrator ──
//
// Owns the application state, the event bus, and the renderer. `start`
// fetches both collections, wires the control handlers into the bus, and
// renders the first page. After that every accepted event mutates the
// pagination settings and triggers a full recompute and render.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use strum::IntoEnumIterator;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use postboard_api::{ApiClient, TransportConfig};

use crate::bus::{BoardEvent, EventBus, EventKind};
use crate::config::{BoardConfig, PagePolicy};
use crate::error::{CoreError, Resource};
use crate::model::{PageView, PaginationConfig};
use crate::pipeline;
use crate::render::Renderer;
use crate::store::AppState;

// ── BoardPhase ───────────────────────────────────────────────────

/// Lifecycle phase observable by front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum BoardPhase {
    Uninitialized,
    /// Fetching. A failed fetch leaves the board here for good.
    Loading,
    Ready,
}

// ── Board ────────────────────────────────────────────────────────

/// The orchestrator. Cheaply cloneable via `Arc<BoardInner>`.
#[derive(Clone)]
pub struct Board {
    inner: Arc<BoardInner>,
}

struct BoardInner {
    config: BoardConfig,
    client: ApiClient,
    bus: EventBus,
    state: Mutex<AppState>,
    phase: watch::Sender<BoardPhase>,
    renderer: Box<dyn Renderer>,
}

impl Board {
    /// Build a board with its own HTTP client. Does not fetch; call
    /// [`start()`](Self::start).
    pub fn new(config: BoardConfig, renderer: impl Renderer + 'static) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: config.tls.clone(),
            timeout: config.timeout,
        };
        let client = ApiClient::new(
            config.posts_url.clone(),
            config.users_url.clone(),
            &transport,
        )?;
        Ok(Self::with_client(config, client, renderer))
    }

    /// Build a board around an existing API client. The client's URLs win
    /// over the ones in `config`.
    pub fn with_client(
        config: BoardConfig,
        client: ApiClient,
        renderer: impl Renderer + 'static,
    ) -> Self {
        let (phase, _) = watch::channel(BoardPhase::Uninitialized);
        let state = AppState::new(config.pagination);

        Self {
            inner: Arc::new(BoardInner {
                config,
                client,
                bus: EventBus::new(),
                state: Mutex::new(state),
                phase,
                renderer: Box::new(renderer),
            }),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.inner.config
    }

    pub fn policy(&self) -> &PagePolicy {
        &self.inner.config.policy
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    // ── Lifecycle ────────────────────────────────────────────────

    pub fn phase(&self) -> BoardPhase {
        *self.inner.phase.borrow()
    }

    /// Watch phase transitions.
    pub fn subscribe_phase(&self) -> watch::Receiver<BoardPhase> {
        self.inner.phase.subscribe()
    }

    /// Fetch both collections, subscribe the control handlers, and render
    /// the first page.
    ///
    /// Fails with [`CoreError::AlreadyStarted`] unless the board is
    /// `Uninitialized`. A fetch failure is returned as-is and the board
    /// stays in `Loading`.
    pub async fn start(&self) -> Result<(), CoreError> {
        let entered = self.inner.phase.send_if_modified(|phase| {
            if *phase == BoardPhase::Uninitialized {
                *phase = BoardPhase::Loading;
                true
            } else {
                false
            }
        });
        if !entered {
            return Err(CoreError::AlreadyStarted);
        }
        info!(
            posts = %self.inner.client.posts_url(),
            users = %self.inner.client.users_url(),
            "loading board"
        );

        if let Err(e) = self.fetch_all().await {
            warn!(error = %e, "initial fetch failed");
            return Err(e);
        }

        self.subscribe_handlers();
        self.inner.phase.send_replace(BoardPhase::Ready);
        let view = self.refresh();
        info!(%view.info, "board ready");
        Ok(())
    }

    fn subscribe_handlers(&self) {
        for kind in EventKind::iter() {
            let weak: Weak<BoardInner> = Arc::downgrade(&self.inner);
            self.inner.bus.subscribe(kind, move |event| {
                // A dropped board leaves the bus with dead handlers.
                let Some(inner) = weak.upgrade() else {
                    return Ok(());
                };
                Board { inner }.handle(event)
            });
        }
        debug!("control handlers subscribed");
    }

    fn handle(&self, event: &BoardEvent) -> Result<(), CoreError> {
        self.lock_state().apply(event, &self.inner.config.policy)?;
        self.refresh();
        Ok(())
    }

    // ── Fetching ─────────────────────────────────────────────────

    /// Fetch and store the posts collection. Once the board is `Ready`
    /// the page is re-rendered with the new data.
    pub async fn fetch_posts(&self) -> Result<(), CoreError> {
        let posts = self
            .inner
            .client
            .list_posts()
            .await
            .map_err(|e| CoreError::fetch(Resource::Posts, &e))?;
        self.lock_state().set_posts(posts);
        self.refresh_if_ready();
        Ok(())
    }

    /// Fetch and store the users collection. Re-renders like
    /// [`Board::fetch_posts`].
    pub async fn fetch_users(&self) -> Result<(), CoreError> {
        let users = self
            .inner
            .client
            .list_users()
            .await
            .map_err(|e| CoreError::fetch(Resource::Users, &e))?;
        self.lock_state().set_users(users);
        self.refresh_if_ready();
        Ok(())
    }

    /// Fetch both collections concurrently.
    ///
    /// Whichever collection arrives before a failure is kept.
    pub async fn fetch_all(&self) -> Result<(), CoreError> {
        tokio::try_join!(self.fetch_posts(), self.fetch_users())?;
        let state = self.lock_state();
        debug!(
            posts = state.posts.len(),
            users = state.users.len(),
            "collections fetched"
        );
        Ok(())
    }

    // ── Events and views ─────────────────────────────────────────

    /// Emit a control event on the board's bus.
    pub fn emit(&self, event: &BoardEvent) -> Result<(), CoreError> {
        self.inner.bus.emit(event)
    }

    /// Recompute the page from current state and render it.
    pub fn refresh(&self) -> Arc<PageView> {
        let view = {
            let mut state = self.lock_state();
            let view = Arc::new(pipeline::compute(&state, &self.inner.config.policy));
            state.view = Arc::clone(&view);
            view
        };
        self.inner.renderer.render(&view);
        view
    }

    fn refresh_if_ready(&self) {
        if self.phase() == BoardPhase::Ready {
            self.refresh();
        }
    }

    /// The most recently computed page.
    pub fn snapshot(&self) -> Arc<PageView> {
        Arc::clone(&self.lock_state().view)
    }

    pub fn pagination(&self) -> PaginationConfig {
        self.lock_state().pagination
    }

    fn lock_state(&self) -> MutexGuard<'_, AppState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("phase", &self.phase())
            .field("posts_url", &self.inner.client.posts_url().as_str())
            .field("users_url", &self.inner.client.users_url().as_str())
            .field("policy", &self.inner.config.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn offline_board() -> Board {
        let client = ApiClient::from_base_url("http://127.0.0.1:1/", reqwest::Client::new()).unwrap();
        Board::with_client(BoardConfig::default(), client, |_: &PageView| {})
    }

    #[test]
    fn new_board_is_uninitialized() {
        let board = offline_board();
        assert_eq!(board.phase(), BoardPhase::Uninitialized);
        assert_eq!(board.pagination(), PaginationConfig::default());
        assert!(board.snapshot().items.is_empty());
    }

    #[test]
    fn events_before_start_are_noops() {
        let board = offline_board();
        board.emit(&BoardEvent::NextClick).unwrap();
        board.emit(&BoardEvent::dropdown("limit", "0")).unwrap();
        assert_eq!(board.pagination(), PaginationConfig::default());
        for kind in EventKind::iter() {
            assert_eq!(board.bus().handler_count(kind), 0);
        }
    }

    #[test]
    fn refresh_on_empty_state_renders_empty_page() {
        let board = offline_board();
        let view = board.refresh();
        assert!(view.items.is_empty());
        assert_eq!(view.info.total_items, 0);
        assert_eq!(view.info.total_pages, 0);
    }
}
