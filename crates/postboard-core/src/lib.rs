// postboard-core: Event bus, derived-state pipeline, and board orchestration
// between postboard-api and the front ends (CLI/TUI).

pub mod bus;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bus::{BoardEvent, DropdownChange, EventBus, EventKind};
pub use config::{
    BoardConfig, PagePolicy, PolicyPreset, SortScope, TotalPagesRounding, DEFAULT_POSTS_URL,
    DEFAULT_USERS_URL,
};
pub use controller::{Board, BoardPhase};
pub use error::{CoreError, Resource};
pub use render::{Renderer, TracingRenderer};
pub use store::AppState;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    EnrichedPost, OrderBy, PageInfo, PageView, PaginationConfig, Post, User, DEFAULT_LIMIT,
};
