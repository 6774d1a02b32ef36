// ── Render seam ──
//
// The board hands every freshly computed page to a `Renderer`. Front ends
// implement it (the TUI forwards views into its action loop, the CLI
// prints the final snapshot); closures work too.

use tracing::debug;

use crate::model::PageView;

/// Consumer of page views. Called once per refresh.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &PageView);
}

impl<F> Renderer for F
where
    F: Fn(&PageView) + Send + Sync,
{
    fn render(&self, view: &PageView) {
        self(view);
    }
}

/// Renderer that only logs a summary of each page.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn render(&self, view: &PageView) {
        debug!(
            items = view.items.len(),
            first_id = view.items.first().map(|p| p.id),
            "{}",
            view.info
        );
    }
}
