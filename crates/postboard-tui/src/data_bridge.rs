//! Data bridge: runs the board's startup and reports its phase to the UI.
//!
//! Pages themselves reach the UI through the board's renderer (see
//! [`channel_renderer`]); this task only drives `start` and forwards
//! phase transitions and load failures as [`Action`]s.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use postboard_core::{Board, PageView, Renderer};

use crate::action::Action;

/// A renderer that posts every computed page into the action channel.
pub fn channel_renderer(action_tx: mpsc::UnboundedSender<Action>) -> impl Renderer + 'static {
    move |view: &PageView| {
        // Receiver gone means the app is shutting down.
        let _ = action_tx.send(Action::PageRendered(Arc::new(view.clone())));
    }
}

/// Start the board and forward phase changes until cancelled.
pub async fn spawn_data_bridge(
    board: Board,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut phase = board.subscribe_phase();
    let _ = action_tx.send(Action::PhaseChanged(*phase.borrow_and_update()));

    let start = board.start();
    tokio::pin!(start);
    let mut started = false;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,

            result = &mut start, if !started => {
                started = true;
                match result {
                    Ok(()) => {
                        info!(info = %board.snapshot().info, "board started");
                        let _ = action_tx.send(Action::PaginationSynced(board.pagination()));
                    }
                    Err(e) => {
                        warn!(error = %e, "board failed to load");
                        let _ = action_tx.send(Action::LoadFailed(e.to_string()));
                    }
                }
            }

            changed = phase.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *phase.borrow_and_update();
                debug!(%current, "board phase changed");
                if action_tx.send(Action::PhaseChanged(current)).is_err() {
                    break;
                }
            }
        }
    }

    debug!("data bridge stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use postboard_core::BoardConfig;

    #[tokio::test]
    async fn unreachable_api_reports_load_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let config = BoardConfig {
            posts_url: "http://127.0.0.1:1/posts".parse().unwrap(),
            users_url: "http://127.0.0.1:1/users".parse().unwrap(),
            ..BoardConfig::default()
        };
        let board = Board::new(config, channel_renderer(tx.clone())).unwrap();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(spawn_data_bridge(board, tx, cancel.clone()));

        let reason = loop {
            match rx.recv().await.unwrap() {
                Action::LoadFailed(reason) => break reason,
                Action::PageRendered(_) => panic!("no page should render"),
                _ => {}
            }
        };

        assert!(reason.starts_with("Failed to fetch"), "{reason}");
        cancel.cancel();
        task.await.unwrap();
    }
}
