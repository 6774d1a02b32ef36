//! `postboard posts`: start a board, replay the control flags as events,
//! print the resulting page.

use tracing::debug;

use postboard_core::{Board, BoardConfig, TracingRenderer};

use crate::cli::{GlobalOpts, OutputFormat, PostsArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    config: BoardConfig,
    args: &PostsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let board = Board::new(config, TracingRenderer)?;
    board.start().await?;

    for event in args.events() {
        debug!(?event, "emitting");
        board.emit(&event)?;
    }

    let view = board.snapshot();
    let color = global.output == OutputFormat::Table && output::should_color(global.color);
    let out = output::render_page(global.output, &view, color)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
