//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);

    match args.command {
        ConfigCommand::Init { force } => {
            postboard_config::init_config(&path, force)
                .map_err(|e| CliError::from_config(e, &path))?;
            if !global.quiet {
                eprintln!("Wrote default config to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            // Surface validation problems here rather than at the next fetch.
            postboard_config::to_board_config(&cfg)
                .map_err(|e| CliError::from_config(e, &path))?;

            let out = match global.output {
                OutputFormat::Json => output::render_json(&cfg, false)?,
                OutputFormat::JsonCompact => output::render_json(&cfg, true)?,
                OutputFormat::Yaml => output::render_yaml(&cfg)?,
                OutputFormat::Table | OutputFormat::Plain => postboard_config::to_toml(&cfg)
                    .map_err(|e| CliError::from_config(e, &path))?,
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
