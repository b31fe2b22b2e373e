use anyhow::Result;
use cellarium_core::init_logging;
use cellarium_lib::app::{App, View};
use cellarium_lib::plugins::builtin_modules;
use clap::Parser;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World configuration file (JSON)
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print cell-state snapshots as JSON lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut view = View::new(io::stdout().lock()).with_json(args.json);
    view.banner()?;

    let mut app = App::new(builtin_modules());
    if let Some(path) = &args.config {
        match app.load_configuration(path) {
            Ok(failures) => {
                for failure in &failures {
                    view.binding_failure(failure)?;
                }
                if let Some(engine) = app.engine() {
                    view.world_loaded(&engine.info().name)?;
                }
            }
            // The shell stays usable without a world.
            Err(e) => view.error(&format!("{e:#}"))?,
        }
    }

    app.run(io::stdin().lock(), &mut view)?;
    Ok(())
}
