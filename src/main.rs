mod cli;
mod commands;

use cli::Command;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let report = match cli::parse(pico_args::Arguments::from_env())? {
        Command::Help => {
            print!("{}", cli::HELP);
            return Ok(());
        }
        Command::Layout { layout, export } => commands::layout(&layout, export.as_deref())?,
        Command::Pick {
            layout,
            mesh,
            origin,
            direction,
        } => commands::pick(&layout, mesh.as_deref(), origin, direction)?,
        Command::Playback { source } => commands::playback(&source)?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
