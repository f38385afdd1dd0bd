mod bookmarks_cmd;
mod chapters_cmd;
mod cli;
mod edit_cmd;
mod ranges;
mod shared;
mod split_cmd;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let cli = Cli::parse();
    if cli.verbose {
        init_tracing();
    }

    let result = match cli.command {
        cli::Commands::Bookmarks { ref file, format } => bookmarks_cmd::run(file, format),
        cli::Commands::Chapters { ref file, format } => chapters_cmd::run(file, format),
        cli::Commands::Add {
            ref file,
            page,
            ref title,
            ref parent,
            level,
            ref output,
        } => edit_cmd::run_add(
            file,
            page,
            title,
            parent.as_deref(),
            level,
            output.as_deref(),
        ),
        cli::Commands::Delete {
            ref file,
            ref path,
            ref output,
        } => edit_cmd::run_delete(file, path, output.as_deref()),
        cli::Commands::Move {
            ref file,
            ref source,
            ref target,
            position,
            ref output,
            dry_run,
        } => edit_cmd::run_move(
            file,
            source,
            target,
            position.into(),
            output.as_deref(),
            dry_run,
        ),
        cli::Commands::Split {
            ref file,
            ref output_dir,
            ref ranges,
            overwrite,
            no_clamp,
        } => split_cmd::run(file, output_dir, ranges.as_deref(), overwrite, no_clamp),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Log to stderr, honoring `RUST_LOG` and defaulting to debug output from
/// the pdfsplitter crates.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pdfsplitter=debug,pdfsplitter_backend=debug"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    tracing::debug!("verbose logging enabled");
}
