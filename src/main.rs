use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use pig_grid::groupify::{groupify_file, read_groups, read_items};
use pig_grid::{GridSettings, LayoutController};

#[derive(Parser)]
#[command(author, version, about = "Justified photo grid tools", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sort item records by date and bucket them into day groups
    Groupify {
        /// Item records (JSON array)
        #[arg(long = "in", value_name = "FILE")]
        input: PathBuf,

        /// Where to write the grouped JSON
        #[arg(long = "out", value_name = "FILE")]
        output: PathBuf,

        /// Keep the input order instead of sorting newest first
        #[arg(long)]
        no_sort: bool,
    },

    /// Lay out a collection at a container width and print a summary
    Layout {
        /// Item records, or groupify output with --grouped
        #[arg(long = "in", value_name = "FILE")]
        input: PathBuf,

        /// Container width in pixels
        #[arg(long)]
        width: f64,

        /// Viewport height used for the initial window
        #[arg(long, default_value = "900")]
        viewport_height: f64,

        /// Input is already grouped
        #[arg(long)]
        grouped: bool,

        /// Grid settings (JSON); PIG_* environment variables override it
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,
    },
}

fn load_settings(path: Option<&Path>) -> Result<GridSettings> {
    let settings = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {:?}", path))?;
            serde_json::from_str::<GridSettings>(&raw)
                .with_context(|| format!("Invalid settings JSON in {:?}", path))?
        }
        None => GridSettings::default(),
    };
    Ok(settings.with_env_overrides())
}

fn run_layout(
    input: &Path,
    width: f64,
    viewport_height: f64,
    grouped: bool,
    settings: GridSettings,
) -> Result<()> {
    let mut controller = if grouped {
        LayoutController::from_groups(read_groups(input)?, settings)?
    } else {
        LayoutController::new(read_items(input)?, settings)?
    };
    for rejected in controller.rejected() {
        println!("skipped: {}", rejected);
    }

    controller.mount(width, viewport_height, 0.0)?;
    let layout = controller
        .layout()
        .context("Container width must be positive")?;

    for group in &layout.groups {
        println!(
            "{:<24} items={:<5} rows={:<4} y={:<10.1} height={:.1}",
            if group.date.is_empty() { "-" } else { group.date.as_str() },
            group.rects.len(),
            group.rows.len(),
            group.group_translate_y,
            group.height
        );
    }
    println!(
        "total height {:.1}px, {} items in {} rows, {} rendered at scroll 0",
        layout.total_height,
        layout.item_count(),
        layout.row_count(),
        controller.render_set().len()
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pig_grid=info".parse()?)
                .add_directive("pig=info".parse()?),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Groupify {
            input,
            output,
            no_sort,
        } => {
            let groups = groupify_file(&input, &output, !no_sort)?;
            info!("Done! Generated {:?} with {} groups", output, groups);
        }
        Command::Layout {
            input,
            width,
            viewport_height,
            grouped,
            settings,
        } => {
            let settings = load_settings(settings.as_deref())?;
            run_layout(&input, width, viewport_height, grouped, settings)?;
        }
    }
    Ok(())
}
