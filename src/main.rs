// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use retro_cam::backends::camera::SourceSpec;
use retro_cam::{BeautyLevel, Config, EffectDirective, FilterPreset, Sticker};
use std::path::{Path, PathBuf};

mod cli;

#[derive(Parser)]
#[command(name = "retro-cam")]
#[command(about = "Retro instant-camera photo booth")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Configuration file (default: ~/.config/retro-cam/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive booth in the terminal (default)
    Terminal {
        /// Camera source: pattern, image:<path> or v4l2:<device>
        #[arg(short, long)]
        source: Option<SourceSpec>,
    },

    /// List available camera sources
    List,

    /// Take a single photo
    Photo {
        /// Camera source: pattern, image:<path> or v4l2:<device>
        #[arg(short, long)]
        source: Option<SourceSpec>,

        /// Filter preset (normal, soft, vintage, bw, warm, cool, film)
        #[arg(short, long)]
        filter: Option<FilterPreset>,

        /// Beauty level, 0-100
        #[arg(short, long, default_value = "0")]
        beauty: BeautyLevel,

        /// Raw effect directive, e.g. "sepia(0.3) blur(1px)"; replaces --filter and --beauty
        #[arg(short, long, conflicts_with_all = ["filter", "beauty"])]
        directive: Option<EffectDirective>,

        /// Sticker glyph burned into the centre
        #[arg(long)]
        sticker: Option<Sticker>,

        /// Output file path (default: ~/Pictures/retro-cam/IMG_TIMESTAMP_ID.jpg)
        #[arg(short, long, conflicts_with = "data_url")]
        output: Option<PathBuf>,

        /// Print the photo as a data URL instead of saving it
        #[arg(long)]
        data_url: bool,

        /// Also request a caption for the photo
        #[arg(long)]
        caption: bool,
    },

    /// Print the effect directive for a filter and beauty level
    Directive {
        #[arg(short, long, default_value = "normal")]
        filter: FilterPreset,

        #[arg(short, long, default_value = "0")]
        beauty: BeautyLevel,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Terminal { .. }));

    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=retro_cam=debug, RUST_LOG=info
    init_logging(interactive)?;

    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        None => retro_cam::terminal::run(config, None),
        Some(Commands::Terminal { source }) => retro_cam::terminal::run(config, source),
        Some(Commands::List) => cli::list_cameras(&config),
        Some(Commands::Photo {
            source,
            filter,
            beauty,
            directive,
            sticker,
            output,
            data_url,
            caption,
        }) => cli::take_photo(
            &config,
            cli::PhotoOptions {
                source,
                filter,
                beauty,
                directive,
                sticker,
                output,
                data_url,
                caption,
            },
        ),
        Some(Commands::Directive { filter, beauty }) => {
            cli::print_directive(filter, beauty);
            Ok(())
        }
    }
}

/// Log to stderr, or to a file in the cache directory while the terminal
/// booth owns the screen
fn init_logging(interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    if interactive {
        let log_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(retro_cam::constants::APP_NAME);
        let log_file = open_log_file(&log_dir)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(log_file))
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .init();
    }
    Ok(())
}

fn open_log_file(dir: &Path) -> std::io::Result<std::fs::File> {
    std::fs::create_dir_all(dir)?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("retro-cam.log"))
}
