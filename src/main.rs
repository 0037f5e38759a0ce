// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use emotrack::app::AppModel;
use emotrack::i18n;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "emotrack")]
#[command(about = "Mood tracker that reads your facial expression from the camera")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Classify the emotion in an image file
    Classify {
        /// Image to classify (PNG, JPEG, ...)
        image: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Take one photo and print the detected mood
    Snap {
        /// Camera index to use (from 'emotrack list')
        #[arg(short, long, default_value = "0")]
        camera: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=emotrack=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Classify { image, json }) => cli::classify_image(image, json),
        Some(Commands::Snap { camera }) => cli::snap(camera),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    i18n::init(&requested_languages);

    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(360.0)
            .min_height(480.0),
    );

    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
