mod app;
mod body;
mod config;
mod ephemeris;
mod error;
mod input;
mod location;
mod logging;
mod projection;
mod render;
mod term;
mod view;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use config::GlyphMode;
use error::OrreryError;
use location::Observer;
use std::process::ExitCode;

/// Sun, Moon and planets on a terminal map of the local sky.
#[derive(Parser, Debug)]
#[command(name = "orrery", version)]
struct Cli {
    /// Force ASCII glyphs
    #[arg(short, long, conflicts_with = "unicode")]
    ascii: bool,

    /// Force Unicode glyphs
    #[arg(short, long)]
    unicode: bool,

    /// Latitude, e.g. -15.75, 15:45S or 15°45'S
    #[arg(allow_negative_numbers = true)]
    latitude: String,

    /// Longitude, e.g. -69.42 or 69°25'W
    #[arg(allow_negative_numbers = true)]
    longitude: String,

    /// Altitude in meters, or with a unit: 12500ft, 40yd, 5'11"
    #[arg(allow_negative_numbers = true)]
    altitude: Option<String>,
}

impl Cli {
    fn glyph_mode(&self) -> Option<GlyphMode> {
        match (self.ascii, self.unicode) {
            (true, _) => Some(GlyphMode::Ascii),
            (_, true) => Some(GlyphMode::Unicode),
            _ => None,
        }
    }
}

fn print_usage() {
    println!("{}", Cli::command().render_usage());
    println!("orrery {}", env!("CARGO_PKG_VERSION"));
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(OrreryError::Argument(_)) = e.downcast_ref::<OrreryError>() {
                eprintln!("orrery: {e}");
                print_usage();
            } else {
                eprintln!("orrery: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let observer = Observer::from_args(&cli.latitude, &cli.longitude, cli.altitude.as_deref())?;

    let settings = match config::project_paths() {
        Ok(paths) => {
            logging::init(&paths.log_path)?;
            config::load_settings(&paths.settings_path)
        }
        Err(e) => {
            tracing::warn!(error = %e, "no project directories, using default settings");
            config::Settings::default()
        }
    };
    let utf8 = config::locale_is_utf8(|name| std::env::var(name).ok());
    let display = config::resolve_display(cli.glyph_mode(), &settings, utf8);

    app::run(observer, display)
}
