use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use safezone_cli::commands::distance::handle_distance;
use safezone_cli::commands::polyline::{handle_decode, handle_encode, DecodeArgs};
use safezone_cli::terminal::ColorPalette;
use safezone_lib::GeoPoint;

#[derive(Parser, Debug)]
#[command(author, version, about = "Polyline and great-circle distance utilities")]
struct Cli {
    /// Disable ANSI colors even when the terminal supports them.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode an encoded polyline into coordinates.
    Decode {
        /// Encoded polyline string.
        #[arg(allow_hyphen_values = true)]
        encoded: String,
        /// Print the decoded path as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Encode `lat,lng` points into a polyline.
    Encode {
        /// Points in order, each as `lat,lng`.
        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<GeoPoint>,
    },
    /// Great-circle distance between two points.
    Distance {
        /// Start point as `lat,lng`.
        #[arg(long, allow_hyphen_values = true)]
        from: GeoPoint,
        /// End point as `lat,lng`.
        #[arg(long, allow_hyphen_values = true)]
        to: GeoPoint,
        /// Report kilometres instead of meters.
        #[arg(long)]
        km: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let palette = if cli.no_color {
        ColorPalette::plain()
    } else {
        ColorPalette::detect()
    };
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Decode { encoded, json } => {
            handle_decode(&mut stdout, &DecodeArgs { encoded, json }, palette)
        }
        Command::Encode { points } => handle_encode(&mut stdout, &points),
        Command::Distance { from, to, km } => handle_distance(&mut stdout, from, to, km),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
