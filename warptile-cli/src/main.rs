//! warptile CLI - Command-line interface
//!
//! Fetches warped raster tiles through the warptile library and manages its
//! configuration file.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::fetch::FetchArgs;

#[derive(Parser)]
#[command(name = "warptile")]
#[command(version = warptile::VERSION)]
#[command(about = "Fetch reprojected raster tiles from an image-warping endpoint", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one tile and save it as an image
    Fetch {
        /// Bounding box as xmin,ymin,xmax,ymax in CRS units
        #[arg(long, allow_hyphen_values = true)]
        bbox: String,

        /// Target coordinate reference system (e.g., EPSG:3857)
        #[arg(long)]
        crs: String,

        /// Source raster identifier understood by the endpoint
        #[arg(long)]
        source: String,

        /// Comma-separated band indexes (default from config: 1,2,3)
        #[arg(long)]
        bands: Option<String>,

        /// Output width in pixels (default from config)
        #[arg(long)]
        width: Option<u32>,

        /// Output height in pixels (default from config)
        #[arg(long)]
        height: Option<u32>,

        /// Warp endpoint URL, overriding [endpoint] url in the config file
        #[arg(long)]
        endpoint: Option<String>,

        /// Output file path (.png)
        #[arg(long, short)]
        output: String,

        /// Print cache and download statistics after the fetch
        #[arg(long)]
        stats: bool,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch {
            bbox,
            crs,
            source,
            bands,
            width,
            height,
            endpoint,
            output,
            stats,
            debug,
        } => commands::fetch::run(FetchArgs {
            bbox,
            crs,
            source,
            bands,
            width,
            height,
            endpoint,
            output,
            stats,
            debug,
        }),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch_with_negative_bbox() {
        let cli = Cli::try_parse_from([
            "warptile",
            "fetch",
            "--bbox",
            "-10.5,20,-9.5,21",
            "--crs",
            "EPSG:4326",
            "--source",
            "scene.tif",
            "--width",
            "256",
            "-o",
            "out.png",
        ])
        .unwrap();

        match cli.command {
            Commands::Fetch {
                bbox,
                width,
                height,
                bands,
                stats,
                ..
            } => {
                assert_eq!(bbox, "-10.5,20,-9.5,21");
                assert_eq!(width, Some(256));
                assert_eq!(height, None);
                assert_eq!(bands, None);
                assert!(!stats);
            }
            Commands::Config { .. } => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_parse_fetch_stats_flag() {
        let cli = Cli::try_parse_from([
            "warptile", "fetch", "--bbox", "0,0,1,1", "--crs", "EPSG:4326", "--source", "a.tif",
            "-o", "out.png", "--stats",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Fetch { stats: true, .. }));
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::try_parse_from(["warptile", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Path
            }
        ));
    }

    #[test]
    fn test_fetch_requires_output() {
        assert!(Cli::try_parse_from([
            "warptile", "fetch", "--bbox", "0,0,1,1", "--crs", "EPSG:4326", "--source", "a.tif",
        ])
        .is_err());
    }
}
