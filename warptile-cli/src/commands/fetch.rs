//! Fetch command - fetch a single warped tile to a file.

use warptile::{Bbox, TileRequest};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub bbox: String,
    pub crs: String,
    pub source: String,
    pub bands: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub endpoint: Option<String>,
    pub output: String,
    pub stats: bool,
    pub debug: bool,
}

/// Run the fetch command.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let bbox = parse_bbox(&args.bbox)?;

    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("fetch");

    let config = runner.fetcher_config(args.endpoint.as_deref())?;
    println!("Fetching tile:");
    println!("  Endpoint: {}", config.endpoint);
    println!("  Source:   {}", args.source);
    println!("  BBox:     {} ({})", bbox, args.crs);
    println!();

    let mut request = TileRequest::new(bbox, args.crs, args.source);
    request.bands = args.bands;
    request.width = args.width;
    request.height = args.height;

    let fetcher = runner.create_fetcher(config)?;
    println!("Requesting {}", fetcher.url_for(&request));

    let start = std::time::Instant::now();
    let bitmap = runner.block_on(fetcher.fetch(&request))??;
    println!(
        "Fetched {}x{} tile in {:.2}s",
        bitmap.width(),
        bitmap.height(),
        start.elapsed().as_secs_f64()
    );

    runner.save_image(&args.output, bitmap.as_rgba())?;
    println!("✓ Saved: {}", args.output);

    if args.stats {
        println!();
        print!("{}", fetcher.cache_stats().format());
    }

    Ok(())
}

/// Parse `xmin,ymin,xmax,ymax`.
///
/// The text is passed to the endpoint untouched; it is only checked for four
/// numeric parts.
fn parse_bbox(text: &str) -> Result<Bbox, CliError> {
    let text = text.trim();
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(CliError::InvalidArgument(format!(
            "bbox '{}' must have four comma-separated values (xmin,ymin,xmax,ymax)",
            text
        )));
    }
    if let Some(bad) = parts.iter().find(|p| p.parse::<f64>().is_err()) {
        return Err(CliError::InvalidArgument(format!(
            "bbox value '{}' is not a number",
            bad
        )));
    }
    Ok(Bbox::from(text))
}
