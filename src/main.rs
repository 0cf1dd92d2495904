use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rfsignature::rendering::raster;
use rfsignature::{InputEvent, SignatureConfig, SignatureHost, SurfaceIdentifier};

/// Replay a recorded signature on a page and export it as PNG
#[derive(Parser, Debug)]
#[command(name = "rfsignature", version, about)]
struct Args {
    /// HTML page holding the signature surface
    #[arg(long)]
    page: PathBuf,

    /// Id of the surface; when omitted the fallback lookup picks one
    #[arg(long)]
    target: Option<String>,

    /// JSON array of input events to replay on the surface
    #[arg(long)]
    events: Option<PathBuf>,

    /// JSON configuration (stroke style, resolution policy)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the exported PNG to this file
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the exported data URL
    #[arg(long)]
    data_url: bool,

    /// Print the SHA-256 of the exported PNG
    #[arg(long)]
    digest: bool,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn configure_logging(verbose: u8) -> Result<()> {
    let max_level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(max_level)
            .with_writer(std::io::stderr)
            .finish(),
    )?;
    // The library logs through the `log` facade.
    tracing_log::LogTracer::init()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    configure_logging(args.verbose)?;

    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SignatureConfig::from_json(&json)?
        }
        None => SignatureConfig::default(),
    };

    let page = fs::read_to_string(&args.page)
        .with_context(|| format!("failed to read page {}", args.page.display()))?;
    let mut host = SignatureHost::from_html(&page, config);

    // An absent target goes through the fallback lookup rather than being
    // treated as "nothing".
    let identifier = match &args.target {
        Some(id) => SurfaceIdentifier::Id(id.clone()),
        None => SurfaceIdentifier::Opaque,
    };
    let surface = host
        .try_initialize(identifier)
        .context("failed to initialize the signature surface")?;

    if let Some(path) = &args.events {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read events {}", path.display()))?;
        let events: Vec<InputEvent> =
            serde_json::from_str(&json).context("events must be a JSON array of input events")?;
        let segments = host.replay(surface, &events);
        tracing::debug!("replayed {} events, {} segments drawn", events.len(), segments);
    }

    let data_url = host.try_export_image(surface)?;

    if args.data_url {
        println!("{}", data_url);
    }

    if args.out.is_some() || args.digest {
        let Some(png) = raster::decode_png_data_url(&data_url) else {
            bail!("surface has no pixels to write");
        };
        if args.digest {
            println!("{}", raster::png_digest(&png));
        }
        if let Some(out) = &args.out {
            fs::write(out, &png).with_context(|| format!("failed to write {}", out.display()))?;
        }
    }

    Ok(())
}
