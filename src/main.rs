use batch_watermark::imaging::Anchor;
use batch_watermark::{config, output, process, scan};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "watermark")]
#[command(about = "Batch-apply text and image watermarks to photos")]
#[command(long_about = "\
Batch-apply text and image watermarks to photos

Each input gets a watermarked copy beside it, named <stem>_watermarked<ext>,
in the same format. Originals are never modified.

Placement:
  Fixed      One watermark at a corner or the centre, 10px from the edges.
             Text and image are each rotated and placed independently.
  Tiled      --tile-spacing N repeats the watermark on an N-pixel grid
             across the whole image.

Settings are read from ./watermark.toml (or --config FILE) and overridden
by flags. Run 'watermark gen-config' to generate a documented file.")]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ApplyArgs {
    /// Image files and/or directories to watermark
    inputs: Vec<PathBuf>,

    /// Watermark text
    #[arg(long)]
    text: Option<String>,

    /// Watermark image (resized to 100x100)
    #[arg(long)]
    image: Option<PathBuf>,

    /// Opacity in percent
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    opacity: Option<u32>,

    /// Counter-clockwise rotation in degrees
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=359))]
    angle: Option<u32>,

    /// Anchor for a single watermark
    #[arg(long, conflicts_with = "tile_spacing")]
    position: Option<Anchor>,

    /// Repeat the watermark on a grid with this pitch in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    tile_spacing: Option<u32>,

    /// Integer magnification of the built-in font
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    text_scale: Option<u32>,

    /// Appended to each output file stem
    #[arg(long)]
    suffix: Option<String>,

    /// Write outputs here instead of beside each original
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// JPEG quality
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Include images in subdirectories of directory inputs
    #[arg(long, short)]
    recursive: bool,

    /// Config file (default: ./watermark.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the batch report as JSON instead of progress lines
    #[arg(long)]
    json: bool,
}

impl ApplyArgs {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            text: self.text.clone(),
            image: self.image.clone(),
            opacity: self.opacity,
            angle: self.angle,
            position: self.position,
            tile_spacing: self.tile_spacing,
            text_scale: self.text_scale,
            suffix: self.suffix.clone(),
            out_dir: self.out_dir.clone(),
            quality: self.quality,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Watermark a batch of images
    Apply(ApplyArgs),
    /// Print a stock watermark.toml with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => {}
        // Some files failed; the summary already named them
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}

/// Returns whether every file in the batch was written.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Apply(args) => {
            let cwd = std::env::current_dir()?;
            let config = config::load_config(args.config.as_deref(), &cwd, &args.overrides())?;
            debug!(?config, "resolved config");

            let files = scan::collect_inputs(&args.inputs, args.recursive)?;
            let spec = config.spec();
            let options = config.batch_options();

            let report = if args.json {
                process::process(&files, &spec, &options, None)?
            } else {
                let (tx, rx) = std::sync::mpsc::channel();
                let printer = std::thread::spawn(move || {
                    for event in rx {
                        output::print_process_event(&event);
                    }
                });
                let result = process::process(&files, &spec, &options, Some(tx));
                printer.join().ok();
                result?
            };

            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_summary(&report);
            }

            Ok(report.is_success())
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(true)
        }
    }
}
