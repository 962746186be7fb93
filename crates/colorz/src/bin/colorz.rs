use clap::Parser;
use colorz::{Config, EmptyCentroid, Weighting, palette_from_image, rng};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Print the dominant colors of an image as #rrggbb swatches.
#[derive(Parser)]
struct Args {
    /// Image file (PNG, JPEG or GIF)
    image: PathBuf,

    /// Number of colors
    #[arg(short, default_value_t = 4)]
    k: usize,

    /// Weight each distinct color by how many pixels carry it
    #[arg(long)]
    weighted: bool,

    /// Fail instead of freezing a color that loses all its pixels
    #[arg(long)]
    strict: bool,

    /// Greedy k-means++ candidates per seeding step
    #[arg(long, default_value_t = 1)]
    candidates: usize,

    /// Refinement iteration cap, 0 for none
    #[arg(long, default_value_t = colorz::DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Random seed for centroid seeding
    #[arg(long, default_value_t = rng::RANDOM_SEED)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorz=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    let config = Config::default()
        .with_weighting(if args.weighted {
            Weighting::Frequency
        } else {
            Weighting::Distinct
        })
        .with_empty_centroid(if args.strict {
            EmptyCentroid::Fail
        } else {
            EmptyCentroid::Freeze
        })
        .with_seeding_candidates(args.candidates)
        .with_max_iterations((args.max_iterations > 0).then_some(args.max_iterations));

    let t = Instant::now();
    let img = image::open(&args.image)?.to_rgb8();
    info!(width = img.width(), height = img.height(), "decoded image");

    let swatches = palette_from_image(&img, args.k, config, &mut rng::from_seed(args.seed))?;
    info!(elapsed = ?t.elapsed(), "clustered");

    for c in swatches {
        println!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b);
    }
    Ok(())
}
