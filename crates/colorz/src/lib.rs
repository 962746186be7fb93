#[cfg(feature = "_debug")]
pub mod kmeans;
#[cfg(not(feature = "_debug"))]
mod kmeans;
pub mod rng;

mod color_counts;
mod source;
mod types;

pub use color_counts::{ColorCounts, ColorCountsError};
pub use kmeans::{
    Config, DEFAULT_MAX_ITERATIONS, EmptyCentroid, Kmeans, KmeansError, RunStats, Weighting,
};
use rand::RngExt;
pub use rgb::RGB8;
use snafu::prelude::*;
pub use source::PointSource;
#[cfg(feature = "image")]
use tracing::debug;
pub use types::{Centroid, Point3, Sample};

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum PaletteError {
    #[snafu(display("cannot count colors: {source}"), context(false))]
    ColorCounts { source: ColorCountsError },

    #[snafu(display("cannot cluster colors: {source}"), context(false))]
    Kmeans { source: KmeansError },
}

/// Reduce an RGB byte buffer to `k` representative colors.
///
/// ```
/// let palette = colorz::palette(
///     &[255, 0, 0, 0, 255, 0,
///       255, 0, 0, 255, 0, 0],
///     2,
/// ).unwrap();
///
/// assert_eq!(palette.len(), 2);
/// assert!(palette.contains(&colorz::RGB8::new(255, 0, 0)));
/// assert!(palette.contains(&colorz::RGB8::new(0, 255, 0)));
/// ```
///
/// The buffer must be non-empty, and its length must be a multiple of 3. The
/// byte layout is assumed to be RGBRGBRGB…. Each distinct color counts once,
/// however many pixels share it; see [`palette_extra`] for frequency
/// weighting and the other tuning knobs.
///
/// Exactly `k` colors are returned, in centroid order. When the image has
/// fewer than `k` distinct colors some of them repeat.
pub fn palette(buf: &[u8], k: usize) -> Result<Vec<RGB8>, PaletteError> {
    let counts = ColorCounts::from_bytes(buf)?;
    let mut rng = rng::new();
    Ok(palette_extra(&counts, k, Config::default(), &mut rng)?)
}

/// [`palette_extra`] over the distinct colors of a decoded image.
///
/// Fails with [`PaletteError::ColorCounts`] if the image has no pixels.
#[cfg(feature = "image")]
pub fn palette_from_image(
    img: &image::RgbImage,
    k: usize,
    config: Config,
    rng: &mut impl RngExt,
) -> Result<Vec<RGB8>, PaletteError> {
    let counts = ColorCounts::try_from(img)?;
    debug!(
        pixels = counts.pixels(),
        distinct = counts.colors().len(),
        "counted colors"
    );
    Ok(palette_extra(&counts, k, config, rng)?)
}

/// Seed, cluster and return the centroids of any point source as swatches.
pub fn palette_extra<S: PointSource + ?Sized>(
    source: &S,
    k: usize,
    config: Config,
    rng: &mut impl RngExt,
) -> Result<Vec<RGB8>, KmeansError> {
    let mut km = Kmeans::with_config(source, config)?;
    km.run(rng, k)?;
    Ok(km.centroids().iter().map(Centroid::to_rgb8).collect())
}
