use crate::source::PointSource;
use rgb::RGB8;
use snafu::prelude::*;
use std::collections::HashMap;
#[cfg(feature = "image")]
use std::ops::Deref;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ColorCountsError {
    #[snafu(display("buffer is empty"))]
    EmptyBuffer,

    #[snafu(display("buffer length {len} is not a multiple of 3"))]
    InvalidBufferLength { len: usize },
}

/// The distinct colors of an image and how many pixels carry each one.
///
/// Colors are kept in order of first appearance, so the same pixels always
/// produce the same point order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorCounts {
    colors: Vec<RGB8>,
    counts: Vec<u32>,
}

impl ColorCounts {
    /// Count colors in an interleaved RGBRGBRGB… buffer.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, ColorCountsError> {
        ensure!(!buf.is_empty(), EmptyBufferSnafu);
        ensure!(
            buf.len().is_multiple_of(3),
            InvalidBufferLengthSnafu { len: buf.len() }
        );

        let mut index = HashMap::<[u8; 3], usize>::new();
        let mut result = ColorCounts::default();

        for pixel in buf.chunks_exact(3) {
            let key = [pixel[0], pixel[1], pixel[2]];
            match index.get(&key) {
                Some(&i) => result.counts[i] += 1,
                None => {
                    index.insert(key, result.colors.len());
                    result.colors.push(RGB8::new(key[0], key[1], key[2]));
                    result.counts.push(1);
                }
            }
        }

        Ok(result)
    }

    pub fn colors(&self) -> &[RGB8] {
        &self.colors
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn pixels(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

impl PointSource for ColorCounts {
    fn len(&self) -> usize {
        self.colors.len()
    }

    fn coordinates_at(&self, index: usize) -> Option<[f64; 3]> {
        self.colors
            .get(index)
            .map(|c| [c.r as f64, c.g as f64, c.b as f64])
    }

    fn weight_at(&self, index: usize) -> f64 {
        self.counts.get(index).map_or(0.0, |&c| c as f64)
    }
}

#[cfg(feature = "image")]
impl<'a, Container> TryFrom<&'a image::ImageBuffer<image::Rgb<u8>, Container>> for ColorCounts
where
    Container: Deref<Target = [<image::Rgb<u8> as image::Pixel>::Subpixel]> + 'a,
{
    type Error = ColorCountsError;

    fn try_from(img: &'a image::ImageBuffer<image::Rgb<u8>, Container>) -> Result<Self, Self::Error> {
        Self::from_bytes(img.as_raw().deref())
    }
}
