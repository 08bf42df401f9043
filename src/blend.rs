use crate::pyramid::{ Pyramid, FloatImage, add, pyr_down, pyr_up, to_float, to_rgb8 };

use image::RgbImage;

use std::fmt;

/// Which source supplies the low frequency base of the hybrid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection{
    First,
    Second,
}

impl Selection{
    pub fn from_char(c: char) -> Option<Self>{
        match c {
            '1' => Some(Selection::First),
            '2' => Some(Selection::Second),
            _ => None,
        }
    }

    /// Order the pair as (dominant, other).
    pub fn pick<'a, T>(self, first: &'a T, second: &'a T) -> (&'a T, &'a T){
        match self {
            Selection::First => (first, second),
            Selection::Second => (second, first),
        }
    }
}

impl fmt::Display for Selection{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result{
        match self {
            Selection::First => write!(f, "first"),
            Selection::Second => write!(f, "second"),
        }
    }
}

/// Collapse `base` back to full size, adding `details` from coarse to fine.
/// `details[i]` must have the dimensions of pyramid level `i`.
pub fn collapse(base: &FloatImage, details: &[FloatImage]) -> FloatImage{
    details.iter().rev().fold(base.clone(), |acc, detail| {
        let up = pyr_up(&acc, detail.width(), detail.height());
        add(&up, detail)
    })
}

/// Dominant Gaussian level `level` plus the other image's Laplacian levels `0..level`.
pub fn compose_hybrid(dominant: &Pyramid, other: &Pyramid, level: usize) -> RgbImage{
    let level = level.min(dominant.levels() - 1).min(other.laplacians().len());
    let hybrid = collapse(dominant.gaussian(level), &other.laplacians()[..level]);
    to_rgb8(&hybrid)
}

/// Apply `steps` pyramid downsamples to a copy of `img`.
pub fn zoom(img: &RgbImage, steps: usize) -> RgbImage{
    if steps == 0 {
        return img.clone();
    }
    let mut out = to_float(img);
    for _ in 0..steps {
        out = pyr_down(&out);
    }
    to_rgb8(&out)
}
