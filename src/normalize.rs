use crate::error::HybridError;

use image::{
    ImageReader as IR,
    RgbImage,
    imageops::{ self, FilterType },
};

use std::path::Path;

pub fn load_image(path: &Path) -> Result<RgbImage, HybridError>{
    let img = IR::open(path)
        .map_err(|e| HybridError::Load{ path: path.to_path_buf(), source: e.into() })?
        .decode()
        .map_err(|e| HybridError::Load{ path: path.to_path_buf(), source: e })?;
    Ok(img.into_rgb8())
}

/// Shrink whichever image is larger to the other's exact dimensions.
///
/// "Larger" is decided by pixel count; on a tie with different shapes the
/// second image follows the first.
pub fn normalize_pair(first: RgbImage, second: RgbImage) -> (RgbImage, RgbImage){
    if first.dimensions() == second.dimensions() {
        return (first, second);
    }
    let area = |img: &RgbImage| img.width() as u64 * img.height() as u64;
    if area(&first) < area(&second) {
        let (w, h) = first.dimensions();
        log::info!("resizing second image {:?} -> ({w}, {h})", second.dimensions());
        let second = imageops::resize(&second, w, h, FilterType::Triangle);
        (first, second)
    } else if area(&second) < area(&first) {
        let (w, h) = second.dimensions();
        log::info!("resizing first image {:?} -> ({w}, {h})", first.dimensions());
        let first = imageops::resize(&first, w, h, FilterType::Triangle);
        (first, second)
    } else {
        let (w, h) = first.dimensions();
        log::info!("equal area, resizing second image {:?} -> ({w}, {h})", second.dimensions());
        let second = imageops::resize(&second, w, h, FilterType::Triangle);
        (first, second)
    }
}
