use crate::{
    blend::{ Selection, compose_hybrid, zoom },
    pyramid::Pyramid,
};

use image::{ ImageResult, RgbImage };

use std::path::Path;

/// Everything the slider callbacks read and write.
///
/// Pyramids are built once; the hybrid and zoom images are replaced on every
/// level change.
pub struct HybridApp{
    first: RgbImage,
    second: RgbImage,
    first_pyr: Pyramid,
    second_pyr: Pyramid,
    selection: Selection,
    max_zoom: usize,
    hybrid_level: usize,
    zoom_level: usize,
    hybrid: RgbImage,
    zoomed: RgbImage,
}

impl HybridApp{
    /// Build both pyramids. `first` and `second` must already share dimensions.
    /// The first image is dominant until [`HybridApp::select`] says otherwise.
    pub fn new(first: RgbImage, second: RgbImage, levels: usize, max_zoom: usize) -> Self{
        debug_assert_eq!(first.dimensions(), second.dimensions());
        let first_pyr = Pyramid::build(&first, levels);
        let second_pyr = Pyramid::build(&second, levels);
        let hybrid = first.clone();
        let zoomed = hybrid.clone();
        Self{
            first, second, first_pyr, second_pyr,
            selection: Selection::First,
            max_zoom: max_zoom.min(levels.max(1)),
            hybrid_level: 0,
            zoom_level: 0,
            hybrid, zoomed,
        }
    }

    pub fn levels(&self) -> usize{ self.first_pyr.levels() }
    pub fn max_hybrid(&self) -> usize{ self.levels() - 1 }
    pub fn max_zoom(&self) -> usize{ self.max_zoom }
    pub fn hybrid_level(&self) -> usize{ self.hybrid_level }
    pub fn zoom_level(&self) -> usize{ self.zoom_level }
    pub fn selection(&self) -> Selection{ self.selection }
    pub fn first(&self) -> &RgbImage{ &self.first }
    pub fn second(&self) -> &RgbImage{ &self.second }
    pub fn hybrid(&self) -> &RgbImage{ &self.hybrid }
    pub fn zoomed(&self) -> &RgbImage{ &self.zoomed }

    /// Make `selection` the dominant image and recompose at the current levels.
    pub fn select(&mut self, selection: Selection) -> &RgbImage{
        self.selection = selection;
        self.set_hybrid_level(self.hybrid_level)
    }

    /// Recompose at `level` (clamped) and redo the current zoom on top of it.
    pub fn set_hybrid_level(&mut self, level: usize) -> &RgbImage{
        self.hybrid_level = level.min(self.max_hybrid());
        let (dominant, other) = self.selection.pick(&self.first_pyr, &self.second_pyr);
        self.hybrid = compose_hybrid(dominant, other, self.hybrid_level);
        log::debug!("hybrid level {} ({} dominant)", self.hybrid_level, self.selection);
        self.refresh_zoom()
    }

    /// Downsample the current hybrid `level` (clamped) times. The hybrid itself is untouched.
    pub fn set_zoom_level(&mut self, level: usize) -> &RgbImage{
        self.zoom_level = level.min(self.max_zoom);
        log::debug!("zoom level {}", self.zoom_level);
        self.refresh_zoom()
    }

    fn refresh_zoom(&mut self) -> &RgbImage{
        self.zoomed = zoom(&self.hybrid, self.zoom_level);
        &self.zoomed
    }

    pub fn save(&self, path: &Path) -> ImageResult<()>{
        self.hybrid.save(path)
    }
}

#[cfg(test)]
mod tests{

    use super::*;
    use crate::{
        normalize::normalize_pair,
        pyramid::{ to_rgb8, pyr_up, add },
    };
    use image::Rgb;

    fn stripes(w: u32, h: u32) -> RgbImage{
        RgbImage::from_fn(w, h, |x, _| if (x / 2) % 2 == 0 { Rgb([250, 250, 250]) } else { Rgb([5, 5, 5]) })
    }

    fn blob(w: u32, h: u32) -> RgbImage{
        RgbImage::from_fn(w, h, |x, y| {
            let dx = x as f32 - w as f32 / 2.0;
            let dy = y as f32 - h as f32 / 2.0;
            let v = (255.0 - (dx * dx + dy * dy).sqrt() * 2.0).max(0.0) as u8;
            Rgb([v, v / 2, 255 - v])
        })
    }

    fn ready(first: RgbImage, second: RgbImage, levels: usize, max_zoom: usize, selection: Selection) -> HybridApp{
        let mut app = HybridApp::new(first, second, levels, max_zoom);
        app.select(selection);
        app
    }

    #[test]
    fn test_initial_state(){
        let app = ready(blob(32, 32), stripes(32, 32), 8, 4, Selection::Second);
        assert_eq!(app.levels(), 8);
        assert_eq!(app.max_hybrid(), 7);
        assert_eq!(app.hybrid(), &stripes(32, 32));
        assert_eq!(app.zoomed(), app.hybrid());
        assert_eq!(app.selection(), Selection::Second);
        assert_eq!(app.first(), &blob(32, 32));
        assert_eq!(app.second(), &stripes(32, 32));
    }

    #[test]
    fn test_select_keeps_level(){
        let mut app = HybridApp::new(blob(32, 32), stripes(32, 32), 6, 4);
        assert_eq!(app.hybrid(), &blob(32, 32));
        app.set_hybrid_level(2);
        let first_dominant = app.hybrid().clone();
        app.select(Selection::Second);
        assert_eq!(app.hybrid_level(), 2);
        assert_ne!(app.hybrid(), &first_dominant);
        app.select(Selection::First);
        assert_eq!(app.hybrid(), &first_dominant);
    }

    #[test]
    fn test_levels_are_clamped(){
        let mut app = ready(blob(32, 32), stripes(32, 32), 5, 9, Selection::First);
        assert_eq!(app.max_zoom(), 5);
        app.set_hybrid_level(42);
        assert_eq!(app.hybrid_level(), 4);
        app.set_zoom_level(42);
        assert_eq!(app.zoom_level(), 5);
    }

    #[test]
    fn test_zoom_does_not_touch_hybrid(){
        let mut app = ready(blob(64, 64), stripes(64, 64), 8, 4, Selection::First);
        app.set_hybrid_level(3);
        let hybrid = app.hybrid().clone();
        assert_eq!(app.set_zoom_level(2).dimensions(), (16, 16));
        assert_eq!(app.hybrid(), &hybrid);
        assert_eq!(app.set_zoom_level(0), &hybrid);
    }

    #[test]
    fn test_hybrid_change_keeps_zoom(){
        let mut app = ready(blob(64, 64), stripes(64, 64), 8, 4, Selection::First);
        app.set_zoom_level(1);
        app.set_hybrid_level(2);
        assert_eq!(app.zoom_level(), 1);
        assert_eq!(app.zoomed().dimensions(), (32, 32));
        assert_eq!(app.hybrid().dimensions(), (64, 64));
    }

    #[test]
    fn test_hybrid_back_to_zero(){
        let mut app = ready(blob(40, 24), stripes(40, 24), 8, 4, Selection::First);
        app.set_hybrid_level(6);
        assert_ne!(app.hybrid(), &blob(40, 24));
        app.set_hybrid_level(0);
        assert_eq!(app.hybrid(), &blob(40, 24));
    }

    #[test]
    fn test_scenario(){
        let (first, second) = normalize_pair(blob(256, 256), stripes(512, 512));
        assert_eq!(second.dimensions(), (256, 256));

        let mut app = ready(first.clone(), second.clone(), 8, 4, Selection::First);
        let first_pyr = Pyramid::build(&first, 8);
        let second_pyr = Pyramid::build(&second, 8);
        assert_eq!(first_pyr.laplacians().len(), 7);

        // level 3 base of image 1, details 2, 1, 0 of image 2
        let mut acc = first_pyr.gaussian(3).clone();
        for i in (0..3).rev() {
            let detail = second_pyr.laplacian(i);
            acc = add(&pyr_up(&acc, detail.width(), detail.height()), detail);
        }
        let hybrid = app.set_hybrid_level(3).clone();
        assert_eq!(hybrid, to_rgb8(&acc));

        let shown = app.set_zoom_level(2);
        assert_eq!(shown.dimensions(), (64, 64));
        assert_eq!(app.hybrid(), &hybrid);
    }
}
