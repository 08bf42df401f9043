use sdl2::{
    VideoSubsystem,
    video::{ Window, WindowContext },
    render::{ Canvas, TextureCreator, Texture },
    pixels::{ PixelFormatEnum, Color },
    rect::Rect,
};

use image::RgbImage;

pub const TRACKBAR_HEIGHT: u32 = 24;
const TRACK_MARGIN: i32 = 8;
const KNOB_WIDTH: u32 = 6;

/// Integer slider drawn as a horizontal strip. The value never leaves `[0, max]`.
#[derive(Debug, Clone)]
pub struct Trackbar{
    pub label: &'static str,
    value: usize,
    max: usize,
}

impl Trackbar{
    pub fn new(label: &'static str, max: usize) -> Self{
        Self{ label, value: 0, max }
    }

    pub fn value(&self) -> usize{ self.value }
    pub fn max(&self) -> usize{ self.max }

    /// Returns whether the value changed.
    pub fn set(&mut self, value: usize) -> bool{
        let value = value.min(self.max);
        let changed = value != self.value;
        self.value = value;
        changed
    }

    pub fn step(&mut self, delta: i64) -> bool{
        let value = (self.value as i64 + delta).max(0) as usize;
        self.set(value)
    }
}

fn track_span(width: u32) -> (i32, i32){
    let right = (width as i32 - TRACK_MARGIN).max(TRACK_MARGIN + 1);
    (TRACK_MARGIN, right)
}

/// Nearest slider value for a click at `x` on a track `width` pixels wide.
fn value_at(x: i32, width: u32, max: usize) -> usize{
    let (left, right) = track_span(width);
    let x = x.clamp(left, right);
    let t = (x - left) as f32 / (right - left) as f32;
    (t * max as f32).round() as usize
}

fn knob_x(value: usize, width: u32, max: usize) -> i32{
    let (left, right) = track_span(width);
    if max == 0 { return left; }
    left + ((right - left) as f32 * value as f32 / max as f32) as i32
}

/// Which trackbar strip holds window row `y`.
fn bar_index(y: i32, bars: usize) -> Option<usize>{
    if y < 0 { return None; }
    let i = y as usize / TRACKBAR_HEIGHT as usize;
    (i < bars).then_some(i)
}

pub struct ImageWindow{
    pub canvas: Canvas<Window>,
    pub texture_creator: TextureCreator<WindowContext>,
    pub texture: Option<(Texture, u32, u32)>,
    pub bars: Vec<Trackbar>,
    title: String,
}

impl ImageWindow{
    pub fn create(video: &VideoSubsystem, title: &str, w: u32, h: u32, x: i32) -> Result<Self, String>{
        let window = video
            .window(title, w.max(1), h.max(1))
            .position(x, 32)
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = canvas.texture_creator();
        Ok(Self{
            canvas,
            texture_creator,
            texture: None,
            bars: Vec::new(),
            title: title.to_string(),
        })
    }

    pub fn id(&self) -> u32{
        self.canvas.window().id()
    }

    pub fn add_trackbar(&mut self, label: &'static str, max: usize){
        self.bars.push(Trackbar::new(label, max));
    }

    fn top(&self) -> i32{
        (self.bars.len() as u32 * TRACKBAR_HEIGHT) as i32
    }

    /// Show `status` after the base title.
    pub fn set_status(&mut self, status: &str) -> Result<(), String>{
        let title = if status.is_empty() { self.title.clone() } else { format!("{} - {}", self.title, status) };
        self.canvas.window_mut().set_title(&title).map_err(|e| e.to_string())
    }

    /// Trackbar labels and values, e.g. `Hybrid 3/7, Zoom 0/4`.
    pub fn bar_status(&self) -> String{
        self.bars.iter()
            .map(|b| format!("{} {}/{}", b.label, b.value(), b.max()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Size the image area to `w x h`, keeping room for the trackbars.
    pub fn fit_to(&mut self, w: u32, h: u32) -> Result<(), String>{
        let h = h + self.top() as u32;
        let window = self.canvas.window_mut();
        if window.size() != (w, h) {
            window.set_size(w.max(1), h.max(1)).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    pub fn set_image(&mut self, img: &RgbImage) -> Result<(), String>{
        let (imgw, imgh) = img.dimensions();
        let reuse = matches!(&self.texture, Some((_, w, h)) if (*w, *h) == (imgw, imgh));
        if !reuse {
            let texture = self
                .texture_creator
                .create_texture_streaming(PixelFormatEnum::RGB24, imgw, imgh)
                .map_err(|e| e.to_string())?;
            if let Some((old, _, _)) = self.texture.replace((texture, imgw, imgh)) {
                // SAFETY: the renderer that owns `old` is still alive and `old` is not used again.
                unsafe { old.destroy(); }
            }
        }
        if let Some((texture, _, _)) = &mut self.texture {
            texture.update(None, img.as_raw(), 3 * imgw as usize).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    pub fn draw(&mut self) -> Result<(), String>{
        self.canvas.set_draw_color(Color::RGB(0, 0, 0));
        self.canvas.clear();
        let (winw, _) = self.canvas.window().size();
        for (i, bar) in self.bars.iter().enumerate() {
            let y = i as i32 * TRACKBAR_HEIGHT as i32;
            let (left, right) = track_span(winw);
            let mid = y + TRACKBAR_HEIGHT as i32 / 2;
            self.canvas.set_draw_color(Color::RGB(40, 40, 40));
            self.canvas.fill_rect(Rect::new(0, y, winw, TRACKBAR_HEIGHT))?;
            self.canvas.set_draw_color(Color::RGB(110, 110, 110));
            self.canvas.fill_rect(Rect::new(left, mid - 2, (right - left) as u32, 4))?;
            let knob = knob_x(bar.value, winw, bar.max);
            self.canvas.set_draw_color(Color::RGB(90, 160, 230));
            self.canvas.fill_rect(Rect::new(left, mid - 2, (knob - left).max(0) as u32, 4))?;
            self.canvas.set_draw_color(Color::RGB(255, 255, 255));
            self.canvas.fill_rect(Rect::new(knob - KNOB_WIDTH as i32 / 2, y + 4, KNOB_WIDTH, TRACKBAR_HEIGHT - 8))?;
        }
        let top = self.top();
        if let Some((texture, imgw, imgh)) = &self.texture {
            self.canvas.copy(texture, None, Some(Rect::new(0, top, *imgw, *imgh)))?;
        }
        self.canvas.present();
        Ok(())
    }

    /// Trackbar under window row `y`, if any.
    pub fn bar_at(&self, y: i32) -> Option<usize>{
        bar_index(y, self.bars.len())
    }

    /// Move trackbar `bar` to the value under column `x`. Returns the new value if it changed.
    pub fn drag_bar(&mut self, bar: usize, x: i32) -> Option<usize>{
        let (winw, _) = self.canvas.window().size();
        let tb = self.bars.get_mut(bar)?;
        let value = value_at(x, winw, tb.max);
        tb.set(value).then_some(value)
    }
}
