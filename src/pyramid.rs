use image::{ImageBuffer, RgbImage, Rgb32FImage};

/// Pyramid levels keep the 0..=255 scale of the source in f32, signed for residuals.
pub type FloatImage = Rgb32FImage;

const CHANNELS: usize = 3;
// 5-tap binomial, sums to 16
const KERNEL: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];

#[inline]
fn at(x: usize, y: usize, w: usize, c: usize) -> usize{
    (y * w + x) * CHANNELS + c
}

/// Mirror an out of range index without repeating the edge sample (`gfedcb|abcdefgh|gfedcba`).
fn reflect101(mut i: i64, n: usize) -> usize{
    let n = n as i64;
    if n == 1 { return 0; }
    while i < 0 || i >= n {
        if i < 0 { i = -i; }
        if i >= n { i = 2 * n - 2 - i; }
    }
    i as usize
}

#[inline]
fn clamp_index(i: usize, n: usize) -> usize{
    i.min(n - 1)
}

fn from_raw(w: u32, h: u32, data: Vec<f32>) -> FloatImage{
    ImageBuffer::from_raw(w, h, data)
        .unwrap_or_else(|| ImageBuffer::new(w, h))
}

pub fn to_float(img: &RgbImage) -> FloatImage{
    let data = img.as_raw().iter().map(|v| *v as f32).collect();
    from_raw(img.width(), img.height(), data)
}

/// Round and saturate into 8 bits.
pub fn to_rgb8(img: &FloatImage) -> RgbImage{
    let data = img.as_raw().iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    ImageBuffer::from_raw(img.width(), img.height(), data)
        .unwrap_or_else(|| ImageBuffer::new(img.width(), img.height()))
}

pub fn add(a: &FloatImage, b: &FloatImage) -> FloatImage{
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let data = a.as_raw().iter().zip(b.as_raw()).map(|(x, y)| x + y).collect();
    from_raw(a.width(), a.height(), data)
}

pub fn sub(a: &FloatImage, b: &FloatImage) -> FloatImage{
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let data = a.as_raw().iter().zip(b.as_raw()).map(|(x, y)| x - y).collect();
    from_raw(a.width(), a.height(), data)
}

/// Blur with the binomial kernel and drop every odd row and column.
/// Output is `ceil(w / 2) x ceil(h / 2)`.
pub fn pyr_down(src: &FloatImage) -> FloatImage{
    let (sw, sh) = (src.width() as usize, src.height() as usize);
    let (dw, dh) = ((sw + 1) / 2, (sh + 1) / 2);
    if sw == 0 || sh == 0 {
        return FloatImage::new(dw as u32, dh as u32);
    }
    let s = src.as_raw();

    let mut tmp = vec![0.0f32; dw * sh * CHANNELS];
    for y in 0..sh {
        for dx in 0..dw {
            for c in 0..CHANNELS {
                let mut acc = 0.0;
                for (k, wgt) in KERNEL.iter().enumerate() {
                    let x = reflect101(2 * dx as i64 + k as i64 - 2, sw);
                    acc += wgt * s[at(x, y, sw, c)];
                }
                tmp[at(dx, y, dw, c)] = acc / 16.0;
            }
        }
    }

    let mut out = vec![0.0f32; dw * dh * CHANNELS];
    for dy in 0..dh {
        for x in 0..dw {
            for c in 0..CHANNELS {
                let mut acc = 0.0;
                for (k, wgt) in KERNEL.iter().enumerate() {
                    let y = reflect101(2 * dy as i64 + k as i64 - 2, sh);
                    acc += wgt * tmp[at(x, y, dw, c)];
                }
                out[at(x, dy, dw, c)] = acc / 16.0;
            }
        }
    }
    from_raw(dw as u32, dh as u32, out)
}

// Even outputs land on a source sample (1 6 1), odd ones sit between two (4 4).
fn interp(get: impl Fn(usize) -> f32, d: usize, n: usize) -> f32{
    let i = d / 2;
    if d % 2 == 0 {
        let prev = get(clamp_index(i.saturating_sub(1), n));
        let next = get(clamp_index(i + 1, n));
        (prev + 6.0 * get(clamp_index(i, n)) + next) / 8.0
    } else {
        (4.0 * get(clamp_index(i, n)) + 4.0 * get(clamp_index(i + 1, n))) / 8.0
    }
}

/// Upsample to exactly `w x h`: zero insertion followed by the binomial kernel scaled by 4.
pub fn pyr_up(src: &FloatImage, w: u32, h: u32) -> FloatImage{
    let (sw, sh) = (src.width() as usize, src.height() as usize);
    let (dw, dh) = (w as usize, h as usize);
    if sw == 0 || sh == 0 {
        return FloatImage::new(w, h);
    }
    let s = src.as_raw();

    let mut tmp = vec![0.0f32; dw * sh * CHANNELS];
    for y in 0..sh {
        for x in 0..dw {
            for c in 0..CHANNELS {
                tmp[at(x, y, dw, c)] = interp(|i| s[at(i, y, sw, c)], x, sw);
            }
        }
    }

    let mut out = vec![0.0f32; dw * dh * CHANNELS];
    for y in 0..dh {
        for x in 0..dw {
            for c in 0..CHANNELS {
                out[at(x, y, dw, c)] = interp(|i| tmp[at(x, i, dw, c)], y, sh);
            }
        }
    }
    from_raw(w, h, out)
}

/// Gaussian and Laplacian pyramids of one image.
///
/// `gaussian` has `levels` entries, halving per level. `laplacian[i]` is
/// `gaussian[i] - pyr_up(gaussian[i + 1])` at the size of level `i`, so there is
/// one residual fewer than there are Gaussian levels.
#[derive(Debug, Clone)]
pub struct Pyramid{
    gaussian: Vec<FloatImage>,
    laplacian: Vec<FloatImage>,
}

impl Pyramid{
    pub fn build(src: &RgbImage, levels: usize) -> Self{
        let levels = levels.max(1);
        let mut gaussian = Vec::with_capacity(levels);
        let mut laplacian = Vec::with_capacity(levels - 1);

        gaussian.push(to_float(src));
        for i in 0..levels - 1 {
            let fine = &gaussian[i];
            let coarse = pyr_down(fine);
            let expanded = pyr_up(&coarse, fine.width(), fine.height());
            laplacian.push(sub(fine, &expanded));
            gaussian.push(coarse);
        }

        Self{ gaussian, laplacian }
    }

    pub fn levels(&self) -> usize{
        self.gaussian.len()
    }

    pub fn gaussian(&self, level: usize) -> &FloatImage{
        &self.gaussian[level]
    }

    pub fn laplacian(&self, level: usize) -> &FloatImage{
        &self.laplacian[level]
    }

    pub fn laplacians(&self) -> &[FloatImage]{
        &self.laplacian
    }
}

#[cfg(test)]
mod tests{

    use super::*;
    use image::Rgb;

    fn gradient(w: u32, h: u32) -> RgbImage{
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x * y) % 256) as u8])
        })
    }

    fn max_abs_diff(a: &FloatImage, b: &FloatImage) -> f32{
        a.as_raw().iter().zip(b.as_raw())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_reflect101(){
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
        assert_eq!(reflect101(-2, 2), 0);
        assert_eq!(reflect101(3, 1), 0);
    }

    #[test]
    fn test_level_dims(){
        let pyr = Pyramid::build(&gradient(64, 48), 4);
        assert_eq!(pyr.levels(), 4);
        assert_eq!(pyr.laplacians().len(), 3);
        let dims: Vec<_> = (0..4).map(|i| pyr.gaussian(i).dimensions()).collect();
        assert_eq!(dims, vec![(64, 48), (32, 24), (16, 12), (8, 6)]);
        for i in 0..3 {
            assert_eq!(pyr.laplacian(i).dimensions(), pyr.gaussian(i).dimensions());
        }

        let pyr = Pyramid::build(&gradient(5, 3), 4);
        let dims: Vec<_> = (0..4).map(|i| pyr.gaussian(i).dimensions()).collect();
        assert_eq!(dims, vec![(5, 3), (3, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn test_level_zero_is_source(){
        let src = gradient(20, 10);
        let pyr = Pyramid::build(&src, 3);
        assert_eq!(to_rgb8(pyr.gaussian(0)), src);
    }

    #[test]
    fn test_constant_image_has_flat_residuals(){
        let src = RgbImage::from_pixel(33, 17, Rgb([90, 120, 200]));
        let pyr = Pyramid::build(&src, 5);
        for i in 0..4 {
            assert!(pyr.laplacian(i).as_raw().iter().all(|v| v.abs() < 1e-3));
        }
        for p in pyr.gaussian(4).pixels() {
            assert!((p.0[0] - 90.0).abs() < 1e-3);
            assert!((p.0[2] - 200.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_reconstruction_identity(){
        let pyr = Pyramid::build(&gradient(37, 29), 5);
        for i in 0..4 {
            let fine = pyr.gaussian(i);
            let up = pyr_up(pyr.gaussian(i + 1), fine.width(), fine.height());
            let rebuilt = add(&up, pyr.laplacian(i));
            assert!(max_abs_diff(&rebuilt, fine) < 1e-3, "level {i}");
        }
    }

    #[test]
    fn test_residuals_can_be_negative(){
        let src = RgbImage::from_fn(16, 16, |x, _| if x % 2 == 0 { Rgb([255; 3]) } else { Rgb([0; 3]) });
        let pyr = Pyramid::build(&src, 2);
        assert!(pyr.laplacian(0).as_raw().iter().any(|v| *v < 0.0));
    }

    #[test]
    fn test_to_rgb8_saturates(){
        let img = from_raw(2, 1, vec![300.0, -5.0, 12.5, 0.4, 254.6, 128.0]);
        assert_eq!(to_rgb8(&img).as_raw(), &vec![255, 0, 13, 0, 255, 128]);
    }

    #[test]
    fn test_pyr_up_exact_size(){
        let small = to_float(&gradient(4, 3));
        assert_eq!(pyr_up(&small, 7, 5).dimensions(), (7, 5));
        assert_eq!(pyr_up(&small, 8, 6).dimensions(), (8, 6));
    }
}
