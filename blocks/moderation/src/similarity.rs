use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;

/// Every compared image is first resized to this square, ignoring aspect
/// ratio, so crops and re-encodes of the same shot still line up.
pub const STANDARD_DIM: u32 = 256;

/// Mean SSIM at or above this value marks a pair as duplicates.
pub const SSIM_THRESHOLD: f64 = 0.95;

/// Rejection message attached to a duplicate photo.
pub const DUPLICATE_MESSAGE: &str = "Photo appears to be a duplicate of another photo";

const WINDOW: u32 = 8;
const C1: f64 = 6.5025; // (0.01 * 255)^2
const C2: f64 = 58.5225; // (0.03 * 255)^2

/// A photo normalized for comparison: 256x256 fill-fit RGBA reduced to its
/// luma plane. Decoding happens once per photo, comparisons are cheap.
pub struct NormalizedImage {
    luma: Vec<f64>,
}

impl NormalizedImage {
    pub fn load(path: &Path) -> Result<NormalizedImage, String> {
        let img = image::open(path)
            .map_err(|e| format!("Image load error for {}: {}", path.display(), e))?;
        Ok(NormalizedImage::from_image(&img))
    }

    pub fn from_image(img: &DynamicImage) -> NormalizedImage {
        let rgba = img
            .resize_exact(STANDARD_DIM, STANDARD_DIM, FilterType::Triangle)
            .to_rgba8();

        let luma = rgba
            .pixels()
            .map(|p| 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64)
            .collect();

        NormalizedImage { luma }
    }

    /// Mean structural similarity over non-overlapping 8x8 windows.
    pub fn mean_ssim(&self, other: &NormalizedImage) -> f64 {
        let mut total = 0.0;
        let mut windows = 0u32;

        for wy in (0..STANDARD_DIM).step_by(WINDOW as usize) {
            for wx in (0..STANDARD_DIM).step_by(WINDOW as usize) {
                total += window_ssim(&self.luma, &other.luma, wx, wy);
                windows += 1;
            }
        }

        total / windows as f64
    }
}

/// True when the candidate is a near-duplicate of any image in `others`.
/// Comparison is symmetric and only ever runs within one user's photo set.
pub fn is_duplicate(candidate: &NormalizedImage, others: &[&NormalizedImage]) -> bool {
    others
        .iter()
        .any(|other| is_duplicate_score(candidate.mean_ssim(other)))
}

/// Threshold is inclusive: a pair sitting exactly on it counts as duplicate.
pub fn is_duplicate_score(mean_ssim: f64) -> bool {
    mean_ssim >= SSIM_THRESHOLD
}

fn window_ssim(a: &[f64], b: &[f64], wx: u32, wy: u32) -> f64 {
    let n = (WINDOW * WINDOW) as f64;

    let mut sum_a = 0.0;
    let mut sum_b = 0.0;
    let mut sum_a2 = 0.0;
    let mut sum_b2 = 0.0;
    let mut sum_ab = 0.0;

    for y in wy..wy + WINDOW {
        for x in wx..wx + WINDOW {
            let idx = (y * STANDARD_DIM + x) as usize;
            let pa = a[idx];
            let pb = b[idx];
            sum_a += pa;
            sum_b += pb;
            sum_a2 += pa * pa;
            sum_b2 += pb * pb;
            sum_ab += pa * pb;
        }
    }

    let mean_a = sum_a / n;
    let mean_b = sum_b / n;
    let var_a = sum_a2 / n - mean_a * mean_a;
    let var_b = sum_b2 / n - mean_b * mean_b;
    let cov = sum_ab / n - mean_a * mean_b;

    ((2.0 * mean_a * mean_b + C1) * (2.0 * cov + C2))
        / ((mean_a * mean_a + mean_b * mean_b + C1) * (var_a + var_b + C2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn uniform(value: u8) -> NormalizedImage {
        let img = RgbImage::from_pixel(64, 64, image::Rgb([value, value, value]));
        NormalizedImage::from_image(&DynamicImage::ImageRgb8(img))
    }

    fn gradient() -> NormalizedImage {
        let img = RgbImage::from_fn(64, 64, |x, y| {
            let v = ((x * 4) % 256) as u8 ^ ((y * 4) % 256) as u8;
            image::Rgb([v, v, v])
        });
        NormalizedImage::from_image(&DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn identical_images_are_duplicates() {
        let a = gradient();
        let b = gradient();
        assert!((a.mean_ssim(&b) - 1.0).abs() < 1e-9);
        assert!(is_duplicate(&a, &[&b]));
    }

    #[test]
    fn dissimilar_images_are_not_duplicates() {
        let a = uniform(128);
        let b = uniform(0);
        assert!(a.mean_ssim(&b) < 0.5);
        assert!(!is_duplicate(&a, &[&b]));
    }

    #[test]
    fn comparison_is_symmetric() {
        let a = gradient();
        let b = uniform(200);
        assert!((a.mean_ssim(&b) - b.mean_ssim(&a)).abs() < 1e-12);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(is_duplicate_score(SSIM_THRESHOLD));
        assert!(is_duplicate_score(0.96));
        assert!(!is_duplicate_score(0.9499));
    }

    #[test]
    fn empty_comparison_set_never_matches() {
        let a = gradient();
        assert!(!is_duplicate(&a, &[]));
    }
}
