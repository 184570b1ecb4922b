//! Local pixel transforms over the three-channel working image.
//!
//! Convolutions use reflect-101 borders (`dcb|abcd|cba`) and saturate to
//! `0..=255`, matching the usual desktop image-processing defaults.

use image::{imageops, Rgb, RgbImage};

/// 3x3 sharpening kernel: centre 9, neighbours -1. Weights sum to 1.
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 9, -1], [-1, -1, -1]];

/// Side length of the Gaussian blur kernel.
pub const BLUR_KERNEL_SIZE: usize = 15;

/// Mirror across the horizontal axis.
pub fn flip_vertical(img: &RgbImage) -> RgbImage {
    imageops::flip_vertical(img)
}

/// Mirror across the vertical axis.
pub fn flip_horizontal(img: &RgbImage) -> RgbImage {
    imageops::flip_horizontal(img)
}

pub fn sharpen(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    let (wi, hi) = (i64::from(w), i64::from(h));
    RgbImage::from_fn(w, h, |x, y| {
        let mut acc = [0i32; 3];
        for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
            let sy = reflect_101(i64::from(y) + ky as i64 - 1, hi);
            for (kx, weight) in row.iter().enumerate() {
                let sx = reflect_101(i64::from(x) + kx as i64 - 1, wi);
                let px = img.get_pixel(sx, sy);
                for (c, sum) in acc.iter_mut().enumerate() {
                    *sum += weight * i32::from(px[c]);
                }
            }
        }
        Rgb(acc.map(|v| v.clamp(0, 255) as u8))
    })
}

/// Gaussian blur with a [`BLUR_KERNEL_SIZE`] square kernel, sigma derived
/// from the kernel size.
pub fn blur(img: &RgbImage) -> RgbImage {
    gaussian_blur(img, BLUR_KERNEL_SIZE)
}

/// Separable Gaussian blur with an odd `ksize` and sigma derived from it.
pub fn gaussian_blur(img: &RgbImage, ksize: usize) -> RgbImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    let kernel = gaussian_kernel(ksize);
    let radius = (ksize / 2) as i64;
    let (wi, hi) = (i64::from(w), i64::from(h));
    let (wu, hu) = (w as usize, h as usize);

    // Horizontal pass into a float buffer, then vertical pass back to u8.
    let mut horizontal = vec![[0f64; 3]; wu * hu];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f64; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect_101(i64::from(x) + k as i64 - radius, wi);
                let px = img.get_pixel(sx, y);
                for (c, sum) in acc.iter_mut().enumerate() {
                    *sum += weight * f64::from(px[c]);
                }
            }
            horizontal[y as usize * wu + x as usize] = acc;
        }
    }

    RgbImage::from_fn(w, h, |x, y| {
        let mut acc = [0f64; 3];
        for (k, weight) in kernel.iter().enumerate() {
            let sy = reflect_101(i64::from(y) + k as i64 - radius, hi);
            let src = horizontal[sy as usize * wu + x as usize];
            for (c, sum) in acc.iter_mut().enumerate() {
                *sum += weight * src[c];
            }
        }
        Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
    })
}

/// Luminance expanded back to three equal channels.
///
/// Uses the 14-bit fixed-point form of `0.299 R + 0.587 G + 0.114 B`.
pub fn grayscale(img: &RgbImage) -> RgbImage {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    let mut out = img.clone();
    for px in out.pixels_mut() {
        let [r, g, b] = px.0;
        let y = (u32::from(r) * R + u32::from(g) * G + u32::from(b) * B + (1 << 13)) >> 14;
        let y = y.min(255) as u8;
        *px = Rgb([y, y, y]);
    }
    out
}

/// Normalised 1-D Gaussian weights for an odd `ksize`, with
/// `sigma = 0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel(ksize: usize) -> Vec<f64> {
    let sigma = 0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let scale = -0.5 / (sigma * sigma);
    let centre = (ksize as f64 - 1.0) * 0.5;
    let mut weights: Vec<f64> = (0..ksize)
        .map(|i| {
            let x = i as f64 - centre;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Map an out-of-range coordinate back into `0..len` by mirroring without
/// repeating the edge pixel.
fn reflect_101(mut i: i64, len: i64) -> u32 {
    if len <= 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * (len - 1) - i;
        } else {
            return i as u32;
        }
    }
}
