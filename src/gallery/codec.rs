use image::codecs::jpeg::JpegEncoder;
use image::{ImageReader, RgbImage};
use std::io::Cursor;

/// Quality used when writing derived JPEGs.
pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, thiserror::Error)]
pub enum ImageOpError {
    #[error("failed to detect image format: {0}")]
    Format(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Decode any supported image into the three-channel working form.
/// Alpha is dropped.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, ImageOpError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let img = reader.decode().map_err(ImageOpError::Decode)?;
    Ok(img.to_rgb8())
}

/// Encode the working image as a JPEG.
pub fn encode_jpeg(img: &RgbImage) -> Result<Vec<u8>, ImageOpError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
        .encode_image(img)
        .map_err(ImageOpError::Encode)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, Rgba, RgbaImage};

    #[test]
    fn jpeg_roundtrip_keeps_dimensions() {
        let img = RgbImage::from_pixel(17, 9, Rgb([120, 80, 40]));
        let bytes = encode_jpeg(&img).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let back = decode(&bytes).unwrap();
        assert_eq!(back.dimensions(), (17, 9));
    }

    #[test]
    fn encoding_is_deterministic() {
        let img = RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, (y * 30) as u8, 7]));
        assert_eq!(encode_jpeg(&img).unwrap(), encode_jpeg(&img).unwrap());
    }

    #[test]
    fn png_with_alpha_decodes_to_rgb() {
        let rgba = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 0]));
        let mut png = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let rgb = decode(&png).unwrap();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(decode(b"definitely not an image").is_err());
    }
}
