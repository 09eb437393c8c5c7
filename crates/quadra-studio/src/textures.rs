use std::path::Path;

use anyhow::{Context, Result};
use image::ColorType;
use quadra_engine::texture::ImageData;

/// Owned pixel buffer ready for upload.
#[derive(Debug, Clone)]
pub struct Pixels {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: u32,
}

impl Pixels {
    pub fn image_data(&self) -> ImageData<'_> {
        ImageData {
            pixels: &self.data,
            width: self.width,
            height: self.height,
            bytes_per_pixel: self.bytes_per_pixel,
        }
    }
}

/// Decodes an image file, bottom row first to match the +Y-up world.
///
/// RGB images stay 3 bytes per pixel; everything else becomes RGBA8.
pub fn load_image(path: &Path) -> Result<Pixels> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode {}", path.display()))?
        .flipv();
    let (width, height) = (img.width(), img.height());

    let (data, bytes_per_pixel) = match img.color() {
        ColorType::Rgb8 => (img.into_rgb8().into_raw(), 3),
        _ => (img.into_rgba8().into_raw(), 4),
    };

    Ok(Pixels {
        data,
        width,
        height,
        bytes_per_pixel,
    })
}

/// Two-colour checkerboard, `cells` x `cells` squares of `cell` pixels.
pub fn checkerboard(cells: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Pixels {
    let size = cells * cell;
    let data = (0..size)
        .flat_map(|y| (0..size).map(move |x| (x / cell + y / cell) % 2 == 0))
        .flat_map(|even| if even { a } else { b })
        .collect();

    Pixels {
        data,
        width: size,
        height: size,
        bytes_per_pixel: 4,
    }
}

/// Evenly spaced hues around the colour wheel, fully saturated.
pub fn swatch(index: usize, count: usize) -> [u8; 4] {
    let h = (index % count.max(1)) as f32 / count.max(1) as f32 * 6.0;
    let x = 1.0 - ((h % 2.0) - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let to_u8 = |c: f32| (c * 255.0).round() as u8;
    [to_u8(r), to_u8(g), to_u8(b), u8::MAX]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_cells() {
        let white = [255; 4];
        let black = [0, 0, 0, 255];
        let p = checkerboard(2, 2, white, black);
        assert_eq!((p.width, p.height), (4, 4));
        assert_eq!(p.data.len(), 4 * 4 * 4);

        let px = |x: usize, y: usize| &p.data[(y * 4 + x) * 4..][..4];
        assert_eq!(px(0, 0), white);
        assert_eq!(px(1, 1), white);
        assert_eq!(px(2, 0), black);
        assert_eq!(px(0, 2), black);
        assert_eq!(px(3, 3), white);
    }

    #[test]
    fn checkerboard_is_valid_image_data() {
        let p = checkerboard(3, 5, [1; 4], [2; 4]);
        assert!(p.image_data().to_rgba8().is_ok());
    }

    #[test]
    fn swatches_are_distinct_and_opaque() {
        let colors: Vec<[u8; 4]> = (0..12).map(|i| swatch(i, 12)).collect();
        for (i, a) in colors.iter().enumerate() {
            assert_eq!(a[3], 255);
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(swatch(0, 12), [255, 0, 0, 255]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_image(Path::new("/definitely/not/here.png")).is_err());
    }
}
