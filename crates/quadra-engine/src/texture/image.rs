use std::borrow::Cow;

use crate::error::RenderError;

/// Decoded pixel data handed to texture creation.
///
/// Rows are tightly packed. Row 0 maps to texture coordinate `v = 0`, which
/// the batch renderer puts at the bottom edge of a sprite.
#[derive(Debug, Copy, Clone)]
pub struct ImageData<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: u32,
}

impl<'a> ImageData<'a> {
    #[inline]
    pub fn rgba8(pixels: &'a [u8], width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
            bytes_per_pixel: 4,
        }
    }

    /// Returns the pixels as RGBA8, expanding RGB8 with opaque alpha.
    pub fn to_rgba8(&self) -> Result<Cow<'a, [u8]>, RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidImageData(format!(
                "image has zero extent ({}x{})",
                self.width, self.height
            )));
        }

        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.bytes_per_pixel as usize));
        if expected != Some(self.pixels.len()) {
            return Err(RenderError::InvalidImageData(format!(
                "{}x{} image with {} bytes per pixel does not match buffer of {} bytes",
                self.width,
                self.height,
                self.bytes_per_pixel,
                self.pixels.len()
            )));
        }

        match self.bytes_per_pixel {
            4 => Ok(Cow::Borrowed(self.pixels)),
            3 => Ok(Cow::Owned(
                self.pixels
                    .chunks_exact(3)
                    .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
                    .collect(),
            )),
            n => Err(RenderError::InvalidImageData(format!(
                "unsupported pixel layout: {n} bytes per pixel (expected 3 or 4)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_is_borrowed_as_is() {
        let px = [1, 2, 3, 4, 5, 6, 7, 8];
        let img = ImageData::rgba8(&px, 2, 1);
        let out = img.to_rgba8().unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, &px);
    }

    #[test]
    fn rgb_gains_opaque_alpha() {
        let px = [10, 20, 30, 40, 50, 60];
        let img = ImageData {
            pixels: &px,
            width: 1,
            height: 2,
            bytes_per_pixel: 3,
        };
        assert_eq!(&*img.to_rgba8().unwrap(), &[10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn rejects_length_mismatch() {
        let px = [0u8; 7];
        let err = ImageData::rgba8(&px, 2, 1).to_rgba8().unwrap_err();
        assert!(matches!(err, RenderError::InvalidImageData(_)));
    }

    #[test]
    fn rejects_other_layouts() {
        let px = [0u8; 4];
        let img = ImageData {
            pixels: &px,
            width: 2,
            height: 2,
            bytes_per_pixel: 1,
        };
        assert!(img.to_rgba8().is_err());
    }

    #[test]
    fn rejects_empty_image() {
        assert!(ImageData::rgba8(&[], 0, 4).to_rgba8().is_err());
    }
}
