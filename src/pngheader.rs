use crate::endian::read_be32;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io;

//===========================================================================//

// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

// The IHDR chunk must come first, and its data is always 13 bytes long.
const IHDR_TYPE: &[u8] = b"IHDR";
const IHDR_DATA_LEN: u32 = 13;

/// The smallest number of bytes that can hold a PNG signature plus a
/// complete IHDR chunk.
pub const PNG_MIN_LEN: usize = 33;

// Size limits for images in an ICO file:
const MIN_SIZE: u32 = 1;
const MAX_SIZE: u32 = 256;

// Pixels deeper than this can't be described by an ICO directory entry.
const MAX_PIXEL_DEPTH: u16 = 32;

//===========================================================================//

/// The color type declared in a PNG image header.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum PngColorType {
    /// One gray sample per pixel
    Grayscale,
    /// Red, green and blue samples
    Rgb,
    /// One palette index per pixel
    Indexed,
    /// A gray sample plus alpha
    GrayscaleAlpha,
    /// Red, green, blue and alpha samples
    Rgba,
}

impl PngColorType {
    pub(crate) fn from_number(number: u8) -> Option<PngColorType> {
        match number {
            0 => Some(PngColorType::Grayscale),
            2 => Some(PngColorType::Rgb),
            3 => Some(PngColorType::Indexed),
            4 => Some(PngColorType::GrayscaleAlpha),
            6 => Some(PngColorType::Rgba),
            _ => None,
        }
    }

    /// Returns the number of samples stored for each pixel.
    pub fn channels(&self) -> u16 {
        match *self {
            PngColorType::Grayscale | PngColorType::Indexed => 1,
            PngColorType::GrayscaleAlpha => 2,
            PngColorType::Rgb => 3,
            PngColorType::Rgba => 4,
        }
    }
}

//===========================================================================//

/// The metadata of a PNG file that an ICO directory entry needs, taken from
/// its signature and IHDR chunk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PngHeader {
    width: u32,
    height: u32,
    bit_depth: u8,
    color_type: PngColorType,
}

impl PngHeader {
    /// Checks that `data` starts like a PNG image that can be stored in an
    /// ICO file, and extracts its header.  Nothing past the IHDR chunk is
    /// looked at.
    ///
    /// Returns an error of kind `InvalidData` if the data isn't a PNG or
    /// declares a size outside of 1 to 256 pixels, and of kind `Unsupported`
    /// if the color type is unknown or a pixel would be deeper than 32 bits.
    pub fn inspect(data: &[u8]) -> io::Result<PngHeader> {
        if data.len() < PNG_MIN_LEN {
            invalid_data!(
                "PNG data too short (was {} bytes, but must be at least {})",
                data.len(),
                PNG_MIN_LEN
            );
        }
        if !data.starts_with(PNG_SIGNATURE) {
            invalid_data!("Missing PNG signature");
        }
        let chunk_len = be32_at(data, 8)?;
        if chunk_len != IHDR_DATA_LEN {
            invalid_data!(
                "Invalid IHDR chunk length (was {}, but must be {})",
                chunk_len,
                IHDR_DATA_LEN
            );
        }
        if &data[12..16] != IHDR_TYPE {
            invalid_data!("First PNG chunk is not IHDR");
        }
        let width = be32_at(data, 16)?;
        if !(MIN_SIZE..=MAX_SIZE).contains(&width) {
            invalid_data!(
                "Invalid PNG width (was {}, but must be {} to {})",
                width,
                MIN_SIZE,
                MAX_SIZE
            );
        }
        let height = be32_at(data, 20)?;
        if !(MIN_SIZE..=MAX_SIZE).contains(&height) {
            invalid_data!(
                "Invalid PNG height (was {}, but must be {} to {})",
                height,
                MIN_SIZE,
                MAX_SIZE
            );
        }
        let bit_depth = data[24];
        let color_type = match PngColorType::from_number(data[25]) {
            Some(color_type) => color_type,
            None => unsupported!("Unsupported PNG color type ({})", data[25]),
        };
        let header = PngHeader { width, height, bit_depth, color_type };
        if header.pixel_depth() > MAX_PIXEL_DEPTH {
            unsupported!(
                "Unsupported PNG pixel depth (was {} bits, but max is {})",
                header.pixel_depth(),
                MAX_PIXEL_DEPTH
            );
        }
        Ok(header)
    }

    /// Returns the width of the image, in pixels (1 to 256).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels (1 to 256).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the number of bits per sample.
    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    /// Returns the declared color type.
    pub fn color_type(&self) -> PngColorType {
        self.color_type
    }

    /// Returns the number of bits per pixel: the bit depth times the number
    /// of channels of the color type.
    pub fn pixel_depth(&self) -> u16 {
        u16::from(self.bit_depth) * self.color_type.channels()
    }
}

fn be32_at(data: &[u8], offset: usize) -> io::Result<u32> {
    match read_be32(data, offset) {
        Some(value) => Ok(value),
        None => invalid_data!("PNG header truncated at byte {}", offset),
    }
}

//===========================================================================//


//===========================================================================//
