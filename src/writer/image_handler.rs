//! Image handling for PDF generation.
//!
//! Decorative assets and the rasterized gradient bar are embedded as image
//! XObjects (PDF spec Section 8.9). Transparency is carried by a separate
//! DeviceGray `/SMask` image, which is how the bar's rounded corners survive
//! into the output.
//!
//! # Supported Inputs
//!
//! - **JPEG**: Pass-through embedding using DCTDecode filter
//! - **PNG** (and anything else the `image` crate decodes): pixels are
//!   re-encoded with FlateDecode, alpha split into a soft mask
//! - **In-memory RGBA buffers** (the gradient bar)

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use image::{DynamicImage, RgbaImage};

use crate::object::Object;

/// Image format for PDF embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image (DCTDecode filter)
    Jpeg,
    /// Flate-compressed raw samples (FlateDecode filter)
    Flate,
}

/// Color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
    /// CMYK color (4 components per pixel)
    DeviceCMYK,
}

impl ColorSpace {
    /// Get the PDF name for this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// Image data ready for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color space
    pub color_space: ColorSpace,
    /// Encoding of `data`
    pub format: ImageFormat,
    /// Encoded sample data
    pub data: Vec<u8>,
    /// Flate-compressed alpha channel, if the image has one
    pub soft_mask: Option<Vec<u8>>,
}

/// Image embedding error.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Unsupported image format
    #[error("Unsupported image format")]
    UnsupportedFormat,

    /// Failed to decode image
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    /// Failed to compress image data
    #[error("Compression error: {0}")]
    CompressionError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Invalid image data
    #[error("Invalid image data: {0}")]
    InvalidData(String),
}

impl ImageData {
    /// Wrap a JPEG file without transcoding.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, ImageError> {
        let (width, height, color_space) = parse_jpeg_header(&data)?;

        Ok(Self {
            width,
            height,
            color_space,
            format: ImageFormat::Jpeg,
            data,
            soft_mask: None,
        })
    }

    /// Decode any raster the `image` crate understands.
    pub fn from_encoded(data: &[u8]) -> Result<Self, ImageError> {
        let img = image::load_from_memory(data)
            .map_err(|e| ImageError::DecodeError(e.to_string()))?;
        Self::from_dynamic(&img)
    }

    /// Load an image from raw bytes, passing JPEG through untouched.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImageError> {
        if data.is_empty() {
            return Err(ImageError::InvalidData("empty image".to_string()));
        }
        if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 {
            return Self::from_jpeg(data.to_vec());
        }
        match image::guess_format(data) {
            Ok(_) => Self::from_encoded(data),
            Err(_) => Err(ImageError::UnsupportedFormat),
        }
    }

    /// Load an image from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| ImageError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&data)
    }

    /// Embed an in-memory RGBA buffer, alpha becoming the soft mask.
    pub fn from_rgba(image: &RgbaImage) -> Result<Self, ImageError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidData(format!("{}x{} image", width, height)));
        }

        let pixel_count = (width as usize) * (height as usize);
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for pixel in image.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }

        // Fully opaque images don't need a mask.
        let soft_mask = if alpha.iter().all(|&a| a == 255) {
            None
        } else {
            Some(compress_image_data(&alpha)?)
        };

        Ok(Self {
            width,
            height,
            color_space: ColorSpace::DeviceRGB,
            format: ImageFormat::Flate,
            data: compress_image_data(&rgb)?,
            soft_mask,
        })
    }

    fn from_dynamic(img: &DynamicImage) -> Result<Self, ImageError> {
        if img.color().has_color() {
            return Self::from_rgba(&img.to_rgba8());
        }

        let gray_alpha = img.to_luma_alpha8();
        let (width, height) = gray_alpha.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidData(format!("{}x{} image", width, height)));
        }
        let mut gray = Vec::with_capacity((width * height) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in gray_alpha.pixels() {
            gray.push(pixel.0[0]);
            alpha.push(pixel.0[1]);
        }

        let soft_mask = if img.color().has_alpha() && alpha.iter().any(|&a| a != 255) {
            Some(compress_image_data(&alpha)?)
        } else {
            None
        };

        Ok(Self {
            width,
            height,
            color_space: ColorSpace::DeviceGray,
            format: ImageFormat::Flate,
            data: compress_image_data(&gray)?,
            soft_mask,
        })
    }

    /// Build the image XObject stream (without `/SMask`; the writer adds
    /// the reference once the mask object has an id).
    pub fn to_xobject(&self) -> Object {
        let mut dict = HashMap::new();

        dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Image".to_string()));
        dict.insert("Width".to_string(), Object::Integer(self.width as i64));
        dict.insert("Height".to_string(), Object::Integer(self.height as i64));
        dict.insert(
            "ColorSpace".to_string(),
            Object::Name(self.color_space.pdf_name().to_string()),
        );
        dict.insert("BitsPerComponent".to_string(), Object::Integer(8));

        let filter = match self.format {
            ImageFormat::Jpeg => "DCTDecode",
            ImageFormat::Flate => "FlateDecode",
        };
        dict.insert("Filter".to_string(), Object::Name(filter.to_string()));

        Object::Stream {
            dict,
            data: bytes::Bytes::from(self.data.clone()),
        }
    }

    /// Build the soft mask (alpha channel) XObject stream.
    pub fn to_soft_mask_xobject(&self) -> Option<Object> {
        self.soft_mask.as_ref().map(|mask_data| {
            let mut dict = HashMap::new();
            dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
            dict.insert("Subtype".to_string(), Object::Name("Image".to_string()));
            dict.insert("Width".to_string(), Object::Integer(self.width as i64));
            dict.insert("Height".to_string(), Object::Integer(self.height as i64));
            dict.insert("ColorSpace".to_string(), Object::Name("DeviceGray".to_string()));
            dict.insert("BitsPerComponent".to_string(), Object::Integer(8));
            dict.insert("Filter".to_string(), Object::Name("FlateDecode".to_string()));
            Object::Stream {
                dict,
                data: bytes::Bytes::from(mask_data.clone()),
            }
        })
    }
}

/// Parse JPEG header to extract dimensions and color space.
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, ColorSpace), ImageError> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::InvalidData("Not a valid JPEG".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        pos += 2;

        // Fill bytes and stuffed zeros carry no segment
        if marker == 0xFF || marker == 0x00 {
            continue;
        }

        // SOFn markers (C4, C8 and CC are DHT/JPG/DAC)
        if matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            if pos + 8 > data.len() {
                return Err(ImageError::InvalidData("Truncated JPEG header".to_string()));
            }

            let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
            let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            let color_space = match data[pos + 7] {
                1 => ColorSpace::DeviceGray,
                4 => ColorSpace::DeviceCMYK,
                _ => ColorSpace::DeviceRGB,
            };

            return Ok((width, height, color_space));
        }

        if pos + 2 > data.len() {
            break;
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        pos += length;
    }

    Err(ImageError::InvalidData("Could not find JPEG dimensions".to_string()))
}

/// Compress sample data with Flate.
fn compress_image_data(data: &[u8]) -> Result<Vec<u8>, ImageError> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| ImageError::CompressionError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| ImageError::CompressionError(e.to_string()))
}
