use serde::{Deserialize, Serialize};

use super::GrayPlane;
use crate::error::FrameError;
use crate::utils::grayscale::{bgr_to_grayscale, channel_mean, rgb_to_grayscale};

/// Channel layout of a frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelLayout {
    /// One luminance byte per pixel
    Gray,
    /// Three bytes per pixel, red first
    Rgb,
    /// Three bytes per pixel, blue first (typical camera capture order)
    Bgr,
}

impl PixelLayout {
    /// Bytes per pixel
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::Rgb | PixelLayout::Bgr => 3,
        }
    }
}

/// A borrowed camera frame or still image.
///
/// The engine only reads the buffer for the duration of one scan call.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    layout: PixelLayout,
}

impl<'a> Frame<'a> {
    /// Wrap a pixel buffer, checking that its length matches the geometry
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        layout: PixelLayout,
    ) -> Result<Self, FrameError> {
        let channels = layout.channels();
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(FrameError::TooLarge {
                width,
                height,
                channels,
            })?;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            layout,
        })
    }

    /// Grayscale frame
    pub fn gray(data: &'a [u8], width: usize, height: usize) -> Result<Self, FrameError> {
        Self::new(data, width, height, PixelLayout::Gray)
    }

    /// RGB frame
    pub fn rgb(data: &'a [u8], width: usize, height: usize) -> Result<Self, FrameError> {
        Self::new(data, width, height, PixelLayout::Rgb)
    }

    /// BGR frame
    pub fn bgr(data: &'a [u8], width: usize, height: usize) -> Result<Self, FrameError> {
        Self::new(data, width, height, PixelLayout::Bgr)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// True when the frame has no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Toolkit-free single-channel view: the frame itself when grayscale,
    /// otherwise the unweighted mean of the three channels.
    pub fn raw_plane(&self) -> GrayPlane {
        match self.layout {
            PixelLayout::Gray => GrayPlane::from_raw(self.width, self.height, self.data.to_vec())
                .unwrap_or_default(),
            PixelLayout::Rgb | PixelLayout::Bgr => {
                let mean = channel_mean(self.data, self.width, self.height);
                GrayPlane::from_raw(self.width, self.height, mean).unwrap_or_default()
            }
        }
    }

    /// Weighted luminance plane
    pub fn luma_plane(&self) -> GrayPlane {
        let data = match self.layout {
            PixelLayout::Gray => self.data.to_vec(),
            PixelLayout::Rgb => rgb_to_grayscale(self.data, self.width, self.height),
            PixelLayout::Bgr => bgr_to_grayscale(self.data, self.width, self.height),
        };
        GrayPlane::from_raw(self.width, self.height, data).unwrap_or_default()
    }
}

/// A frame that owns its pixels, e.g. loaded from disk or synthesised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedFrame {
    data: Vec<u8>,
    width: usize,
    height: usize,
    layout: PixelLayout,
}

impl OwnedFrame {
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        layout: PixelLayout,
    ) -> Result<Self, FrameError> {
        Frame::new(&data, width, height, layout)?;
        Ok(Self {
            data,
            width,
            height,
            layout,
        })
    }

    /// Grayscale frame from a plane
    pub fn from_plane(plane: GrayPlane) -> Self {
        let (width, height) = (plane.width(), plane.height());
        Self {
            data: plane.into_raw(),
            width,
            height,
            layout: PixelLayout::Gray,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Borrow as a [`Frame`]
    pub fn as_frame(&self) -> Frame<'_> {
        Frame {
            data: &self.data,
            width: self.width,
            height: self.height,
            layout: self.layout,
        }
    }

    /// Re-expand a grayscale frame into three identical channels
    pub fn to_layout(&self, layout: PixelLayout) -> OwnedFrame {
        if layout == self.layout || self.layout != PixelLayout::Gray {
            return self.clone();
        }
        let data = self.data.iter().flat_map(|&p| [p, p, p]).collect();
        OwnedFrame {
            data,
            width: self.width,
            height: self.height,
            layout,
        }
    }
}
