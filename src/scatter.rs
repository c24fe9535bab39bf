use crate::constants::{BACKGROUND, SCATTER_MARKER, SCATTER_MARKER_RADIUS_PX, SCATTER_SIZE_PX};
use crate::error::Result;
use crate::extent::{Extent, Viewport};
use crate::renderer::FrameRenderer;
use crate::time_array::PointSlice;
use image::{Rgb, RgbImage};

/// Plain dot plot: one filled disc per observation.
pub struct ScatterRenderer {
    viewport: Viewport,
    marker_radius: u32,
    color: Rgb<u8>,
    background: Rgb<u8>,
}

impl ScatterRenderer {
    pub fn new(width: u32, height: u32, extent: Extent) -> Result<Self> {
        Ok(Self {
            viewport: Viewport::new(extent, width, height)?,
            marker_radius: SCATTER_MARKER_RADIUS_PX,
            color: SCATTER_MARKER,
            background: BACKGROUND,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(SCATTER_SIZE_PX, SCATTER_SIZE_PX, Extent::default())
    }

    pub fn with_marker_radius(mut self, radius: u32) -> Self {
        self.marker_radius = radius;
        self
    }

    pub fn with_colors(mut self, color: Rgb<u8>, background: Rgb<u8>) -> Self {
        self.color = color;
        self.background = background;
        self
    }

    fn draw_spot(&self, img: &mut RgbImage, center_x: i32, center_y: i32) {
        let radius = self.marker_radius as i32;
        let (w, h) = (self.viewport.width as i32, self.viewport.height as i32);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let x = center_x + dx;
                let y = center_y + dy;
                if x >= 0 && x < w && y >= 0 && y < h && dx * dx + dy * dy <= radius * radius {
                    img.put_pixel(x as u32, y as u32, self.color);
                }
            }
        }
    }
}

impl FrameRenderer for ScatterRenderer {
    fn render(&self, points: &PointSlice) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.viewport.width, self.viewport.height, self.background);
        for (x, y) in points.iter() {
            if let Some((px, py)) = self.viewport.to_pixel(x, y) {
                self.draw_spot(&mut img, px as i32, py as i32);
            }
        }
        img
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.viewport.width, self.viewport.height)
    }

    fn label(&self) -> String {
        "scatter".to_string()
    }
}
