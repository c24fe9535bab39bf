use crate::constants::{XMAX, XMIN, YMAX, YMIN};
use crate::error::{Result, VizError};
use serde::{Deserialize, Serialize};

/// Data-space window shown by a plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            xmin: XMIN,
            xmax: XMAX,
            ymin: YMIN,
            ymax: YMAX,
        }
    }
}

impl Extent {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self> {
        let extent = Self { xmin, xmax, ymin, ymax };
        extent.validate()?;
        Ok(extent)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.xmin, self.xmax, self.ymin, self.ymax]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.xmin >= self.xmax || self.ymin >= self.ymax {
            return Err(VizError::InvalidConfig(format!(
                "extent must be finite and non-empty, got x [{}, {}] y [{}, {}]",
                self.xmin, self.xmax, self.ymin, self.ymax
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

/// Maps an [`Extent`] onto a `width` x `height` raster. Row 0 is `ymax`.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub extent: Extent,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(extent: Extent, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(VizError::InvalidConfig(format!(
                "viewport must be non-empty, got {}x{}",
                width, height
            )));
        }
        extent.validate()?;
        Ok(Self { extent, width, height })
    }

    /// Pixel holding `(x, y)`, or `None` when the point is clipped.
    pub fn to_pixel(&self, x: f64, y: f64) -> Option<(u32, u32)> {
        if !x.is_finite() || !y.is_finite() || !self.extent.contains(x, y) {
            return None;
        }
        let px = ((x - self.extent.xmin) / self.extent.width() * self.width as f64).floor() as u32;
        let py = ((self.extent.ymax - y) / self.extent.height() * self.height as f64).floor() as u32;
        // xmax/ymin land exactly on the far edge
        Some((px.min(self.width - 1), py.min(self.height - 1)))
    }

    /// Data coordinates of the centre of pixel `(px, py)`.
    pub fn pixel_center(&self, px: u32, py: u32) -> (f64, f64) {
        let x = self.extent.xmin + (px as f64 + 0.5) / self.width as f64 * self.extent.width();
        let y = self.extent.ymax - (py as f64 + 0.5) / self.height as f64 * self.extent.height();
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_extent() {
        assert!(Extent::new(1.0, 1.0, -1.0, 1.0).is_err());
        assert!(Extent::new(-1.0, 1.0, 2.0, 1.0).is_err());
        assert!(Extent::new(f64::NAN, 1.0, -1.0, 1.0).is_err());
    }

    #[test]
    fn test_corners_map_to_corner_pixels() {
        let vp = Viewport::new(Extent::default(), 100, 100).unwrap();
        assert_eq!(vp.to_pixel(-1.0, 1.0), Some((0, 0)));
        assert_eq!(vp.to_pixel(1.0, -1.0), Some((99, 99)));
        assert_eq!(vp.to_pixel(0.0, 0.0), Some((50, 50)));
    }

    #[test]
    fn test_clips_outside_points() {
        let vp = Viewport::new(Extent::default(), 10, 10).unwrap();
        assert_eq!(vp.to_pixel(1.5, 0.0), None);
        assert_eq!(vp.to_pixel(0.0, -1.01), None);
        assert_eq!(vp.to_pixel(f64::NAN, 0.0), None);
    }

    #[test]
    fn test_rejects_empty_viewport() {
        assert!(matches!(
            Viewport::new(Extent::default(), 0, 0),
            Err(VizError::InvalidConfig(_))
        ));
        assert!(Viewport::new(Extent::default(), 10, 0).is_err());
        assert!(Viewport::new(Extent::default(), 0, 10).is_err());
        let flat = Extent { xmin: 0.0, xmax: 0.0, ymin: -1.0, ymax: 1.0 };
        assert!(Viewport::new(flat, 10, 10).is_err());
    }

    #[test]
    fn test_one_pixel_viewport() {
        let vp = Viewport::new(Extent::default(), 1, 1).unwrap();
        assert_eq!(vp.to_pixel(0.0, 0.0), Some((0, 0)));
        assert_eq!(vp.to_pixel(1.0, -1.0), Some((0, 0)));
    }

    #[test]
    fn test_pixel_center_round_trips() {
        let vp = Viewport::new(Extent::default(), 64, 32).unwrap();
        for (px, py) in [(0, 0), (17, 9), (63, 31)] {
            let (x, y) = vp.pixel_center(px, py);
            assert_eq!(vp.to_pixel(x, y), Some((px, py)));
        }
    }
}
