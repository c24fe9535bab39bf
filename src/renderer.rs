use crate::error::Result;
use crate::time_array::{PointSlice, TimeArray};
use image::RgbImage;
use rayon::prelude::*;
use tracing::debug;

/// Turns the observations of one time step into a raster frame.
pub trait FrameRenderer: Sync {
    fn render(&self, points: &PointSlice) -> RgbImage;

    fn dimensions(&self) -> (u32, u32);

    fn label(&self) -> String;
}

/// Render every time step of `array`, in time order.
pub fn render_frames<R>(renderer: &R, array: &TimeArray) -> Result<Vec<RgbImage>>
where
    R: FrameRenderer + ?Sized,
{
    (0..array.n_timepoints())
        .into_par_iter()
        .map(|t| {
            let points = array.frame(t)?;
            debug!(t, points = points.len(), renderer = %renderer.label(), "rendering frame");
            Ok(renderer.render(&points))
        })
        .collect()
}
