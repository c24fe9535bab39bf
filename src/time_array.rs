use crate::constants::{N_SAMPLES, N_TIMEPOINTS, NOISE_SCALE, ORBIT_RADIUS};
use crate::error::{Result, VizError};
use ndarray::{Array3, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::f64::consts::PI;
use tracing::info;

/// Index of the longitude/X column along axis 1.
pub const X: usize = 0;
/// Index of the latitude/Y column along axis 1.
pub const Y: usize = 1;

/// Configuration for [`TimeArray::simulate`]
#[derive(Debug, Clone)]
pub struct SimulationProps {
    pub n_samples: usize,
    pub n_timepoints: usize,
    pub radius: f64,
    pub noise: f64,
    pub seed: Option<u64>,
}

impl Default for SimulationProps {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationProps {
    pub fn new() -> Self {
        Self {
            n_samples: N_SAMPLES,
            n_timepoints: N_TIMEPOINTS,
            radius: ORBIT_RADIUS,
            noise: NOISE_SCALE,
            seed: None,
        }
    }

    pub fn with_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn with_timepoints(mut self, n_timepoints: usize) -> Self {
        self.n_timepoints = n_timepoints;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_samples == 0 || self.n_timepoints == 0 {
            return Err(VizError::InvalidConfig(format!(
                "need at least one sample and one timepoint, got {} x {}",
                self.n_samples, self.n_timepoints
            )));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(VizError::InvalidConfig(format!("bad orbit radius {}", self.radius)));
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(VizError::InvalidConfig(format!("bad noise scale {}", self.noise)));
        }
        Ok(())
    }
}

/// Observations of one time step, NaN rows removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSlice {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl PointSlice {
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        Self {
            xs: points.iter().map(|p| p.0).collect(),
            ys: points.iter().map(|p| p.1).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }
}

/// Point cloud time series laid out as `[n_samples, {x, y}, n_timepoints]`.
#[derive(Debug, Clone)]
pub struct TimeArray {
    data: Array3<f64>,
}

impl TimeArray {
    /// Points orbiting the origin once over the series, with gaussian jitter.
    pub fn simulate(props: &SimulationProps) -> Result<Self> {
        props.validate()?;

        let mut rng = match props.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let n_t = props.n_timepoints;
        let mut data = Array3::<f64>::zeros((props.n_samples, 2, n_t));
        for t in 0..n_t {
            let angle = t as f64 / n_t as f64 * 2.0 * PI;
            let (cx, cy) = (props.radius * angle.cos(), props.radius * angle.sin());
            for i in 0..props.n_samples {
                let jx: f64 = rng.sample(StandardNormal);
                let jy: f64 = rng.sample(StandardNormal);
                data[[i, X, t]] = cx + jx * props.noise;
                data[[i, Y, t]] = cy + jy * props.noise;
            }
        }

        info!(
            samples = props.n_samples,
            timepoints = n_t,
            seed = ?props.seed,
            "simulated time array"
        );
        Ok(Self { data })
    }

    pub fn from_array(data: Array3<f64>) -> Result<Self> {
        let (n_samples, n_coords, n_timepoints) = data.dim();
        if n_coords != 2 {
            return Err(VizError::Shape(format!(
                "axis 1 must hold exactly x and y, found {} columns",
                n_coords
            )));
        }
        if n_samples == 0 || n_timepoints == 0 {
            return Err(VizError::Shape(format!(
                "empty time array {:?}",
                data.shape()
            )));
        }
        Ok(Self { data })
    }

    pub fn n_samples(&self) -> usize {
        self.data.dim().0
    }

    pub fn n_timepoints(&self) -> usize {
        self.data.dim().2
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// The observations at time `t`.
    pub fn frame(&self, t: usize) -> Result<PointSlice> {
        if t >= self.n_timepoints() {
            return Err(VizError::TimeOutOfRange {
                t,
                n_timepoints: self.n_timepoints(),
            });
        }

        let slice = self.data.index_axis(Axis(2), t);
        let mut points = PointSlice {
            xs: Vec::with_capacity(self.n_samples()),
            ys: Vec::with_capacity(self.n_samples()),
        };
        for row in slice.outer_iter() {
            let (x, y) = (row[X], row[Y]);
            if x.is_nan() || y.is_nan() {
                continue;
            }
            points.xs.push(x);
            points.ys.push(y);
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_shape() {
        let props = SimulationProps::new().with_samples(25).with_timepoints(12).with_seed(7);
        let array = TimeArray::simulate(&props).unwrap();
        assert_eq!(array.shape(), (25, 2, 12));
        assert_eq!(array.n_samples(), 25);
        assert_eq!(array.n_timepoints(), 12);
    }

    #[test]
    fn test_noiseless_points_sit_on_the_orbit() {
        let props = SimulationProps::new()
            .with_samples(4)
            .with_timepoints(8)
            .with_noise(0.0)
            .with_seed(1);
        let array = TimeArray::simulate(&props).unwrap();

        for t in 0..8 {
            let angle = t as f64 / 8.0 * 2.0 * PI;
            for (x, y) in array.frame(t).unwrap().iter() {
                assert!((x - 0.5 * angle.cos()).abs() < 1e-12);
                assert!((y - 0.5 * angle.sin()).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_same_seed_same_data() {
        let props = SimulationProps::new().with_samples(50).with_timepoints(5).with_seed(42);
        let a = TimeArray::simulate(&props).unwrap();
        let b = TimeArray::simulate(&props).unwrap();
        assert_eq!(a.data(), b.data());

        let c = TimeArray::simulate(&props.clone().with_seed(43)).unwrap();
        assert_ne!(a.data(), c.data());
    }

    #[test]
    fn test_noise_spreads_points() {
        let props = SimulationProps::new().with_samples(2000).with_timepoints(1).with_seed(3);
        let frame = TimeArray::simulate(&props).unwrap().frame(0).unwrap();
        let n = frame.len() as f64;
        let mean_x = frame.xs.iter().sum::<f64>() / n;
        let var_x = frame.xs.iter().map(|x| (x - mean_x).powi(2)).sum::<f64>() / n;
        // t = 0 sits at (r, 0) with sd 0.1
        assert!((mean_x - 0.5).abs() < 0.02, "mean_x = {}", mean_x);
        assert!((var_x.sqrt() - 0.1).abs() < 0.02, "sd_x = {}", var_x.sqrt());
    }

    #[test]
    fn test_frame_drops_nan_rows() {
        let mut data = Array3::<f64>::zeros((3, 2, 2));
        data[[1, X, 0]] = f64::NAN;
        data[[2, Y, 1]] = f64::NAN;
        let array = TimeArray::from_array(data).unwrap();
        assert_eq!(array.frame(0).unwrap().len(), 2);
        assert_eq!(array.frame(1).unwrap().len(), 2);
    }

    #[test]
    fn test_frame_out_of_range() {
        let array = TimeArray::from_array(Array3::zeros((2, 2, 3))).unwrap();
        assert!(matches!(
            array.frame(3),
            Err(VizError::TimeOutOfRange { t: 3, n_timepoints: 3 })
        ));
    }

    #[test]
    fn test_rejects_bad_shapes_and_props() {
        assert!(TimeArray::from_array(Array3::zeros((2, 3, 3))).is_err());
        assert!(TimeArray::from_array(Array3::zeros((0, 2, 3))).is_err());
        assert!(TimeArray::simulate(&SimulationProps::new().with_timepoints(0)).is_err());
        assert!(TimeArray::simulate(&SimulationProps::new().with_noise(-1.0)).is_err());
    }
}
