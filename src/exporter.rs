use crate::constants::{
    EXPORT_DIR, FRAME_DELAY_CS, HEXBIN_DIR, HEXBIN_GRIDSIZE, HEXBIN_SIZE_PX, MANIFEST_FILE,
    N_SAMPLES, N_TIMEPOINTS, NOISE_SCALE, ORBIT_RADIUS, QUANTIZE_SPEED, SCATTER_DIR, SCATTER_FILE,
    SCATTER_MARKER_RADIUS_PX, SCATTER_SIZE_PX, hexbin_file_name,
};
use crate::error::{Result, VizError};
use crate::extent::Extent;
use crate::gif_exporter::GifExporter;
use crate::hexbin::HexbinRenderer;
use crate::renderer::{FrameRenderer, render_frames};
use crate::scatter::ScatterRenderer;
use crate::time_array::{SimulationProps, TimeArray};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Everything tunable about an export run. Missing JSON fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub samples: usize,
    pub timepoints: usize,
    pub radius: f64,
    pub noise: f64,
    pub seed: Option<u64>,
    pub extent: Extent,
    pub scatter_size: u32,
    pub marker_radius: u32,
    pub hexbin_size: u32,
    pub gridsize: usize,
    pub frame_delay_cs: u16,
    pub quantize_speed: i32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(EXPORT_DIR),
            samples: N_SAMPLES,
            timepoints: N_TIMEPOINTS,
            radius: ORBIT_RADIUS,
            noise: NOISE_SCALE,
            seed: None,
            extent: Extent::default(),
            scatter_size: SCATTER_SIZE_PX,
            marker_radius: SCATTER_MARKER_RADIUS_PX,
            hexbin_size: HEXBIN_SIZE_PX,
            gridsize: HEXBIN_GRIDSIZE,
            frame_delay_cs: FRAME_DELAY_CS,
            quantize_speed: QUANTIZE_SPEED,
        }
    }
}

impl ExportConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_series(mut self, samples: usize, timepoints: usize) -> Self {
        self.samples = samples;
        self.timepoints = timepoints;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_canvas_sizes(mut self, scatter_size: u32, hexbin_size: u32) -> Self {
        self.scatter_size = scatter_size;
        self.hexbin_size = hexbin_size;
        self
    }

    pub fn with_gridsize(mut self, gridsize: usize) -> Self {
        self.gridsize = gridsize;
        self
    }

    pub fn simulation_props(&self) -> SimulationProps {
        let props = SimulationProps::new()
            .with_samples(self.samples)
            .with_timepoints(self.timepoints)
            .with_radius(self.radius)
            .with_noise(self.noise);
        match self.seed {
            Some(seed) => props.with_seed(seed),
            None => props,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation_props().validate()?;
        self.extent.validate()?;
        if self.scatter_size == 0 || self.hexbin_size == 0 {
            return Err(VizError::InvalidConfig(format!(
                "canvas sizes must be positive, got scatter {} hexbin {}",
                self.scatter_size, self.hexbin_size
            )));
        }
        if self.scatter_size > u16::MAX as u32 || self.hexbin_size > u16::MAX as u32 {
            return Err(VizError::InvalidConfig(format!(
                "canvas sizes must fit a GIF ({} max), got scatter {} hexbin {}",
                u16::MAX,
                self.scatter_size,
                self.hexbin_size
            )));
        }
        if self.gridsize < 2 {
            return Err(VizError::InvalidConfig(format!(
                "gridsize must be at least 2, got {}",
                self.gridsize
            )));
        }
        if !(1..=30).contains(&self.quantize_speed) {
            return Err(VizError::InvalidConfig(format!(
                "quantize speed must be in 1..=30, got {}",
                self.quantize_speed
            )));
        }
        Ok(())
    }

    pub fn scatter_path(&self) -> PathBuf {
        self.output_dir.join(SCATTER_DIR).join(SCATTER_FILE)
    }

    pub fn hexbin_path(&self) -> PathBuf {
        self.output_dir.join(HEXBIN_DIR).join(hexbin_file_name(self.gridsize))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Scatter,
    Hexbin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedAnimation {
    pub kind: AnimationKind,
    pub path: PathBuf,
    pub frames: usize,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub animations: Vec<ExportedAnimation>,
    pub config: ExportConfig,
    pub elapsed_s: f64,
}

impl ExportSummary {
    pub fn animation(&self, kind: AnimationKind) -> Option<&ExportedAnimation> {
        self.animations.iter().find(|a| a.kind == kind)
    }
}

/// Simulates a time array and writes the scatter and hexbin animations.
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn run(&self) -> Result<ExportSummary> {
        self.config.validate()?;
        let array = TimeArray::simulate(&self.config.simulation_props())?;
        self.run_with(&array)
    }

    /// Export animations for an existing time array.
    pub fn run_with(&self, array: &TimeArray) -> Result<ExportSummary> {
        self.config.validate()?;
        let start = Instant::now();
        let cfg = &self.config;

        let scatter = ScatterRenderer::new(cfg.scatter_size, cfg.scatter_size, cfg.extent)?
            .with_marker_radius(cfg.marker_radius);
        let scatter_out =
            self.export_animation(AnimationKind::Scatter, &scatter, array, cfg.scatter_path())?;

        let hexbin = HexbinRenderer::new(cfg.hexbin_size, cfg.hexbin_size, cfg.gridsize, cfg.extent)?;
        let hexbin_out =
            self.export_animation(AnimationKind::Hexbin, &hexbin, array, cfg.hexbin_path())?;

        let summary = ExportSummary {
            animations: vec![scatter_out, hexbin_out],
            config: cfg.clone(),
            elapsed_s: start.elapsed().as_secs_f64(),
        };
        self.write_manifest(&summary)?;
        Ok(summary)
    }

    fn export_animation<R: FrameRenderer>(
        &self,
        kind: AnimationKind,
        renderer: &R,
        array: &TimeArray,
        path: PathBuf,
    ) -> Result<ExportedAnimation> {
        info!(renderer = %renderer.label(), frames = array.n_timepoints(), "rendering animation");
        let frames = render_frames(renderer, array)?;

        let (width, height) = renderer.dimensions();
        let exporter = GifExporter::for_dimensions(width, height)?
            .with_delay(self.config.frame_delay_cs)
            .with_quantize_speed(self.config.quantize_speed)?;
        let written = exporter.export(&frames, &path)?;

        Ok(ExportedAnimation {
            kind,
            path,
            frames: written,
            width,
            height,
        })
    }

    fn write_manifest(&self, summary: &ExportSummary) -> Result<()> {
        let path = self.config.manifest_path();
        fs::create_dir_all(&self.config.output_dir)?;
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, summary)?;
        info!(path = %path.display(), "wrote manifest");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_match_layout() {
        let cfg = ExportConfig::default();
        assert_eq!(cfg.scatter_path(), PathBuf::from("export/scatter/scatter.gif"));
        assert_eq!(cfg.hexbin_path(), PathBuf::from("export/hexbin/hexbin_100_bins.gif"));
        assert_eq!(cfg.manifest_path(), PathBuf::from("export/manifest.json"));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let cfg: ExportConfig =
            serde_json::from_str(r#"{ "timepoints": 12, "gridsize": 40, "seed": 9 }"#).unwrap();
        assert_eq!(cfg.timepoints, 12);
        assert_eq!(cfg.gridsize, 40);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.samples, N_SAMPLES);
        assert_eq!(cfg.output_dir, PathBuf::from(EXPORT_DIR));
        assert_eq!(cfg.extent, Extent::default());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viz.json");
        let cfg = ExportConfig::default().with_series(10, 3).with_seed(5);
        fs::write(&path, serde_json::to_string(&cfg).unwrap()).unwrap();
        assert_eq!(ExportConfig::from_json_file(&path).unwrap(), cfg);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ExportConfig::default().validate().is_ok());
        assert!(ExportConfig::default().with_series(0, 10).validate().is_err());
        assert!(ExportConfig::default().with_canvas_sizes(0, 10).validate().is_err());
        assert!(ExportConfig::default().with_canvas_sizes(10, 70_000).validate().is_err());
        assert!(ExportConfig::default().with_gridsize(1).validate().is_err());

        let mut cfg = ExportConfig::default();
        cfg.quantize_speed = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ExportConfig::default();
        cfg.noise = f64::NAN;
        assert!(cfg.validate().is_err());
    }
}
