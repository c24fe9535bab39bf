use clap::Parser;
use heatmap_timeseries::gif_exporter::count_frames;
use heatmap_timeseries::{ExportConfig, Exporter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Render scatter and hexbin-density GIFs of a simulated point cloud time series.
#[derive(Parser, Debug)]
#[command(name = "heatmap-timeseries")]
#[command(about = "Animate a simulated 2D point cloud as scatter and hexbin GIFs")]
struct Args {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root directory for the scatter/ and hexbin/ outputs.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Observations per time step.
    #[arg(long)]
    samples: Option<usize>,

    /// Number of time steps (frames).
    #[arg(long)]
    timepoints: Option<usize>,

    /// Seed for reproducible data.
    #[arg(long)]
    seed: Option<u64>,

    /// Hexagons across the x axis.
    #[arg(long)]
    gridsize: Option<usize>,

    /// Scatter canvas side in pixels.
    #[arg(long)]
    scatter_size: Option<u32>,

    /// Hexbin canvas side in pixels.
    #[arg(long)]
    hexbin_size: Option<u32>,

    /// Frame delay in hundredths of a second.
    #[arg(long)]
    delay: Option<u16>,

    /// Decode the written GIFs and check their frame counts.
    #[arg(long)]
    verify: bool,
}

impl Args {
    fn into_config(self) -> Result<(ExportConfig, bool), Box<dyn std::error::Error>> {
        let mut cfg = match &self.config {
            Some(path) => ExportConfig::from_json_file(path)?,
            None => ExportConfig::default(),
        };
        if let Some(dir) = self.output_dir {
            cfg.output_dir = dir;
        }
        if let Some(samples) = self.samples {
            cfg.samples = samples;
        }
        if let Some(timepoints) = self.timepoints {
            cfg.timepoints = timepoints;
        }
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }
        if let Some(gridsize) = self.gridsize {
            cfg.gridsize = gridsize;
        }
        if let Some(size) = self.scatter_size {
            cfg.scatter_size = size;
        }
        if let Some(size) = self.hexbin_size {
            cfg.hexbin_size = size;
        }
        if let Some(delay) = self.delay {
            cfg.frame_delay_cs = delay;
        }
        Ok((cfg, self.verify))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (cfg, verify) = Args::parse().into_config()?;

    println!("🌀 Point cloud animation export");
    println!("  Samples: {}", cfg.samples);
    println!("  Timepoints: {}", cfg.timepoints);
    println!("  Hex gridsize: {}", cfg.gridsize);
    println!("  Output: {}", cfg.output_dir.display());
    println!();

    let summary = Exporter::new(cfg).run()?;

    for animation in &summary.animations {
        println!(
            "🖼️  {:?}: {} frames at {}x{} -> {}",
            animation.kind,
            animation.frames,
            animation.width,
            animation.height,
            animation.path.display()
        );
        if verify {
            let decoded = count_frames(&animation.path)?;
            if decoded != animation.frames {
                return Err(format!(
                    "{} decodes to {} frames, expected {}",
                    animation.path.display(),
                    decoded,
                    animation.frames
                )
                .into());
            }
        }
    }

    println!();
    println!("✅ Done in {:.2}s", summary.elapsed_s);
    Ok(())
}
