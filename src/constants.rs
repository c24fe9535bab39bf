use image::Rgb;

// ===== Simulation =====
pub const N_SAMPLES: usize = 1000;
pub const N_TIMEPOINTS: usize = 60; // usually a multiple of 60, one day at minute resolution is 1440
pub const ORBIT_RADIUS: f64 = 0.5;
pub const NOISE_SCALE: f64 = 0.1;

// ===== Plot window =====
pub const XMIN: f64 = -1.0;
pub const XMAX: f64 = 1.0;
pub const YMIN: f64 = -1.0;
pub const YMAX: f64 = 1.0;

// ===== Scatter =====
pub const SCATTER_SIZE_PX: u32 = 1000; // 10in figure at 100dpi
pub const SCATTER_MARKER_RADIUS_PX: u32 = 1;
pub const SCATTER_MARKER: Rgb<u8> = Rgb([0, 0, 0]);

// ===== Hexbin =====
pub const HEXBIN_SIZE_PX: u32 = 2000; // 20in figure at 100dpi
pub const HEXBIN_GRIDSIZE: usize = 100;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

// ===== GIF =====
pub const FRAME_DELAY_CS: u16 = 10; // hundredths of a second
pub const QUANTIZE_SPEED: i32 = 10; // NeuQuant: 1 = best, 30 = fastest

// ===== Output layout =====
pub const EXPORT_DIR: &str = "export";
pub const SCATTER_DIR: &str = "scatter";
pub const SCATTER_FILE: &str = "scatter.gif";
pub const HEXBIN_DIR: &str = "hexbin";
pub const MANIFEST_FILE: &str = "manifest.json";

pub fn hexbin_file_name(gridsize: usize) -> String {
    format!("hexbin_{}_bins.gif", gridsize)
}
