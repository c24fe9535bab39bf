use crate::constants::{FRAME_DELAY_CS, QUANTIZE_SPEED};
use crate::error::{Result, VizError};
use gif::{ColorOutput, DecodeOptions, Encoder, Frame, Repeat};
use image::RgbImage;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

pub struct GifExporter {
    width: u16,
    height: u16,
    delay_cs: u16,
    repeat: Repeat,
    quantize_speed: i32,
}

impl GifExporter {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            delay_cs: FRAME_DELAY_CS,
            repeat: Repeat::Infinite,
            quantize_speed: QUANTIZE_SPEED,
        }
    }

    /// GIF canvases are limited to 16 bits per side.
    pub fn for_dimensions(width: u32, height: u32) -> Result<Self> {
        let too_big = || {
            VizError::InvalidConfig(format!(
                "{}x{} does not fit in a GIF canvas (max {} per side)",
                width,
                height,
                u16::MAX
            ))
        };
        let w = u16::try_from(width).map_err(|_| too_big())?;
        let h = u16::try_from(height).map_err(|_| too_big())?;
        if w == 0 || h == 0 {
            return Err(VizError::InvalidConfig(format!(
                "GIF canvas must be non-empty, got {}x{}",
                width, height
            )));
        }
        Ok(Self::new(w, h))
    }

    pub fn with_delay(mut self, delay_cs: u16) -> Self {
        self.delay_cs = delay_cs;
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// NeuQuant sampling speed: 1 is slowest and best, 30 fastest.
    pub fn with_quantize_speed(mut self, speed: i32) -> Result<Self> {
        if !(1..=30).contains(&speed) {
            return Err(VizError::InvalidConfig(format!(
                "quantize speed must be in 1..=30, got {}",
                speed
            )));
        }
        self.quantize_speed = speed;
        Ok(self)
    }

    /// Write `frames` as an animated GIF, creating the parent directory if
    /// needed. Returns the number of frames written.
    pub fn export<P: AsRef<Path>>(&self, frames: &[RgbImage], output_path: P) -> Result<usize> {
        let output_path = output_path.as_ref();
        if frames.is_empty() {
            return Err(VizError::EmptyAnimation);
        }
        let expected = (self.width as u32, self.height as u32);
        if let Some((index, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.dimensions() != expected)
        {
            return Err(VizError::FrameSizeMismatch {
                index,
                expected,
                found: frame.dimensions(),
            });
        }

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let writer = BufWriter::new(File::create(output_path)?);
        let written = self.encode(frames, writer).and_then(|mut w| w.flush().map_err(VizError::from));
        if let Err(err) = written {
            // don't leave a truncated gif behind
            if let Err(rm) = fs::remove_file(output_path) {
                warn!(path = %output_path.display(), error = %rm, "could not remove partial gif");
            }
            return Err(err);
        }

        info!(
            path = %output_path.display(),
            frames = frames.len(),
            width = self.width,
            height = self.height,
            "wrote animated gif"
        );
        Ok(frames.len())
    }
}

impl GifExporter {
    /// Encode `frames` into `writer` and hand the writer back once the
    /// trailer is written. Frame sizes are not checked here.
    pub fn encode<W: Write>(&self, frames: &[RgbImage], writer: W) -> Result<W> {
        let mut encoder = Encoder::new(writer, self.width, self.height, &[])?;
        encoder.set_repeat(self.repeat)?;

        for (step, image) in frames.iter().enumerate() {
            debug!(step, "quantizing frame");
            let mut frame =
                Frame::from_rgb_speed(self.width, self.height, image.as_raw(), self.quantize_speed);
            frame.delay = self.delay_cs;
            encoder.write_frame(&frame)?;
        }
        Ok(encoder.into_inner()?)
    }
}

/// Decode `path` and count its frames.
pub fn count_frames<P: AsRef<Path>>(path: P) -> Result<usize> {
    let file = File::open(path)?;
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::Indexed);
    let mut decoder = options.read_info(BufReader::new(file))?;

    let mut frames = 0;
    while decoder.read_next_frame()?.is_some() {
        frames += 1;
    }
    Ok(frames)
}
