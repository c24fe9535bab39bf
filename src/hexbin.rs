use crate::colormap::{LogNorm, inferno};
use crate::constants::{BACKGROUND, HEXBIN_GRIDSIZE, HEXBIN_SIZE_PX};
use crate::error::{Result, VizError};
use crate::extent::{Extent, Viewport};
use crate::renderer::FrameRenderer;
use crate::time_array::PointSlice;
use image::{Rgb, RgbImage};
use rayon::prelude::*;
use tracing::debug;

const NO_CELL: u32 = u32::MAX;

/// One hexagon of the grid.
///
/// Hexagons sit on two interleaved rectangular lattices: `Primary` centres on
/// the grid corners, `Secondary` centres offset by half a step in x and y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexCell {
    Primary { i: usize, j: usize },
    Secondary { i: usize, j: usize },
}

#[derive(Debug, Clone)]
pub struct HexGrid {
    nx: usize,
    ny: usize,
    xmin: f64,
    ymin: f64,
    sx: f64,
    sy: f64,
}

impl HexGrid {
    /// `gridsize` hexagons across the x axis; the y count keeps them regular.
    pub fn new(gridsize: usize, extent: Extent) -> Result<Self> {
        extent.validate()?;
        let nx = gridsize;
        let ny = (nx as f64 / 3f64.sqrt()) as usize;
        if nx == 0 || ny == 0 {
            return Err(VizError::InvalidConfig(format!(
                "gridsize {} is too small for a hex grid",
                gridsize
            )));
        }
        // every cell index has to fit the u32 pixel map, below NO_CELL
        let primary = nx.checked_add(1).and_then(|a| a.checked_mul(ny + 1));
        let secondary = nx.checked_mul(ny);
        let cells = primary.zip(secondary).and_then(|(p, s)| p.checked_add(s));
        if !cells.is_some_and(|n| n < NO_CELL as usize) {
            return Err(VizError::InvalidConfig(format!(
                "gridsize {} needs more hex cells than can be indexed",
                gridsize
            )));
        }

        // the hexagons cover [xmin, xmax] exactly, pad against round-off
        let padding = 1e-9 * extent.width();
        let xmin = extent.xmin - padding;
        let xmax = extent.xmax + padding;

        Ok(Self {
            nx,
            ny,
            xmin,
            ymin: extent.ymin,
            sx: (xmax - xmin) / nx as f64,
            sy: extent.height() / ny as f64,
        })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    fn primary_len(&self) -> usize {
        (self.nx + 1) * (self.ny + 1)
    }

    pub fn cell_count(&self) -> usize {
        self.primary_len() + self.nx * self.ny
    }

    /// Dense index of `cell`, primary cells first.
    pub fn index(&self, cell: HexCell) -> usize {
        match cell {
            HexCell::Primary { i, j } => i * (self.ny + 1) + j,
            HexCell::Secondary { i, j } => self.primary_len() + i * self.ny + j,
        }
    }

    pub fn cell_at(&self, index: usize) -> Option<HexCell> {
        if index < self.primary_len() {
            Some(HexCell::Primary {
                i: index / (self.ny + 1),
                j: index % (self.ny + 1),
            })
        } else if index < self.cell_count() {
            let k = index - self.primary_len();
            Some(HexCell::Secondary {
                i: k / self.ny,
                j: k % self.ny,
            })
        } else {
            None
        }
    }

    pub fn center(&self, cell: HexCell) -> (f64, f64) {
        let (fi, fj) = match cell {
            HexCell::Primary { i, j } => (i as f64, j as f64),
            HexCell::Secondary { i, j } => (i as f64 + 0.5, j as f64 + 0.5),
        };
        (self.xmin + fi * self.sx, self.ymin + fj * self.sy)
    }

    /// Hexagon containing `(x, y)`.
    ///
    /// Both lattices offer a candidate: the nearest primary corner and the
    /// enclosing secondary centre. The closer one under the hex metric
    /// (`dx^2 + 3 dy^2` in grid units) wins; if the winner falls outside its
    /// lattice the point is not binned.
    pub fn locate(&self, x: f64, y: f64) -> Option<HexCell> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let gx = (x - self.xmin) / self.sx;
        let gy = (y - self.ymin) / self.sy;

        let ix1 = gx.round_ties_even();
        let iy1 = gy.round_ties_even();
        let ix2 = gx.floor();
        let iy2 = gy.floor();

        let d1 = (gx - ix1).powi(2) + 3.0 * (gy - iy1).powi(2);
        let d2 = (gx - ix2 - 0.5).powi(2) + 3.0 * (gy - iy2 - 0.5).powi(2);

        if d1 < d2 {
            let (i, j) = in_lattice(ix1, iy1, self.nx + 1, self.ny + 1)?;
            Some(HexCell::Primary { i, j })
        } else {
            let (i, j) = in_lattice(ix2, iy2, self.nx, self.ny)?;
            Some(HexCell::Secondary { i, j })
        }
    }

    pub fn count(&self, points: &PointSlice) -> HexCounts {
        let mut counts = vec![0u32; self.cell_count()];
        let mut binned = 0;
        for (x, y) in points.iter() {
            if let Some(cell) = self.locate(x, y) {
                counts[self.index(cell)] += 1;
                binned += 1;
            }
        }
        HexCounts { counts, binned }
    }
}

fn in_lattice(i: f64, j: f64, ni: usize, nj: usize) -> Option<(usize, usize)> {
    if i < 0.0 || j < 0.0 || i >= ni as f64 || j >= nj as f64 {
        return None;
    }
    Some((i as usize, j as usize))
}

/// Per-cell point counts, indexed by [`HexGrid::index`].
#[derive(Debug, Clone)]
pub struct HexCounts {
    counts: Vec<u32>,
    binned: usize,
}

impl HexCounts {
    pub fn get(&self, index: usize) -> u32 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.binned
    }

    pub fn occupied(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Log scale over the smallest and largest non-zero counts.
    pub fn log_norm(&self) -> Option<LogNorm> {
        let nonzero = self.counts.iter().copied().filter(|&c| c > 0);
        let min = nonzero.clone().min()?;
        let max = nonzero.max()?;
        LogNorm::new(min as f64, max as f64)
    }
}

/// Hexagonal density plot coloured with inferno on a log count scale.
/// Empty cells are left as background.
pub struct HexbinRenderer {
    viewport: Viewport,
    grid: HexGrid,
    gridsize: usize,
    background: Rgb<u8>,
    // grid index for every pixel, row-major; NO_CELL outside the lattice
    pixel_cells: Vec<u32>,
}

impl HexbinRenderer {
    pub fn new(width: u32, height: u32, gridsize: usize, extent: Extent) -> Result<Self> {
        let grid = HexGrid::new(gridsize, extent)?;
        let viewport = Viewport::new(extent, width, height)?;

        debug!(width, height, cells = grid.cell_count(), "mapping pixels to hex cells");
        let pixel_cells: Vec<u32> = (0..height)
            .into_par_iter()
            .flat_map_iter(|py| {
                let grid = &grid;
                (0..width).map(move |px| {
                    let (x, y) = viewport.pixel_center(px, py);
                    grid.locate(x, y)
                        .and_then(|cell| u32::try_from(grid.index(cell)).ok())
                        .unwrap_or(NO_CELL)
                })
            })
            .collect();

        Ok(Self {
            viewport,
            grid,
            gridsize,
            background: BACKGROUND,
            pixel_cells,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(HEXBIN_SIZE_PX, HEXBIN_SIZE_PX, HEXBIN_GRIDSIZE, Extent::default())
    }

    pub fn with_background(mut self, background: Rgb<u8>) -> Self {
        self.background = background;
        self
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn gridsize(&self) -> usize {
        self.gridsize
    }
}

impl FrameRenderer for HexbinRenderer {
    fn render(&self, points: &PointSlice) -> RgbImage {
        let counts = self.grid.count(points);
        let mut img = RgbImage::from_pixel(self.viewport.width, self.viewport.height, self.background);

        let Some(norm) = counts.log_norm() else {
            return img;
        };

        // one colour per occupied cell, then paint by lookup
        let colors: Vec<Option<Rgb<u8>>> = (0..self.grid.cell_count())
            .map(|index| match counts.get(index) {
                0 => None,
                c => Some(inferno(norm.normalize(c as f64))),
            })
            .collect();

        let width = self.viewport.width as usize;
        for (offset, &cell) in self.pixel_cells.iter().enumerate() {
            if cell == NO_CELL {
                continue;
            }
            if let Some(color) = colors[cell as usize] {
                img.put_pixel((offset % width) as u32, (offset / width) as u32, color);
            }
        }
        img
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.viewport.width, self.viewport.height)
    }

    fn label(&self) -> String {
        format!("hexbin ({} bins)", self.gridsize)
    }
}
