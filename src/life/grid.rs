use serde::{Deserialize, Serialize};

/// How neighbor lookups treat indices outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// Out-of-bounds neighbors contribute 0.
    ZeroPadded,
    /// Indices wrap modulo the grid dimensions.
    Wrap,
}

/// Immutable-per-generation binary grid. Cell values are always 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// All-dead grid. Panics on a zero-sized axis; dimensions come from
    /// validated config.
    pub fn new_dead(rows: usize, cols: usize) -> Self {
        assert!(rows >= 1 && cols >= 1, "grid must be at least 1x1");
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        debug_assert!(value <= 1);
        self.cells[row * self.cols + col] = value;
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Sum of live cells; the TrialResult scalar.
    pub fn live_count(&self) -> u32 {
        self.cells.iter().map(|&c| u32::from(c)).sum()
    }

    /// 8-neighborhood sums for every cell under the boundary policy.
    pub fn neighbor_counts(&self, policy: BoundaryPolicy) -> Field {
        let values: Vec<i32> = self.cells.iter().map(|&c| i32::from(c)).collect();
        neighbor_sums(&values, self.rows, self.cols, policy)
    }
}

/// Integer field with the shape of a grid. Holds neighbor counts, which may
/// leave [0, 8] transiently once noise is injected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    rows: usize,
    cols: usize,
    values: Vec<i32>,
}

impl Field {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.values[row * self.cols + col]
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut i32 {
        &mut self.values[row * self.cols + col]
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [i32] {
        &mut self.values
    }

    /// 8-neighborhood sums of this field itself. The tiered regression rule
    /// convolves the noised-count field a second time.
    pub fn neighbor_sums(&self, policy: BoundaryPolicy) -> Field {
        neighbor_sums(&self.values, self.rows, self.cols, policy)
    }
}

const OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn neighbor_sums(values: &[i32], rows: usize, cols: usize, policy: BoundaryPolicy) -> Field {
    let mut out = vec![0i32; rows * cols];
    for row in 0..rows {
        for col in 0..cols {
            let mut sum = 0;
            for (dr, dc) in OFFSETS {
                let nr = row as isize + dr;
                let nc = col as isize + dc;
                match policy {
                    BoundaryPolicy::ZeroPadded => {
                        if nr >= 0 && nr < rows as isize && nc >= 0 && nc < cols as isize {
                            sum += values[nr as usize * cols + nc as usize];
                        }
                    }
                    BoundaryPolicy::Wrap => {
                        let wr = nr.rem_euclid(rows as isize) as usize;
                        let wc = nc.rem_euclid(cols as isize) as usize;
                        sum += values[wr * cols + wc];
                    }
                }
            }
            out[row * cols + col] = sum;
        }
    }
    Field {
        rows,
        cols,
        values: out,
    }
}

/// In-bounds neighbor coordinates of a cell, row-major order.
pub fn in_bounds_neighbors(row: usize, col: usize, rows: usize, cols: usize) -> Vec<(usize, usize)> {
    OFFSETS
        .iter()
        .filter_map(|&(dr, dc)| {
            let nr = row as isize + dr;
            let nc = col as isize + dc;
            if nr >= 0 && nr < rows as isize && nc >= 0 && nc < cols as isize {
                Some((nr as usize, nc as usize))
            } else {
                None
            }
        })
        .collect()
}
