//! Board geometry: mapping between world-space points and board cells.

use super::board::Position;
use super::protocol::Point3;

/// Supplies the board size and the point-to-cell conversion.
///
/// Both peers must use geometry that yields the same cell for the same point,
/// otherwise their boards diverge.
pub trait BoardGeometry {
    /// Fix the board origin at `origin`.
    fn anchor(&mut self, origin: Point3);

    /// Side length N of the board.
    fn board_size(&self) -> usize;

    /// Cell containing `point`, or `None` before the board is anchored.
    ///
    /// The result is not bounds-checked; the board rejects positions
    /// outside `[0, N)`.
    fn locate(&self, point: Point3) -> Option<Position>;
}

/// A flat square board on the horizontal plane.
///
/// The anchor point is the centre of cell (0, 0). Rows grow towards -z,
/// columns towards +x, each cell `cell_scale` wide.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareBoardGeometry {
    slot_count: usize,
    cell_scale: f32,
    origin: Option<Point3>,
}

impl SquareBoardGeometry {
    /// `slot_count` is the number of placeable slots the board model exposes;
    /// the side length is its integer square root.
    pub fn new(slot_count: usize, cell_scale: f32) -> Self {
        Self {
            slot_count,
            cell_scale,
            origin: None,
        }
    }

    /// Geometry for an `size`×`size` board.
    pub fn with_size(size: usize, cell_scale: f32) -> Self {
        Self::new(size * size, cell_scale)
    }

    pub fn cell_scale(&self) -> f32 {
        self.cell_scale
    }

    pub fn origin(&self) -> Option<Point3> {
        self.origin
    }

    /// World point of the top-left corner of the board.
    pub fn top_left(&self) -> Option<Point3> {
        let half = self.cell_scale * 0.5;
        self.origin.map(|o| o.offset(-half, 0.0, half))
    }

    /// Where a stone model for `pos` sits: one cell height above the board.
    pub fn stone_position(&self, pos: Position) -> Option<Point3> {
        let scale = self.cell_scale;
        self.origin.map(|o| {
            o.offset(
                pos.col as f32 * scale,
                scale,
                -(pos.row as f32) * scale,
            )
        })
    }
}

impl BoardGeometry for SquareBoardGeometry {
    fn anchor(&mut self, origin: Point3) {
        self.origin = Some(origin);
    }

    fn board_size(&self) -> usize {
        integer_sqrt(self.slot_count)
    }

    fn locate(&self, point: Point3) -> Option<Position> {
        let corner = self.top_left()?;
        let row = -(point.z - corner.z) / self.cell_scale;
        let col = (point.x - corner.x) / self.cell_scale;
        Some(Position::new(cell_index(row), cell_index(col)))
    }
}

/// Floor to a cell index. NaN (zero scale, bad input) maps off the board.
fn cell_index(v: f32) -> i32 {
    if v.is_nan() {
        -1
    } else {
        // `as` saturates infinities
        v.floor() as i32
    }
}

fn integer_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}
