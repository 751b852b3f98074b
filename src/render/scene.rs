use crate::foundation::core::{Canvas, GridSpec};
use crate::foundation::error::{StitchlineError, StitchlineResult};

/// How far a fringe strand hangs below the last completed row, in pixels.
pub const FRINGE_DROP: f64 = 8.0;

/// Backend-agnostic draw op. Styling (colors, gradient stops, stroke widths)
/// is owned by the backend; the scene only carries placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp {
    /// Completed stitch cell with its top-left corner at (x, y).
    CompletedCell { x: f64, y: f64 },
    /// Incomplete stitch cell with its top-left corner at (x, y).
    IncompleteCell { x: f64, y: f64 },
    /// Fringe strand from (x, y) down to (x + dx, y + FRINGE_DROP).
    Fringe { x: f64, y: f64, dx: f64 },
}

/// A full repaint of the scarf: every cell, plus fringe when any row is done.
#[derive(Clone, Debug)]
pub struct ScarfScene {
    pub canvas: Canvas,
    pub cell_width: f64,
    pub cell_height: f64,
    pub ops: Vec<DrawOp>,
}

/// Build the draw-op list for the given progress.
///
/// Cell `(row, col)` is complete iff `row < current_rows`. The op list covers
/// the entire grid every time; the backend clears the surface before painting,
/// so a repaint is idempotent.
#[tracing::instrument]
pub fn build_scene(
    grid: GridSpec,
    canvas: Canvas,
    current_rows: u32,
) -> StitchlineResult<ScarfScene> {
    if current_rows > grid.rows {
        return Err(StitchlineError::validation(format!(
            "current_rows {current_rows} exceeds grid rows {}",
            grid.rows
        )));
    }

    let cell_width = grid.cell_width(canvas);
    let cell_height = grid.cell_height(canvas);

    let mut ops = Vec::with_capacity(op_capacity(grid));
    for row in 0..grid.rows {
        let y = f64::from(row) * cell_height;
        let completed = row < current_rows;
        for col in 0..grid.columns {
            let x = f64::from(col) * cell_width;
            ops.push(if completed {
                DrawOp::CompletedCell { x, y }
            } else {
                DrawOp::IncompleteCell { x, y }
            });
        }
    }

    if current_rows > 0 {
        let start_y = f64::from(current_rows) * cell_height;
        for col in 0..grid.columns {
            if col % 3 != 0 {
                continue;
            }
            // sin(col) as a fixed pseudo-wave: decorative but deterministic.
            let x = f64::from(col) * cell_width + cell_width / 2.0;
            let dx = f64::from(col).sin() * 2.0;
            ops.push(DrawOp::Fringe { x, y: start_y, dx });
        }
    }

    Ok(ScarfScene {
        canvas,
        cell_width,
        cell_height,
        ops,
    })
}

/// Upper bound on the op count: every cell plus one fringe strand per column.
/// Computed in usize so grids near the u32 limits do not overflow.
fn op_capacity(grid: GridSpec) -> usize {
    grid.rows as usize * grid.columns as usize + grid.columns as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridSpec {
        GridSpec::new(150, 55).unwrap()
    }

    fn canvas() -> Canvas {
        Canvas {
            width: 550,
            height: 1200,
        }
    }

    fn count(scene: &ScarfScene, pred: impl Fn(&DrawOp) -> bool) -> usize {
        scene.ops.iter().filter(|op| pred(op)).count()
    }

    #[test]
    fn cell_split_follows_current_rows() {
        let scene = build_scene(grid(), canvas(), 40).unwrap();
        assert_eq!(
            count(&scene, |op| matches!(op, DrawOp::CompletedCell { .. })),
            40 * 55
        );
        assert_eq!(
            count(&scene, |op| matches!(op, DrawOp::IncompleteCell { .. })),
            110 * 55
        );
    }

    #[test]
    fn fringe_present_iff_rows_completed() {
        let empty = build_scene(grid(), canvas(), 0).unwrap();
        assert_eq!(count(&empty, |op| matches!(op, DrawOp::Fringe { .. })), 0);

        // Every third column: 0, 3, ..., 54.
        let some = build_scene(grid(), canvas(), 1).unwrap();
        assert_eq!(count(&some, |op| matches!(op, DrawOp::Fringe { .. })), 19);
    }

    #[test]
    fn fringe_is_deterministic_per_column() {
        let scene = build_scene(grid(), canvas(), 10).unwrap();
        let fringe: Vec<_> = scene
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fringe { x, y, dx } => Some((*x, *y, *dx)),
                _ => None,
            })
            .collect();

        let cell_h = scene.cell_height;
        for (i, (x, y, dx)) in fringe.iter().enumerate() {
            let col = (i * 3) as f64;
            assert_eq!(*x, col * scene.cell_width + scene.cell_width / 2.0);
            assert_eq!(*y, 10.0 * cell_h);
            assert_eq!(*dx, col.sin() * 2.0);
        }
    }

    #[test]
    fn repaint_is_pure() {
        let a = build_scene(grid(), canvas(), 73).unwrap();
        let b = build_scene(grid(), canvas(), 73).unwrap();
        assert_eq!(a.ops, b.ops);
    }

    #[test]
    fn rows_beyond_grid_rejected() {
        assert!(build_scene(grid(), canvas(), 151).is_err());
    }

    #[test]
    fn op_capacity_handles_huge_grids() {
        assert_eq!(op_capacity(grid()), 150 * 55 + 55);

        // rows * columns exceeds u32 here; the count must not wrap.
        let huge = GridSpec::new(100_000, 50_000).unwrap();
        assert_eq!(op_capacity(huge), 5_000_050_000);
    }
}
