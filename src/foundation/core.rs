use crate::foundation::error::{StitchlineError, StitchlineResult};

/// Output surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// The fixed scarf grid: row and column counts.
///
/// Cell size is derived per repaint from the canvas dimensions; it is never
/// stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridSpec {
    pub rows: u32,
    pub columns: u32,
}

impl GridSpec {
    pub fn new(rows: u32, columns: u32) -> StitchlineResult<Self> {
        if rows == 0 {
            return Err(StitchlineError::validation("GridSpec rows must be > 0"));
        }
        if columns == 0 {
            return Err(StitchlineError::validation("GridSpec columns must be > 0"));
        }
        Ok(Self { rows, columns })
    }

    pub fn cell_width(self, canvas: Canvas) -> f64 {
        f64::from(canvas.width) / f64::from(self.columns)
    }

    pub fn cell_height(self, canvas: Canvas) -> f64 {
        f64::from(canvas.height) / f64::from(self.rows)
    }

    /// Canvas size for a container of the given pixel width.
    ///
    /// Cell width is `container / columns` clamped to `[8, 12]`; cell height
    /// is fixed at 8. The canvas is an exact multiple of the cell size so the
    /// grid always fills it.
    pub fn canvas_for_container(self, container_width: f64) -> Canvas {
        let cell_w = (container_width / f64::from(self.columns)).clamp(8.0, 12.0);
        let cell_h = 8.0;
        Canvas {
            width: (f64::from(self.columns) * cell_w).round() as u32,
            height: (f64::from(self.rows) * cell_h).round() as u32,
        }
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_spec_rejects_zero_dimensions() {
        assert!(GridSpec::new(0, 55).is_err());
        assert!(GridSpec::new(150, 0).is_err());
        assert!(GridSpec::new(150, 55).is_ok());
    }

    #[test]
    fn cell_size_divides_canvas() {
        let grid = GridSpec::new(150, 55).unwrap();
        let canvas = Canvas {
            width: 550,
            height: 1200,
        };
        assert_eq!(grid.cell_width(canvas), 10.0);
        assert_eq!(grid.cell_height(canvas), 8.0);
    }

    #[test]
    fn container_sizing_clamps_cell_width() {
        let grid = GridSpec::new(150, 55).unwrap();

        // Narrow container: cell width floors at 8.
        let narrow = grid.canvas_for_container(100.0);
        assert_eq!(narrow.width, 55 * 8);
        assert_eq!(narrow.height, 150 * 8);

        // Wide container: cell width caps at 12.
        let wide = grid.canvas_for_container(10_000.0);
        assert_eq!(wide.width, 55 * 12);
    }

    #[test]
    fn premultiply_is_exact_for_opaque_and_transparent() {
        let opaque = Rgba8::rgb(205, 92, 92);
        assert_eq!(opaque.premultiplied(), [205, 92, 92, 255]);

        let clear = Rgba8::rgba(139, 168, 136, 0);
        assert_eq!(clear.premultiplied(), [0, 0, 0, 0]);
    }
}
