use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Shape;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{StitchlineError, StitchlineResult};
use crate::render::scene::{DrawOp, FRINGE_DROP, ScarfScene};

/// Readback frame: premultiplied RGBA8, row-major, tightly packed. With an
/// opaque clear color every pixel is opaque and premultiplied equals straight.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Straight-alpha clear color for the surface; `None` clears to transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

// Completed stitches: light red -> medium red -> darker red, top-left to
// bottom-right.
const COMPLETED_STOPS: [Rgba8; 3] = [
    Rgba8::rgb(0xD8, 0x80, 0x80),
    Rgba8::rgb(0xCD, 0x5C, 0x5C),
    Rgba8::rgb(0xB8, 0x55, 0x55),
];
// Knit V texture: black at 15% opacity.
const TEXTURE_STROKE: Rgba8 = Rgba8::rgba(0, 0, 0, 38);
// Incomplete stitches: green-gray at 10% / 20% opacity.
const INCOMPLETE_FILL: Rgba8 = Rgba8::rgba(139, 168, 136, 26);
const INCOMPLETE_OUTLINE: Rgba8 = Rgba8::rgba(139, 168, 136, 51);
const FRINGE_COLOR: Rgba8 = Rgba8::rgb(0xCD, 0x5C, 0x5C);

const CELL_INSET: f64 = 1.0;
const CELL_RADIUS: f64 = 2.0;
const HAIRLINE_WIDTH: f64 = 0.5;
const FRINGE_WIDTH: f64 = 2.0;
const PATH_TOLERANCE: f64 = 0.1;

// Per-cell geometry, built at the origin once per cell size and placed with a
// translation per op.
struct CellGeometry {
    key: (u64, u64),
    cell: vello_cpu::kurbo::BezPath,
    texture: vello_cpu::kurbo::BezPath,
    outline: vello_cpu::kurbo::BezPath,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    w: u32,
    h: u32,
}

/// CPU rasterizer for [`ScarfScene`] op lists, powered by `vello_cpu`.
pub struct CpuRenderer {
    settings: RenderSettings,
    ctx: Option<vello_cpu::RenderContext>,
    geometry: Option<CellGeometry>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
}

impl CpuRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ctx: None,
            geometry: None,
            gradient_cache: HashMap::new(),
        }
    }

    /// Rasterize a scene. The surface is fully cleared first; repainting the
    /// same scene yields identical pixels.
    #[tracing::instrument(skip(self, scene), fields(ops = scene.ops.len()))]
    pub fn render(&mut self, scene: &ScarfScene) -> StitchlineResult<FrameRgba> {
        let width_u16: u16 = scene
            .canvas
            .width
            .try_into()
            .map_err(|_| StitchlineError::render("canvas width exceeds u16"))?;
        let height_u16: u16 = scene
            .canvas
            .height
            .try_into()
            .map_err(|_| StitchlineError::render("canvas height exceeds u16"))?;

        self.ensure_geometry(scene.cell_width, scene.cell_height)?;
        let gradient = self.gradient_image(
            scene.cell_width.ceil().max(1.0) as u32,
            scene.cell_height.ceil().max(1.0) as u32,
        )?;
        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        if let Some(clear) = self.settings.clear_rgba {
            let [r, g, b, a] = clear;
            clear_pixmap(&mut pixmap, Rgba8::rgba(r, g, b, a).premultiplied());
        }

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width_u16 && ctx.height() == height_u16 => ctx,
            _ => vello_cpu::RenderContext::new(width_u16, height_u16),
        };
        ctx.reset();

        let Some(geometry) = self.geometry.as_ref() else {
            return Err(StitchlineError::render("cell geometry missing"));
        };

        for op in &scene.ops {
            match *op {
                DrawOp::CompletedCell { x, y } => {
                    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
                    ctx.set_paint(gradient.clone());
                    ctx.fill_path(&geometry.cell);
                    ctx.set_paint(color(TEXTURE_STROKE));
                    ctx.fill_path(&geometry.texture);
                }
                DrawOp::IncompleteCell { x, y } => {
                    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
                    ctx.set_paint(color(INCOMPLETE_FILL));
                    ctx.fill_path(&geometry.cell);
                    ctx.set_paint(color(INCOMPLETE_OUTLINE));
                    ctx.fill_path(&geometry.outline);
                }
                DrawOp::Fringe { x, y, dx } => {
                    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
                    ctx.set_paint(color(FRINGE_COLOR));
                    ctx.fill_path(&fringe_path(dx));
                }
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRgba {
            width: scene.canvas.width,
            height: scene.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn ensure_geometry(&mut self, cell_w: f64, cell_h: f64) -> StitchlineResult<()> {
        if cell_w <= 2.0 * CELL_INSET || cell_h <= 2.0 * CELL_INSET {
            return Err(StitchlineError::render(format!(
                "cell size {cell_w}x{cell_h} too small for a {CELL_INSET}px inset"
            )));
        }
        let key = (cell_w.to_bits(), cell_h.to_bits());
        if self.geometry.as_ref().is_some_and(|g| g.key == key) {
            return Ok(());
        }

        let cell = kurbo::RoundedRect::new(
            CELL_INSET,
            CELL_INSET,
            cell_w - CELL_INSET,
            cell_h - CELL_INSET,
            CELL_RADIUS,
        )
        .to_path(PATH_TOLERANCE);

        let mut v = kurbo::BezPath::new();
        v.move_to((cell_w * 0.3, 2.0));
        v.line_to((cell_w * 0.5, cell_h - 2.0));
        v.line_to((cell_w * 0.7, 2.0));
        let texture = stroke_outline(&v, HAIRLINE_WIDTH, kurbo::Cap::Butt);

        let outline_rect = kurbo::Rect::new(
            CELL_INSET,
            CELL_INSET,
            cell_w - CELL_INSET,
            cell_h - CELL_INSET,
        )
        .to_path(PATH_TOLERANCE);
        let outline = stroke_outline(&outline_rect, HAIRLINE_WIDTH, kurbo::Cap::Butt);

        self.geometry = Some(CellGeometry {
            key,
            cell: bezpath_to_cpu(&cell),
            texture,
            outline,
        });
        Ok(())
    }

    // Diagonal three-stop gradient as an image paint, one per cell size.
    fn gradient_image(&mut self, w: u32, h: u32) -> StitchlineResult<vello_cpu::Image> {
        let key = GradientKey { w, h };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }

        let w1 = (w.max(1) - 1) as f64;
        let h1 = (h.max(1) - 1) as f64;
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for y in 0..h {
            for x in 0..w {
                let tx = if w1 > 0.0 { f64::from(x) / w1 } else { 0.0 };
                let ty = if h1 > 0.0 { f64::from(y) / h1 } else { 0.0 };
                let c = sample_stops(&COMPLETED_STOPS, (tx + ty) / 2.0);
                pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array(
                    c.premultiplied(),
                ));
            }
        }

        let w16: u16 = w
            .try_into()
            .map_err(|_| StitchlineError::render("gradient width exceeds u16"))?;
        let h16: u16 = h
            .try_into()
            .map_err(|_| StitchlineError::render("gradient height exceeds u16"))?;
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w16, h16, true);
        let img = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }
}

fn color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba_premul: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba_premul);
    }
}

fn fringe_path(dx: f64) -> vello_cpu::kurbo::BezPath {
    let mut line = kurbo::BezPath::new();
    line.move_to((0.0, 0.0));
    line.line_to((dx, FRINGE_DROP));
    stroke_outline(&line, FRINGE_WIDTH, kurbo::Cap::Round)
}

// Expand a stroke into a fill outline so the raster backend only ever fills.
fn stroke_outline(path: &kurbo::BezPath, width: f64, cap: kurbo::Cap) -> vello_cpu::kurbo::BezPath {
    let style = kurbo::Stroke::new(width).with_caps(cap);
    let outline = kurbo::stroke(
        path.elements().iter().copied(),
        &style,
        &kurbo::StrokeOpts::default(),
        PATH_TOLERANCE,
    );
    bezpath_to_cpu(&outline)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn sample_stops(stops: &[Rgba8; 3], t: f64) -> Rgba8 {
    let t = t.clamp(0.0, 1.0);
    let (a, b, local) = if t <= 0.5 {
        (stops[0], stops[1], t * 2.0)
    } else {
        (stops[1], stops[2], (t - 0.5) * 2.0)
    };
    let lerp = |x: u8, y: u8| -> u8 {
        (f64::from(x) + (f64::from(y) - f64::from(x)) * local)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba8::rgba(
        lerp(a.r, b.r),
        lerp(a.g, b.g),
        lerp(a.b, b.b),
        lerp(a.a, b.a),
    )
}
