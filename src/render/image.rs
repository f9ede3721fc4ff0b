//! Surface rendering for strokes using tiny-skia
//!
//! The renderer keeps the current frame of the drawing surface as a pixmap.
//! That pixmap is what the user sees and what an export captures.

use image::RgbaImage;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke as SkStroke,
    Transform,
};

use super::geometry;
use crate::config::StrokeColor;
use crate::domain::{Point, Snapshot, Stroke, SurfaceSize};

/// Raster of the completed strokes, reused until the model is cleared
struct CompletedLayer {
    epoch: u64,
    count: usize,
    pixmap: Pixmap,
}

/// Renders path model snapshots onto the drawing surface
///
/// Completed strokes are drawn in order, then the active stroke on top. The
/// only state kept between frames is a raster of the completed strokes keyed
/// by `(epoch, count)`; completed strokes are append-only within an epoch, so
/// drawing just the new ones onto the cached raster yields the same pixels as
/// a full redraw.
pub struct SurfaceRenderer {
    size: SurfaceSize,
    background: StrokeColor,
    surface: Option<Pixmap>,
    cache: Option<CompletedLayer>,
}

impl SurfaceRenderer {
    /// Create a renderer with an empty, transparent surface
    ///
    /// A zero-size surface is accepted; it renders nothing and cannot be
    /// exported.
    pub fn new(size: SurfaceSize, background: StrokeColor) -> Self {
        let surface = size
            .dimensions()
            .and_then(|dim| Pixmap::new(dim.width(), dim.height()));
        if surface.is_none() {
            log::warn!(
                "Drawing surface has no pixels: {}x{}",
                size.width,
                size.height
            );
        }
        Self {
            size,
            background,
            surface,
            cache: None,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn background(&self) -> StrokeColor {
        self.background
    }

    /// Render a snapshot onto the surface, replacing the previous frame
    pub fn render(&mut self, snapshot: Snapshot<'_>) {
        let Some(dim) = self.size.dimensions() else {
            return;
        };

        let reusable = matches!(
            &self.cache,
            Some(layer) if layer.epoch == snapshot.epoch && layer.count <= snapshot.completed.len()
        );
        if !reusable {
            log::debug!(
                "Rebuilding completed stroke layer (epoch {}, {} strokes)",
                snapshot.epoch,
                snapshot.completed.len()
            );
            self.cache = Pixmap::new(dim.width(), dim.height()).map(|pixmap| CompletedLayer {
                epoch: snapshot.epoch,
                count: 0,
                pixmap,
            });
        }

        let Some(layer) = self.cache.as_mut() else {
            return;
        };
        for stroke in &snapshot.completed[layer.count..] {
            draw_stroke(&mut layer.pixmap, stroke);
        }
        layer.count = snapshot.completed.len();

        let mut frame = layer.pixmap.clone();
        if let Some(active) = snapshot.active {
            draw_stroke(&mut frame, active);
        }
        self.surface = Some(frame);
    }

    /// Current frame as displayed (transparent where nothing was drawn)
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.surface.as_ref()
    }

    /// Copy the current frame for capture
    pub fn frame(&self) -> Frame {
        Frame {
            pixmap: self.surface.clone(),
            background: self.background,
        }
    }
}

/// Owned copy of one rendered frame
#[derive(Clone, Debug)]
pub struct Frame {
    pixmap: Option<Pixmap>,
    background: StrokeColor,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, |p| p.width())
    }

    pub fn height(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, |p| p.height())
    }

    /// Convert to straight-alpha RGBA
    ///
    /// With `flatten` the frame is composited onto the surface background so
    /// every pixel is opaque. Returns `None` for a zero-size frame.
    pub fn to_rgba_image(&self, flatten: bool) -> Option<RgbaImage> {
        let pixmap = self.pixmap.as_ref()?;
        if !flatten {
            return Some(pixmap_to_rgba(pixmap));
        }

        let mut flat = Pixmap::new(pixmap.width(), pixmap.height())?;
        let [r, g, b, a] = self.background.to_rgba_u8();
        flat.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        flat.draw_pixmap(
            0,
            0,
            pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Some(pixmap_to_rgba(&flat))
    }
}

/// Demultiply a tiny-skia pixmap into an RgbaImage
fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut raw = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    // Buffer length always matches width * height * 4
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), raw)
        .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()))
}

/// Build an open polyline through the stroke points
fn build_polyline_path(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.finish()
}

/// Draw one stroke with round caps and joins, or a dot for a single point
fn draw_stroke(pixmap: &mut Pixmap, stroke: &Stroke) {
    let [r, g, b, a] = stroke.color().to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    if stroke.is_dot() {
        let p = stroke.points()[0];
        if let Some(path) = PathBuilder::from_circle(p.x, p.y, geometry::dot_radius(stroke.width()))
        {
            pixmap.fill_path(
                &path,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        return;
    }

    let Some(path) = build_polyline_path(stroke.points()) else {
        return;
    };
    let sk_stroke = SkStroke {
        width: geometry::effective_width(stroke.width()),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &sk_stroke, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PathModel;

    fn size() -> SurfaceSize {
        SurfaceSize::new(64, 48)
    }

    fn draw(model: &mut PathModel, points: &[(f32, f32)], color: StrokeColor, width: f32) {
        model.begin(points[0].into(), color, width);
        for p in &points[1..] {
            model.extend((*p).into());
        }
        model.commit();
    }

    fn alpha_at(renderer: &SurfaceRenderer, x: u32, y: u32) -> u8 {
        let pixmap = renderer.pixmap().unwrap();
        pixmap.pixel(x, y).unwrap().alpha()
    }

    #[test]
    fn test_empty_snapshot_renders_transparent_surface() {
        let model = PathModel::new();
        let mut renderer = SurfaceRenderer::new(size(), StrokeColor::WHITE);
        renderer.render(model.snapshot());

        let pixmap = renderer.pixmap().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (64, 48));
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let mut model = PathModel::new();
        draw(&mut model, &[(5.0, 5.0), (30.0, 20.0), (50.0, 40.0)], StrokeColor::default(), 4.0);
        model.begin(Point::new(10.0, 40.0), StrokeColor::default(), 6.0);
        model.extend(Point::new(20.0, 10.0));

        let mut renderer = SurfaceRenderer::new(size(), StrokeColor::WHITE);
        renderer.render(model.snapshot());
        let first = renderer.pixmap().unwrap().data().to_vec();
        renderer.render(model.snapshot());
        let second = renderer.pixmap().unwrap().data().to_vec();

        assert_eq!(first, second);
    }

    #[test]
    fn test_incremental_render_matches_fresh_render() {
        let mut model = PathModel::new();
        let mut incremental = SurfaceRenderer::new(size(), StrokeColor::WHITE);

        draw(&mut model, &[(2.0, 2.0), (60.0, 2.0)], StrokeColor::default(), 3.0);
        incremental.render(model.snapshot());
        draw(&mut model, &[(2.0, 40.0), (60.0, 10.0)], StrokeColor::WHITE, 5.0);
        incremental.render(model.snapshot());

        let mut fresh = SurfaceRenderer::new(size(), StrokeColor::WHITE);
        fresh.render(model.snapshot());

        assert_eq!(
            incremental.pixmap().unwrap().data(),
            fresh.pixmap().unwrap().data()
        );
    }

    #[test]
    fn test_single_point_renders_dot() {
        let mut model = PathModel::new();
        draw(&mut model, &[(20.0, 20.0)], StrokeColor::default(), 8.0);

        let mut renderer = SurfaceRenderer::new(size(), StrokeColor::WHITE);
        renderer.render(model.snapshot());

        assert_eq!(alpha_at(&renderer, 20, 20), 255);
        // diameter equals the width: radius 4 around (20, 20)
        assert_eq!(alpha_at(&renderer, 22, 20), 255);
        assert_eq!(alpha_at(&renderer, 20, 17), 255);
        assert_eq!(alpha_at(&renderer, 25, 20), 0);
        assert_eq!(alpha_at(&renderer, 20, 25), 0);
        // round, not square: the bounding box corner stays empty
        assert_eq!(alpha_at(&renderer, 23, 23), 0);
        assert_eq!(alpha_at(&renderer, 40, 40), 0);
    }

    #[test]
    fn test_polyline_has_round_caps() {
        let mut model = PathModel::new();
        draw(&mut model, &[(10.0, 24.0), (40.0, 24.0)], StrokeColor::default(), 8.0);

        let mut renderer = SurfaceRenderer::new(size(), StrokeColor::WHITE);
        renderer.render(model.snapshot());

        // the cap extends half the width past the endpoint
        assert!(alpha_at(&renderer, 42, 24) > 200);
        assert_eq!(alpha_at(&renderer, 45, 24), 0);
        // a square cap would cover this corner
        assert_eq!(alpha_at(&renderer, 43, 27), 0);
        assert_eq!(alpha_at(&renderer, 25, 29), 0);
    }

    #[test]
    fn test_active_stroke_drawn_on_top() {
        let red = StrokeColor::from_hex("#FF0000").unwrap();
        let blue = StrokeColor::from_hex("#0000FF").unwrap();
        let mut model = PathModel::new();
        draw(&mut model, &[(0.0, 24.0), (64.0, 24.0)], red, 6.0);
        model.begin(Point::new(32.0, 0.0), blue, 6.0);
        model.extend(Point::new(32.0, 48.0));

        let mut renderer = SurfaceRenderer::new(size(), StrokeColor::WHITE);
        renderer.render(model.snapshot());

        let c = renderer.pixmap().unwrap().pixel(32, 24).unwrap().demultiply();
        assert_eq!((c.red(), c.green(), c.blue()), (0, 0, 255));
    }

    #[test]
    fn test_clear_invalidates_cached_layer() {
        let mut model = PathModel::new();
        draw(&mut model, &[(0.0, 0.0), (63.0, 47.0)], StrokeColor::default(), 4.0);
        let mut renderer = SurfaceRenderer::new(size(), StrokeColor::WHITE);
        renderer.render(model.snapshot());

        model.clear();
        renderer.render(model.snapshot());
        assert!(renderer.pixmap().unwrap().pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_flatten_uses_background() {
        let model = PathModel::new();
        let mut renderer = SurfaceRenderer::new(size(), StrokeColor::WHITE);
        renderer.render(model.snapshot());
        let frame = renderer.frame();

        let flat = frame.to_rgba_image(true).unwrap();
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255, 255]);

        let raw = frame.to_rgba_image(false).unwrap();
        assert_eq!(raw.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_zero_size_surface_has_no_frame() {
        let renderer = SurfaceRenderer::new(SurfaceSize::new(0, 10), StrokeColor::WHITE);
        let frame = renderer.frame();
        assert_eq!((frame.width(), frame.height()), (0, 0));
        assert!(frame.to_rgba_image(true).is_none());
    }
}
