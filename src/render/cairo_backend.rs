use std::f64::consts::{FRAC_PI_2, PI};
use std::io::Write;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, FrameSummary, LinePrimitive, LineStrokeStyle, PolygonPrimitive, RectPrimitive,
    RenderFrame, Renderer, TextHAlign, TextPrimitive,
};

/// What the last Cairo pass actually drew.
pub type CairoRenderStats = FrameSummary;

/// Renderers that can draw into a context owned by the host, such as the
/// one a GTK `DrawingArea` hands to its draw function.
pub trait CairoContextRenderer {
    fn render_on_cairo_context(&mut self, context: &Context, frame: &RenderFrame)
    -> ChartResult<()>;
}

/// Cairo + Pango backend.
///
/// `Renderer::render` draws into an owned image surface that can be exported
/// as PNG; `CairoContextRenderer` draws in place on a host context.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    font_family: String,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidViewport {
                width: width.max(0).unsigned_abs(),
                height: height.max(0).unsigned_abs(),
            });
        }
        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| backend_error("create image surface", err))?;
        Ok(Self {
            surface,
            font_family: "Sans".to_owned(),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Writes the offscreen surface as PNG.
    pub fn write_png(&self, writer: &mut impl Write) -> ChartResult<()> {
        self.surface
            .write_to_png(writer)
            .map_err(|err| ChartError::InvalidData(format!("png export failed: {err}")))
    }

    fn draw(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        if let Some(background) = frame.background {
            set_source(context, background);
            context
                .paint()
                .map_err(|err| backend_error("paint background", err))?;
        }

        frame
            .polygons
            .iter()
            .try_for_each(|polygon| fill_polygon(context, polygon))?;
        frame
            .rects
            .iter()
            .try_for_each(|rect| paint_rect(context, *rect))?;
        frame
            .lines
            .iter()
            .try_for_each(|line| stroke_line(context, *line))?;
        context.set_dash(&[], 0.0);
        for text in &frame.texts {
            show_text(context, text, &self.font_family);
        }

        self.last_stats = frame.summary();
        trace!(primitives = self.last_stats.total(), "cairo frame drawn");
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context =
            Context::new(&self.surface).map_err(|err| backend_error("create context", err))?;
        self.draw(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.draw(context, frame)
    }
}

fn set_source(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn fill_polygon(context: &Context, polygon: &PolygonPrimitive) -> ChartResult<()> {
    let Some(((x0, y0), rest)) = polygon.points.split_first() else {
        return Ok(());
    };
    context.move_to(*x0, *y0);
    for (x, y) in rest {
        context.line_to(*x, *y);
    }
    context.close_path();
    set_source(context, polygon.fill_color);
    context
        .fill()
        .map_err(|err| backend_error("fill polygon", err))
}

fn paint_rect(context: &Context, rect: RectPrimitive) -> ChartResult<()> {
    rect_path(context, rect);
    set_source(context, rect.fill_color);
    if rect.border_width <= 0.0 {
        return context.fill().map_err(|err| backend_error("fill rect", err));
    }
    context
        .fill_preserve()
        .map_err(|err| backend_error("fill rect", err))?;
    set_source(context, rect.border_color);
    context.set_line_width(rect.border_width);
    context
        .stroke()
        .map_err(|err| backend_error("stroke rect border", err))
}

/// Plain rectangle, or a rounded one for circle badges and pattern boxes.
fn rect_path(context: &Context, rect: RectPrimitive) {
    let radius = rect
        .corner_radius
        .min(rect.width / 2.0)
        .min(rect.height / 2.0);
    if radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);
    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn stroke_line(context: &Context, line: LinePrimitive) -> ChartResult<()> {
    let width = line.stroke_width;
    match line.stroke_style {
        LineStrokeStyle::Solid => context.set_dash(&[], 0.0),
        LineStrokeStyle::Dashed => context.set_dash(&[4.0 * width, 3.0 * width], 0.0),
        LineStrokeStyle::Dotted => context.set_dash(&[width, 2.0 * width], 0.0),
    }
    set_source(context, line.color);
    context.set_line_width(width);
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    context
        .stroke()
        .map_err(|err| backend_error("stroke line", err))
}

fn show_text(context: &Context, text: &TextPrimitive, family: &str) {
    let layout = pangocairo::functions::create_layout(context);
    let font = FontDescription::from_string(&format!("{family} {}px", text.font_size_px));
    layout.set_font_description(Some(&font));
    layout.set_text(&text.text);

    let (width, _) = layout.pixel_size();
    let x = match text.h_align {
        TextHAlign::Left => text.x,
        TextHAlign::Center => text.x - f64::from(width) / 2.0,
        TextHAlign::Right => text.x - f64::from(width),
    };
    set_source(context, text.color);
    context.move_to(x, text.y);
    pangocairo::functions::show_layout(context, &layout);
}

fn backend_error(action: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("cairo failed to {action}: {err}"))
}
