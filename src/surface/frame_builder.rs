use tracing::trace;

use crate::core::{
    ChartPattern, OhlcBar, PaneLayoutRegion, PaneRole, PlotContext, PriceScale, PriceScaleId,
    min_time_spacing, project_band_geometry, project_candles, project_histogram_bars,
    project_line_segments_split_at,
};
use crate::error::ChartResult;
use crate::extensions::{MarkerShape, PlacedMarker, place_markers};
use crate::render::{
    ChartStyle, LinePrimitive, PolygonPrimitive, RectPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};
use crate::surface::series::{HistogramPalette, SeriesData, SeriesKind, SeriesSlot};
use crate::surface::{ChartSurface, SeriesId};

const MIN_BAR_WIDTH_PX: f64 = 1.0;
const PATTERN_CORNER_RADIUS_PX: f64 = 4.0;

impl ChartSurface {
    /// Materializes every visible series into a backend-agnostic frame.
    ///
    /// Series whose scale cannot be resolved (no finite value) draw nothing.
    pub fn build_render_frame(&self) -> ChartResult<RenderFrame> {
        self.ensure_alive()?;
        let viewport = self.viewport();
        let style = self.style();
        let mut frame = RenderFrame::new(viewport).with_background(style.background);
        let regions = self.panes().layout_regions(f64::from(viewport.height));
        let spacing = min_time_spacing(self.anchor_times());

        for (id, slot) in self.series_slots() {
            if !slot.options.visible {
                continue;
            }
            let Some(plot) = self.plot_context_for(slot, &regions)? else {
                trace!(series = id.raw(), "series skipped: unresolved scale");
                continue;
            };
            let bar_spacing = spacing.unwrap_or_else(|| {
                let (start, end) = plot.time_scale.visible_range();
                end - start
            });

            match (&slot.options.kind, &slot.data) {
                (SeriesKind::Candlestick, SeriesData::Candles(bars)) => {
                    let width = plot.bar_width(
                        bar_spacing,
                        style.candle_body_fill_ratio,
                        MIN_BAR_WIDTH_PX,
                    );
                    push_candles(&mut frame, bars, &plot, width, style)?;
                }
                (SeriesKind::SentimentLine, SeriesData::Line(points)) => {
                    for segment in project_line_segments_split_at(points, &plot, 0.0) {
                        frame.lines.push(LinePrimitive::new(
                            segment.x1,
                            segment.y1,
                            segment.x2,
                            segment.y2,
                            style.sentiment_line_width,
                            style.sentiment_color(segment.value),
                        ));
                    }
                }
                (SeriesKind::ConfidenceBand, SeriesData::Band(points)) => {
                    let geometry = project_band_geometry(points, &plot);
                    if geometry.upper_line.len() >= 2 {
                        frame.polygons.push(PolygonPrimitive::new(
                            geometry.fill_polygon.iter().map(|v| (v.x, v.y)).collect(),
                            style.confidence_fill,
                        ));
                    }
                    for (edge, color) in [
                        (&geometry.upper_line, style.confidence_upper),
                        (&geometry.lower_line, style.confidence_lower),
                    ] {
                        for pair in edge.windows(2) {
                            frame.lines.push(
                                LinePrimitive::new(
                                    pair[0].x,
                                    pair[0].y,
                                    pair[1].x,
                                    pair[1].y,
                                    style.confidence_line_width,
                                    color,
                                )
                                .with_stroke_style(style.confidence_line_style),
                            );
                        }
                    }
                }
                (SeriesKind::Histogram(palette), SeriesData::Histogram(points)) => {
                    let width = plot.bar_width(
                        bar_spacing,
                        style.histogram_bar_fill_ratio,
                        MIN_BAR_WIDTH_PX,
                    );
                    for bar in project_histogram_bars(points, &plot, width, 0.0)? {
                        let color = match palette {
                            HistogramPalette::Momentum => style.momentum_color(bar.tone),
                            HistogramPalette::Volume => style.histogram_color(bar.tone),
                        };
                        frame.rects.push(RectPrimitive::from_edges(
                            bar.x_left,
                            bar.y_top,
                            bar.x_right,
                            bar.y_bottom,
                            color,
                        ));
                    }
                    if *palette == HistogramPalette::Momentum {
                        let zero_y = plot.y(0.0)?;
                        frame.lines.push(LinePrimitive::new(
                            0.0,
                            zero_y,
                            f64::from(plot.width),
                            zero_y,
                            1.0,
                            style.momentum_zero_line,
                        ));
                    }
                }
                (SeriesKind::Markers { host }, SeriesData::Markers(markers)) => {
                    let bars = self.host_candles(*host);
                    let layout = self.options().marker_layout;
                    let placed = place_markers(markers, bars, &plot, layout)?;
                    let size = layout.marker_size_px;
                    for marker in &placed {
                        push_marker(&mut frame, marker, size, style);
                    }
                }
                (SeriesKind::PatternBoxes { host }, SeriesData::Boxes(patterns)) => {
                    let bars = self.host_candles(*host);
                    let width = plot.bar_width(
                        bar_spacing,
                        style.candle_body_fill_ratio,
                        MIN_BAR_WIDTH_PX,
                    );
                    for pattern in patterns {
                        push_pattern_box(&mut frame, pattern, bars, &plot, width, style)?;
                    }
                }
                _ => {}
            }
        }

        if let Some(pointer) = self.crosshair_position() {
            let width = f64::from(viewport.width);
            let height = f64::from(viewport.height);
            for (x1, y1, x2, y2) in [
                (pointer.x, 0.0, pointer.x, height),
                (0.0, pointer.y, width, pointer.y),
            ] {
                frame.lines.push(
                    LinePrimitive::new(
                        x1,
                        y1,
                        x2,
                        y2,
                        style.crosshair_line_width,
                        style.crosshair_line,
                    )
                    .with_stroke_style(style.crosshair_line_style),
                );
            }
        }

        trace!(primitives = frame.summary().total(), "render frame built");
        Ok(frame)
    }

    /// Coordinate system of a series. Attached series use their host's.
    fn plot_context_for(
        &self,
        slot: &SeriesSlot,
        regions: &[PaneLayoutRegion],
    ) -> ChartResult<Option<PlotContext>> {
        let options = match slot.options.kind.host() {
            Some(host) => match self.slot(host) {
                Some(host_slot) => host_slot.options,
                None => return Ok(None),
            },
            None => slot.options,
        };
        self.plot_context(options.pane, options.price_scale, regions)
    }

    fn plot_context(
        &self,
        pane: PaneRole,
        price_scale: PriceScaleId,
        regions: &[PaneLayoutRegion],
    ) -> ChartResult<Option<PlotContext>> {
        let Some(pane_id) = self.panes().pane_for_role(pane) else {
            return Ok(None);
        };
        let Some(region) = regions.iter().find(|region| region.pane_id == pane_id) else {
            return Ok(None);
        };
        if region.height() <= 0.0 {
            return Ok(None);
        }

        let values: Vec<f64> = self
            .series_slots()
            .map(|(_, slot)| slot)
            .filter(|slot| {
                slot.options.visible
                    && slot.options.pane == pane
                    && slot.options.price_scale == price_scale
            })
            .flat_map(|slot| slot.data.scale_values())
            .collect();
        let Some(scale) = PriceScale::resolve(price_scale.default_options(), values)? else {
            return Ok(None);
        };

        Ok(Some(PlotContext {
            time_scale: self.time_scale(),
            price_scale: scale,
            width: self.viewport().width,
            region: *region,
        }))
    }

    fn host_candles(&self, host: SeriesId) -> &[OhlcBar] {
        match self.slot(host).map(|slot| &slot.data) {
            Some(SeriesData::Candles(bars)) => bars,
            _ => &[],
        }
    }
}

fn push_candles(
    frame: &mut RenderFrame,
    bars: &[OhlcBar],
    plot: &PlotContext,
    body_width: f64,
    style: &ChartStyle,
) -> ChartResult<()> {
    for candle in project_candles(bars, plot, body_width)? {
        let (body, wick) = if candle.bullish {
            (style.candle_up, style.wick_up)
        } else {
            (style.candle_down, style.wick_down)
        };
        let (wick_top, wick_bottom) = candle.wick;
        frame.lines.push(LinePrimitive::new(
            candle.x,
            wick_top,
            candle.x,
            wick_bottom,
            1.0,
            wick,
        ));
        let (body_top, body_bottom) = candle.body;
        frame.rects.push(
            RectPrimitive::from_edges(
                candle.body_left(),
                body_top,
                candle.body_right(),
                body_bottom,
                body,
            )
            .with_border(1.0, wick),
        );
    }
    Ok(())
}

fn push_marker(frame: &mut RenderFrame, marker: &PlacedMarker, size: f64, style: &ChartStyle) {
    let half = size / 2.0;
    let (x, y) = (marker.x, marker.y);
    match marker.shape {
        MarkerShape::Circle => frame.rects.push(
            RectPrimitive::new(x - half, y - half, size, size, marker.color)
                .with_corner_radius(half),
        ),
        MarkerShape::Square => frame
            .rects
            .push(RectPrimitive::new(x - half, y - half, size, size, marker.color)),
        MarkerShape::ArrowUp => frame.polygons.push(PolygonPrimitive::new(
            vec![(x, y - half), (x + half, y + half), (x - half, y + half)],
            marker.color,
        )),
    }
    if let Some(label) = &marker.label {
        frame.texts.push(TextPrimitive::new(
            label.text.clone(),
            label.center_x,
            label.top,
            style.label_font_size_px.min(label.height),
            marker.color.with_alpha(1.0),
            TextHAlign::Center,
        ));
    }
}

fn push_pattern_box(
    frame: &mut RenderFrame,
    pattern: &ChartPattern,
    bars: &[OhlcBar],
    plot: &PlotContext,
    bar_width: f64,
    style: &ChartStyle,
) -> ChartResult<()> {
    let (start, end) = pattern.span();
    let (Ok(start_x), Ok(end_x)) = (plot.x(start), plot.x(end)) else {
        trace!(pattern = %pattern.id, start, end, "pattern span not projectable, skipped");
        return Ok(());
    };
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for bar in bars
        .iter()
        .filter(|bar| bar.is_finite() && bar.time >= start && bar.time <= end)
    {
        let (bar_low, bar_high) = bar.envelope();
        low = low.min(bar_low);
        high = high.max(bar_high);
    }
    if low > high {
        return Ok(());
    }

    let half = bar_width / 2.0;
    let left = start_x - half;
    let right = end_x + half;
    let top = plot.y(high)?;
    let bottom = plot.y(low)?;
    frame.rects.push(
        RectPrimitive::from_edges(
            left,
            top,
            right,
            bottom,
            style.pattern_fill_color(pattern.bias, pattern.strength),
        )
        .with_border(1.0, style.pattern_border_color(pattern.bias))
        .with_corner_radius(PATTERN_CORNER_RADIUS_PX),
    );

    let label = if pattern.label.is_empty() {
        format!("{:.0}%", pattern.confidence)
    } else {
        format!("{} {:.0}%", pattern.label, pattern.confidence)
    };
    frame.texts.push(TextPrimitive::new(
        label,
        left + 4.0,
        top - style.label_font_size_px - 2.0,
        style.label_font_size_px,
        style.pattern_border_color(pattern.bias),
        TextHAlign::Left,
    ));
    Ok(())
}
