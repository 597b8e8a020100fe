//! Renders the sampled series onto a fixed-size 2-D surface.

use crate::error::RenderError;
use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use profile_core::Sample;
use std::ops::Range;

/// `WithKeyPoints<RangedCoordf64>` does not implement `ValueFormatter` in
/// plotters 0.3, which `configure_mesh` requires; this wrapper delegates
/// everything to the inner coordinate to satisfy that bound.
struct KeyPointCoord(WithKeyPoints<RangedCoordf64>);

impl Ranged for KeyPointCoord {
    type ValueType = f64;
    type FormatOption = NoDefaultFormatting;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn range(&self) -> Range<f64> {
        self.0.range()
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

impl ValueFormatter<f64> for KeyPointCoord {
    fn format(value: &f64) -> String {
        <RangedCoordf64 as ValueFormatter<f64>>::format(value)
    }
}

/// Candidate distance-axis tick steps in meters.
const DISTANCE_TICK_STEPS_M: [f64; 8] = [10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0];

/// Minimum guaranteed vertical span of the chart in meters.
const MIN_VERTICAL_SPAN_M: f64 = 10.0;

const GROUND_COLOR: RGBColor = RGBColor(96, 140, 72);
const ALTITUDE_COLOR: RGBColor = RGBColor(40, 90, 200);

/// Pick the distance tick step: the smallest candidate that yields at most
/// five ticks across the route, falling back to the largest candidate.
fn distance_tick_step(total_m: f64) -> f64 {
    let target = total_m / 5.0;
    DISTANCE_TICK_STEPS_M
        .iter()
        .copied()
        .find(|&step| step >= target)
        .unwrap_or(DISTANCE_TICK_STEPS_M[DISTANCE_TICK_STEPS_M.len() - 1])
}

fn distance_ticks(total_m: f64) -> Vec<f64> {
    let step = distance_tick_step(total_m);
    let mut ticks = Vec::new();
    let mut d = 0.0;
    while d <= total_m {
        ticks.push(d);
        d += step;
    }
    ticks
}

/// Vertical chart range: from the lower of ground minimum and zero up to
/// the highest of ground, planned altitude and a non-degenerate floor span.
fn vertical_range(samples: &[Sample]) -> (f64, f64) {
    let mut ground_min = f64::INFINITY;
    let mut ground_max = f64::NEG_INFINITY;
    let mut planned_max = f64::NEG_INFINITY;
    for sample in samples {
        if let Some(elev) = sample.ground_elevation_m {
            ground_min = ground_min.min(elev);
            ground_max = ground_max.max(elev);
        }
        planned_max = planned_max.max(sample.planned_altitude_m);
    }
    if !ground_min.is_finite() {
        ground_min = 0.0;
    }

    let y_min = ground_min.min(0.0);
    let mut y_max = ground_min + MIN_VERTICAL_SPAN_M;
    if ground_max.is_finite() {
        y_max = y_max.max(ground_max);
    }
    if planned_max.is_finite() {
        y_max = y_max.max(planned_max);
    }
    (y_min, y_max)
}

/// A fixed-size drawing surface backed by an RGB pixel buffer.
///
/// The buffer is resized to the logical size times the device scale factor
/// before every render, so lines stay crisp regardless of display scaling.
pub struct ProfileSurface {
    logical_width: u32,
    logical_height: u32,
    scale_factor: f64,
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl ProfileSurface {
    pub fn new(logical_width: u32, logical_height: u32, scale_factor: f64) -> Self {
        let mut surface = Self {
            logical_width,
            logical_height,
            scale_factor,
            width: 0,
            height: 0,
            buffer: Vec::new(),
        };
        surface.prepare();
        surface
    }

    pub fn set_logical_size(&mut self, width: u32, height: u32) {
        self.logical_width = width;
        self.logical_height = height;
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Backing pixel dimensions after the last render.
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGB pixel buffer, `width * height * 3` bytes.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Resize the backing buffer to the displayed size times the device
    /// scale factor.
    fn prepare(&mut self) {
        self.width = ((f64::from(self.logical_width) * self.scale_factor).round() as u32).max(1);
        self.height = ((f64::from(self.logical_height) * self.scale_factor).round() as u32).max(1);
        self.buffer.resize((self.width * self.height * 3) as usize, 0);
    }

    fn px(&self, logical: f64) -> f64 {
        logical * self.scale_factor
    }

    /// Clear the surface and draw a centered status message.
    pub fn render_placeholder(&mut self, message: &str) -> Result<(), RenderError> {
        self.prepare();
        let (width, height) = (self.width, self.height);
        let font_size = self.px(15.0);

        let root = BitMapBackend::with_buffer(&mut self.buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(RenderError::from_draw)?;
        let text_color = BLACK.mix(0.65);
        let style = TextStyle::from(("sans-serif", font_size).into_font())
            .color(&text_color)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            message.to_string(),
            ((width / 2) as i32, (height / 2) as i32),
            style,
        ))
        .map_err(RenderError::from_draw)?;
        root.present().map_err(RenderError::from_draw)?;
        Ok(())
    }

    /// Draw the full profile chart: ground elevation fill, planned-altitude
    /// line, axes and tick labels.
    pub fn render_profile(&mut self, samples: &[Sample]) -> Result<(), RenderError> {
        self.prepare();
        let (width, height) = (self.width, self.height);

        let total_m = samples.last().map(|s| s.distance_m).unwrap_or(0.0).max(1.0);
        let ticks = distance_ticks(total_m);
        let (y_min, y_max) = vertical_range(samples);

        let margin = self.px(8.0) as i32;
        let x_label_area = self.px(26.0) as i32;
        let y_label_area = self.px(44.0) as i32;
        let label_font = self.px(11.0);
        let desc_font = self.px(12.0);
        let stroke = (self.scale_factor.round() as u32).max(1);

        let root = BitMapBackend::with_buffer(&mut self.buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(RenderError::from_draw)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(margin)
            .x_label_area_size(x_label_area)
            .y_label_area_size(y_label_area)
            .build_cartesian_2d(
                KeyPointCoord((0.0..total_m).with_key_points(ticks)),
                y_min..y_max,
            )
            .map_err(RenderError::from_draw)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc("Distance (m)")
            .y_desc("Elevation (m)")
            .label_style(("sans-serif", label_font))
            .axis_desc_style(("sans-serif", desc_font))
            .x_label_formatter(&|d| format!("{d:.0}"))
            .y_label_formatter(&|e| format!("{e:.0}"))
            .draw()
            .map_err(RenderError::from_draw)?;

        // Terrain polygon through the valid samples, closed along the
        // chart's baseline. Fewer than two valid points cannot form one.
        let ground: Vec<(f64, f64)> = samples
            .iter()
            .filter_map(|s| s.ground_elevation_m.map(|e| (s.distance_m, e)))
            .collect();
        if ground.len() >= 2 {
            chart
                .draw_series(
                    AreaSeries::new(ground, y_min, GROUND_COLOR.mix(0.35))
                        .border_style(GROUND_COLOR.stroke_width(stroke)),
                )
                .map_err(RenderError::from_draw)?;
        }

        chart
            .draw_series(LineSeries::new(
                samples.iter().map(|s| (s.distance_m, s.planned_altitude_m)),
                ALTITUDE_COLOR.stroke_width(stroke),
            ))
            .map_err(RenderError::from_draw)?;

        root.present().map_err(RenderError::from_draw)?;
        Ok(())
    }
}
