//! Mapping from samples to 8x8 frames
//!
//! Every mode reduces to three drawing primitives:
//!
//! - **bars**: vertical bars standing on the bottom row, one per series
//! - **fill**: a pixel count painted column by column from the top-left
//! - **line**: one pixel per history sample, oldest on the left
//!
//! Heights come from [`ScaleBounds::pixel_height`] and are never clamped;
//! anything that lands off the grid is clipped by the [`Frame`].

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::animation::AnimationState;
use crate::config::{ScaleBounds, Settings};
use crate::delta::Throughput;
use crate::frame::{BOTTOM_ROW, Frame, MATRIX_SIZE};
use crate::sampler::{MultiSample, Sample};

// ============================================================================
// Layout
// ============================================================================

/// Full matrix width, shared by the CPU bars.
const FULL_SPAN_PX: i32 = MATRIX_SIZE as i32;

/// Columns given to the CPU bars in multi-metric mode.
pub const MULTI_CPU_SPAN_PX: i32 = 4;

/// Network bars: inbound on the left, outbound on the right.
const NET_BAR_WIDTH_PX: i32 = 3;
const NET_IN_COLUMN: i32 = 0;
const NET_OUT_COLUMN: i32 = 5;

/// Single-column indicators on the right half of the multi-metric frame.
const MULTI_NET_IN_COLUMN: i32 = 4;
const MULTI_NET_OUT_COLUMN: i32 = 5;
const MULTI_MEMORY_COLUMN: i32 = 6;
const MULTI_TEMPERATURE_COLUMN: i32 = 7;

// ============================================================================
// Primitives
// ============================================================================

/// Draw a bar `width` columns wide starting at column `x`, rising `height`
/// pixels from the bottom row. Zero or negative heights draw nothing.
pub fn draw_bar(frame: &mut Frame, x: i32, width: i32, height: i32) {
    if height <= 0 || width <= 0 {
        return;
    }
    let top = (MATRIX_SIZE as i32).saturating_sub(height);
    let right = x.saturating_add(width - 1);
    // Clip before filling so a saturated height costs no more than a full column.
    Rectangle::with_corners(Point::new(x, BOTTOM_ROW), Point::new(right, top))
        .intersection(&frame.bounding_box())
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(frame)
        .unwrap_or_else(|never| match never {});
}

/// Split `span_px` columns evenly across `values` and draw one bar each.
///
/// Each bar is `floor(span_px / values.len())` columns wide. Series that do
/// not fit (more series than columns) are dropped.
pub fn draw_bars(frame: &mut Frame, values: &[f32], span_px: i32, bounds: ScaleBounds) {
    if values.is_empty() {
        return;
    }
    let width = (span_px / values.len() as i32).max(1);

    for (index, value) in values.iter().enumerate() {
        let x = width * index as i32;
        if x >= span_px {
            break;
        }
        draw_bar(frame, x, width, bounds.pixel_height(*value));
    }
}

/// Pixels to fill for a load average: `round(load * factor)`.
pub fn fill_count(load: f32, factor: f32) -> usize {
    (load * factor).round().max(0.0) as usize
}

/// Light `count` pixels column by column, top to bottom, from the top-left.
pub fn draw_fill(frame: &mut Frame, count: usize) {
    let cells = (0..MATRIX_SIZE).flat_map(|x| (0..MATRIX_SIZE).map(move |y| (x, y)));
    for (x, y) in cells.take(count) {
        frame.set(x, y, true);
    }
}

/// Plot one pixel per sample at `(column, 8 - height)`.
///
/// A sample scaling to 0 sits just below the grid and is not visible.
pub fn draw_line(frame: &mut Frame, samples: &[f32], bounds: ScaleBounds) {
    for (column, value) in samples.iter().enumerate().take(MATRIX_SIZE) {
        let y = (MATRIX_SIZE as i32).saturating_sub(bounds.pixel_height(*value));
        Pixel(Point::new(column as i32, y), BinaryColor::On)
            .draw(frame)
            .unwrap_or_else(|never| match never {});
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Turns samples into frames. Holds the only render-side state: the idle
/// animation used by the load fill at zero load.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    temperature: ScaleBounds,
    multi_temperature: ScaleBounds,
    cpu: ScaleBounds,
    memory: ScaleBounds,
    network: ScaleBounds,
    load_fill_factor: f32,
    animation: AnimationState,
}

impl FrameRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            temperature: settings.temperature,
            multi_temperature: settings.multi_temperature,
            cpu: settings.cpu,
            memory: settings.memory,
            network: settings.network,
            load_fill_factor: settings.load_fill_factor,
            animation: AnimationState::new(),
        }
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn render(&mut self, sample: &Sample) -> Frame {
        let mut frame = Frame::blank();

        match sample {
            Sample::CpuBars(cores) => draw_bars(&mut frame, cores, FULL_SPAN_PX, self.cpu),
            Sample::LoadAverage(load) => {
                let count = fill_count(*load, self.load_fill_factor);
                if count == 0 {
                    return self.animation.advance();
                }
                draw_fill(&mut frame, count);
            }
            Sample::TemperatureLine(history) => draw_line(&mut frame, history, self.temperature),
            Sample::CpuLine(history) => draw_line(&mut frame, history, self.cpu),
            Sample::NetworkBars(rate) => self.draw_network(&mut frame, rate),
            Sample::MultiMetric(multi) => self.draw_multi(&mut frame, multi),
            Sample::Blank => {}
        }

        frame
    }

    fn draw_network(&self, frame: &mut Frame, rate: &Throughput) {
        let inbound = self.network.pixel_height(rate.bytes_in);
        let outbound = self.network.pixel_height(rate.bytes_out);
        draw_bar(frame, NET_IN_COLUMN, NET_BAR_WIDTH_PX, inbound);
        draw_bar(frame, NET_OUT_COLUMN, NET_BAR_WIDTH_PX, outbound);
    }

    fn draw_multi(&self, frame: &mut Frame, multi: &MultiSample) {
        draw_bars(frame, &multi.cores, MULTI_CPU_SPAN_PX, self.cpu);

        let indicators = [
            (MULTI_NET_IN_COLUMN, self.network.pixel_height(multi.network.bytes_in)),
            (MULTI_NET_OUT_COLUMN, self.network.pixel_height(multi.network.bytes_out)),
            (MULTI_MEMORY_COLUMN, self.memory.pixel_height(multi.memory_percent)),
            (
                MULTI_TEMPERATURE_COLUMN,
                self.multi_temperature.pixel_height(multi.temperature),
            ),
        ];
        for (column, height) in indicators {
            draw_bar(frame, column, 1, height);
        }
    }
}
