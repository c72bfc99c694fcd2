//! CPU rendering of alert popup contents.
//!
//! Text is shaped with `cosmic-text` and drawn with `tiny-skia` into a pixmap
//! that the surface copies into the window with `softbuffer`.

use cosmic_text::{
    Align, Attrs, Buffer, Color as TextColor, Family, FontSystem, Metrics, Shaping, SwashCache,
    Weight,
};
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect, Stroke, Transform};

/// Widest a popup grows before wrapping, in logical pixels.
pub(crate) const POPUP_MAX_WIDTH: f64 = 400.0;

/// Narrowest popup, in logical pixels.
pub(crate) const POPUP_MIN_WIDTH: f64 = 120.0;

/// Space between the border and the text, in logical pixels.
pub(crate) const POPUP_PADDING: f64 = 10.0;

const FONT_SIZE: f32 = 16.0;
const LINE_HEIGHT: f32 = 1.2;

/// Shapes and paints popup text. Loading the system fonts is slow, so one
/// renderer is kept for the life of the surface store.
pub(crate) struct PopupRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl PopupRenderer {
    pub(crate) fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    /// Logical window size that fits `text` with padding.
    pub(crate) fn popup_size(&mut self, text: &str) -> (f64, f64) {
        let wrap_width = POPUP_MAX_WIDTH - 2.0 * POPUP_PADDING;
        let buffer = self.layout(text, wrap_width as f32, 1.0);
        let (text_width, text_height) = extent(&buffer);

        // One spare pixel so rounding never rewraps the last word.
        let width = (f64::from(text_width) + 2.0 * POPUP_PADDING + 1.0)
            .clamp(POPUP_MIN_WIDTH, POPUP_MAX_WIDTH);
        let height = f64::from(text_height).max(f64::from(FONT_SIZE * LINE_HEIGHT))
            + 2.0 * POPUP_PADDING;
        (width, height)
    }

    /// Paint white background, a 1 px black border and centered bold text
    /// into a pixmap of `width` x `height` physical pixels.
    pub(crate) fn render(&mut self, text: &str, width: u32, height: u32, scale: f32) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(Color::WHITE);

        let border = Rect::from_xywh(0.5, 0.5, width as f32 - 1.0, height as f32 - 1.0)?;
        let mut border_paint = Paint::default();
        border_paint.set_color(Color::BLACK);
        border_paint.anti_alias = false;
        pixmap.stroke_path(
            &PathBuilder::from_rect(border),
            &border_paint,
            &Stroke::default(),
            Transform::identity(),
            None,
        );

        let padding = POPUP_PADDING as f32 * scale;
        let buffer = self.layout(text, width as f32 - 2.0 * padding, scale);
        let (_, text_height) = extent(&buffer);
        let top = ((height as f32 - text_height) / 2.0).max(padding);

        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            TextColor::rgb(0, 0, 0),
            |x, y, w, h, color| {
                let Some(rect) =
                    Rect::from_xywh(padding + x as f32, top + y as f32, w as f32, h as f32)
                else {
                    return;
                };
                let mut paint = Paint::default();
                paint.set_color_rgba8(color.r(), color.g(), color.b(), color.a());
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            },
        );

        Some(pixmap)
    }

    fn layout(&mut self, text: &str, wrap_width: f32, scale: f32) -> Buffer {
        let size = FONT_SIZE * scale;
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(size, size * LINE_HEIGHT));
        buffer.set_size(&mut self.font_system, Some(wrap_width.max(1.0)), None);

        let attrs = Attrs::new().family(Family::SansSerif).weight(Weight::BOLD);
        buffer.set_text(
            &mut self.font_system,
            text,
            &attrs,
            Shaping::Advanced,
            Some(Align::Center),
        );
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

/// Widest line and total height of the laid-out text.
fn extent(buffer: &Buffer) -> (f32, f32) {
    buffer
        .layout_runs()
        .fold((0.0f32, 0.0f32), |(width, height), run| {
            (width.max(run.line_w), height + run.line_height)
        })
}

/// `softbuffer` pixel (`0x00RRGGBB`) for an opaque pixmap pixel.
pub(crate) fn xrgb(pixel: PremultipliedColorU8) -> u32 {
    (u32::from(pixel.red()) << 16) | (u32::from(pixel.green()) << 8) | u32::from(pixel.blue())
}
