use std::sync::OnceLock;

use streamdeck_lib::Context;
use streamdeck_render::{Canvas, FontHandle, FontRegistry, TextOptions, WrapOptions, wrap_text};

static FONT: OnceLock<FontHandle> = OnceLock::new();
static FONT_BYTES: &[u8] = include_bytes!("../de.lenidh.counter.sdPlugin/fonts/DejaVuSansMono.ttf");

const FONT_SIZES: [f32; 6] = [64.0, 56.0, 44.0, 36.0, 28.0, 20.0];
const MAX_WIDTH: f32 = 136.0;

fn font() -> &'static FontHandle {
    FONT.get_or_init(|| {
        FontRegistry::new()
            .load_bytes("dejavu-mono", FONT_BYTES)
            .expect("embedded DejaVu Sans Mono is a valid font")
    })
}

/// Render the count onto a key (144×144 PNG), shrinking the font for long
/// numbers so they always fit.
pub fn render_number(cx: &Context, ctx_id: &str, value: i64) {
    render_label(cx, ctx_id, &value.to_string());
}

/// Render the step with an explicit sign, e.g. `+1` or `-5`.
pub fn render_step(cx: &Context, ctx_id: &str, step: i64) {
    render_label(cx, ctx_id, &step_text(step));
}

fn step_text(step: i64) -> String {
    format!("{step:+}")
}

/// Render a short string centered on a key.
pub fn render_label(cx: &Context, ctx_id: &str, text: &str) {
    let font = font();
    let opts = WrapOptions { max_width: MAX_WIDTH, max_lines: 1 };

    let chosen_size = FONT_SIZES
        .iter()
        .copied()
        .find(|&size| {
            let lines = wrap_text(font, size, text, &opts);
            lines.len() == 1 && lines[0].width_px <= MAX_WIDTH
        })
        .unwrap_or(FONT_SIZES[FONT_SIZES.len() - 1]);

    let lines = wrap_text(font, chosen_size, text, &opts);

    let mut canvas = Canvas::key_icon();
    if !lines.is_empty() {
        canvas
            .draw_text(&lines, &TextOptions::new(font.clone(), chosen_size))
            .ok();
    }

    if let Ok(data_url) = canvas.finish().to_data_url() {
        cx.sd().set_image(ctx_id, Some(data_url), None, None);
    }
}
