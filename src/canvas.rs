//! Browser canvas plumbing: element creation, 2D context lookup, plan replay.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::{CaptchaError, Result};
use crate::paint::{DrawOp, PaintPlan};

pub fn create_canvas(doc: &Document, width: u32, height: u32) -> Result<HtmlCanvasElement> {
    let canvas: HtmlCanvasElement = doc
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| CaptchaError::Dom("created element is not a canvas".into()))?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok(canvas)
}

/// Fetch the 2D context. A missing context is fatal for the widget.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")?
        .ok_or(CaptchaError::NoContext)?
        .dyn_into()
        .map_err(|_| CaptchaError::NoContext)
}

pub fn draw(ctx: &CanvasRenderingContext2d, plan: &PaintPlan) -> Result<()> {
    let mut buf = [0u8; 4];
    for op in &plan.ops {
        match op {
            DrawOp::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),
            DrawOp::Font(font) => ctx.set_font(font),
            DrawOp::Glyph { ch, x, y, color } => {
                ctx.set_fill_style_str(&color.to_string());
                ctx.fill_text(ch.encode_utf8(&mut buf), *x, *y)?;
            }
            DrawOp::Line { from, to, color } => {
                ctx.set_stroke_style_str(&color.to_string());
                line(ctx, from.0, from.1, to.0, to.1);
            }
        }
    }
    Ok(())
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}
