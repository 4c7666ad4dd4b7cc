//! Paint planning, kept apart from the browser so it can be tested natively.
//!
//! A plan is an ordered list of draw operations: clear, font, one glyph per
//! character of the challenge, then the noise lines. `canvas::draw` replays it
//! onto a real 2D context.

use std::fmt;

use rand::Rng;

pub const FONT: &str = "30px Arial";
pub const LEFT_MARGIN: f64 = 10.0;
pub const GLYPH_STRIDE: f64 = 20.0;
pub const BASELINE: f64 = 30.0;
pub const NOISE_LINES: usize = 5;

/// 24-bit RGB color, rendered as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Color(rng.gen_range(0..=0x00ff_ffff))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0x00ff_ffff)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear { width: f64, height: f64 },
    Font(&'static str),
    Glyph { ch: char, x: f64, y: f64, color: Color },
    Line { from: (f64, f64), to: (f64, f64), color: Color },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaintPlan {
    pub ops: Vec<DrawOp>,
}

impl PaintPlan {
    pub fn glyphs(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Glyph { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }
}

/// x position of the `index`-th glyph.
pub fn glyph_x(index: usize) -> f64 {
    LEFT_MARGIN + index as f64 * GLYPH_STRIDE
}

/// Build the full repaint for `text` on a `width` x `height` surface.
///
/// Glyphs are not clipped: long texts simply run past the right edge.
pub fn plan<R: Rng>(rng: &mut R, text: &str, width: u32, height: u32) -> PaintPlan {
    let (w, h) = (f64::from(width), f64::from(height));
    let mut ops = Vec::with_capacity(2 + text.len() + NOISE_LINES);
    ops.push(DrawOp::Clear { width: w, height: h });
    ops.push(DrawOp::Font(FONT));
    for (i, ch) in text.chars().enumerate() {
        ops.push(DrawOp::Glyph { ch, x: glyph_x(i), y: BASELINE, color: Color::random(rng) });
    }
    for _ in 0..NOISE_LINES {
        let color = Color::random(rng);
        // gen::<f64>() is in [0, 1), so a zero-sized canvas pins endpoints to 0
        let from = (rng.r#gen::<f64>() * w, rng.r#gen::<f64>() * h);
        let to = (rng.r#gen::<f64>() * w, rng.r#gen::<f64>() * h);
        ops.push(DrawOp::Line { from, to, color });
    }
    PaintPlan { ops }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn color_is_zero_padded() {
        assert_eq!(Color(0x0000ff).to_string(), "#0000ff");
        assert_eq!(Color(0xabcdef).to_string(), "#abcdef");
        assert_eq!(Color(0).to_string(), "#000000");
    }

    #[test]
    fn plan_starts_with_clear_then_font() {
        let mut rng = SmallRng::seed_from_u64(3);
        let p = plan(&mut rng, "ab", 100, 40);
        assert_eq!(p.ops[0], DrawOp::Clear { width: 100.0, height: 40.0 });
        assert_eq!(p.ops[1], DrawOp::Font(FONT));
    }

    #[test]
    fn glyphs_follow_fixed_stride() {
        let mut rng = SmallRng::seed_from_u64(9);
        let p = plan(&mut rng, "xyz1", 100, 40);
        let xs: Vec<f64> = p
            .glyphs()
            .map(|op| match op {
                DrawOp::Glyph { x, y, .. } => {
                    assert_eq!(*y, BASELINE);
                    *x
                }
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(xs, vec![10.0, 30.0, 50.0, 70.0]);
    }

    #[test]
    fn glyphs_carry_the_text_in_order() {
        let mut rng = SmallRng::seed_from_u64(11);
        let p = plan(&mut rng, "Q7x", 100, 40);
        let s: String = p
            .glyphs()
            .filter_map(|op| match op {
                DrawOp::Glyph { ch, .. } => Some(*ch),
                _ => None,
            })
            .collect();
        assert_eq!(s, "Q7x");
    }

    #[test]
    fn five_lines_inside_bounds_after_glyphs() {
        let mut rng = SmallRng::seed_from_u64(5);
        let p = plan(&mut rng, "abcdef", 120, 45);
        assert_eq!(p.lines().count(), NOISE_LINES);
        for op in p.lines() {
            let DrawOp::Line { from, to, .. } = op else { unreachable!() };
            for (x, y) in [from, to] {
                assert!((0.0..120.0).contains(x));
                assert!((0.0..45.0).contains(y));
            }
        }
        let first_line = p.ops.iter().position(|op| matches!(op, DrawOp::Line { .. })).unwrap();
        assert_eq!(first_line, 2 + 6);
    }

    #[test]
    fn zero_sized_canvas_does_not_panic() {
        let mut rng = SmallRng::seed_from_u64(5);
        let p = plan(&mut rng, "", 0, 0);
        assert_eq!(p.ops.len(), 2 + NOISE_LINES);
    }
}
