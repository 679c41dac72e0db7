use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::Plugin;
use crate::extensions::easing::Ease;

/// Linear RGBA color, laid out for direct upload as four floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const CLEAR: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    fn channels(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Color::new(c[0], c[1], c[2], c[3])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorOptions {
    /// Animate alpha only; RGB is read back from the property.
    pub alpha_only: bool,
}

/// Channel-wise color interpolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorPlugin;

impl Plugin for ColorPlugin {
    type Value = Color;
    type Data = Color;
    type Options = ColorOptions;

    fn to_data(&self, _options: &ColorOptions, value: &Color) -> Color {
        *value
    }

    fn change_value(&self, _options: &ColorOptions, start: &Color, end: &Color) -> Color {
        Color::new(end.r - start.r, end.g - start.g, end.b - start.b, end.a - start.a)
    }

    fn relative_end_value(&self, _options: &ColorOptions, start: &Color, change: &Color) -> Color {
        Color::new(start.r + change.r, start.g + change.g, start.b + change.b, start.a + change.a)
    }

    fn incremental_start(&self, _options: &ColorOptions, start: &Color, change: &Color, loop_index: u32) -> Color {
        let n = loop_index as f32;
        Color::new(
            start.r + change.r * n,
            start.g + change.g * n,
            start.b + change.b * n,
            start.a + change.a * n,
        )
    }

    fn reads_current(&self, options: &ColorOptions) -> bool {
        options.alpha_only
    }

    fn calculate(
        &self,
        options: &ColorOptions,
        current: Option<&Color>,
        elapsed: f32,
        start: &Color,
        change: &Color,
        duration: f32,
        ease: &Ease,
    ) -> Color {
        let a = ease.evaluate(elapsed, start.a, change.a, duration);
        if let (true, Some(current)) = (options.alpha_only, current) {
            return current.with_alpha(a);
        }
        let (s, c) = (start.channels(), change.channels());
        Color::new(
            ease.evaluate(elapsed, s[0], c[0], duration),
            ease.evaluate(elapsed, s[1], c[1], duration),
            ease.evaluate(elapsed, s[2], c[2], duration),
            a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::easing::Easing;

    #[test]
    fn fades_between_colors() {
        let ease = Ease::from(Easing::Linear);
        let opts = ColorOptions::default();
        let change = ColorPlugin.change_value(&opts, &Color::BLACK, &Color::WHITE);
        let c = ColorPlugin.calculate(&opts, None, 0.5, &Color::BLACK, &change, 1.0, &ease);
        assert_eq!(c, Color::new(0.5, 0.5, 0.5, 1.0));
    }

    #[test]
    fn alpha_only_preserves_live_rgb() {
        let ease = Ease::from(Easing::Linear);
        let opts = ColorOptions { alpha_only: true };
        let live = Color::new(0.2, 0.4, 0.6, 1.0);
        let change = Color::new(0.0, 0.0, 0.0, -1.0);
        let c = ColorPlugin.calculate(&opts, Some(&live), 1.0, &Color::WHITE, &change, 1.0, &ease);
        assert_eq!(c, live.with_alpha(0.0));
    }

    #[test]
    fn color_is_pod() {
        let c = Color::new(1.0, 2.0, 3.0, 4.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&c));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }
}
