use super::Plugin;
use crate::extensions::easing::Ease;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatOptions {
    /// Round the result to the nearest integer.
    pub snapping: bool,
}

/// Scalar `f32` interpolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatPlugin;

impl Plugin for FloatPlugin {
    type Value = f32;
    type Data = f32;
    type Options = FloatOptions;

    fn to_data(&self, _options: &FloatOptions, value: &f32) -> f32 {
        *value
    }

    fn change_value(&self, _options: &FloatOptions, start: &f32, end: &f32) -> f32 {
        end - start
    }

    fn relative_end_value(&self, _options: &FloatOptions, start: &f32, change: &f32) -> f32 {
        start + change
    }

    fn incremental_start(&self, _options: &FloatOptions, start: &f32, change: &f32, loop_index: u32) -> f32 {
        start + change * loop_index as f32
    }

    fn calculate(
        &self,
        options: &FloatOptions,
        _current: Option<&f32>,
        elapsed: f32,
        start: &f32,
        change: &f32,
        duration: f32,
        ease: &Ease,
    ) -> f32 {
        let value = ease.evaluate(elapsed, *start, *change, duration);
        if options.snapping { value.round() } else { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::easing::Easing;

    #[test]
    fn linear_midpoint() {
        let ease = Ease::from(Easing::Linear);
        let opts = FloatOptions::default();
        let change = FloatPlugin.change_value(&opts, &0.0, &10.0);
        let v = FloatPlugin.calculate(&opts, None, 1.0, &0.0, &change, 2.0, &ease);
        assert!((v - 5.0).abs() < 1e-5);
    }

    #[test]
    fn snapping_rounds() {
        let ease = Ease::from(Easing::Linear);
        let opts = FloatOptions { snapping: true };
        let v = FloatPlugin.calculate(&opts, None, 0.26, &0.0, &10.0, 1.0, &ease);
        assert_eq!(v, 3.0);
    }

    #[test]
    fn incremental_offsets_by_whole_changes() {
        let opts = FloatOptions::default();
        assert_eq!(FloatPlugin.incremental_start(&opts, &1.0, &2.0, 3), 7.0);
    }
}
