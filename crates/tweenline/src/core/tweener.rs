// core/tweener.rs
//
// Leaf payload: one property, one plugin, captured start/end/change values.
// Type-erased behind `Tweener` so the node tree never sees the value type.

use crate::extensions::easing::Ease;
use crate::plugins::{Accessor, Plugin};

/// Object-safe view of a leaf the advance algorithm drives.
pub(crate) trait Tweener {
    /// Capture start values from the property. Idempotent.
    fn startup(&mut self);

    /// Evaluate at `elapsed` within a loop and write the result.
    fn apply(&mut self, elapsed: f32, duration: f32, loop_index: u32, incremental: bool, ease: &Ease);

    fn set_relative(&mut self, relative: bool);
}

#[derive(Clone)]
enum Mode<D> {
    /// Tween from the live value to `end`.
    To { end: D },
    /// Tween from `from` to the value the property had at creation.
    From { from: D, original: D },
    /// Waypoint path relative to the live value (punch/shake).
    Path,
}

struct Values<D> {
    start: D,
    change: D,
}

pub(crate) struct TweenerCore<P: Plugin, A> {
    accessor: A,
    plugin: P,
    options: P::Options,
    mode: Mode<P::Data>,
    relative: bool,
    values: Option<Values<P::Data>>,
}

impl<P, A> TweenerCore<P, A>
where
    P: Plugin,
    A: Accessor<P::Value>,
{
    pub fn to(accessor: A, plugin: P, options: P::Options, end: P::Data) -> Self {
        Self {
            accessor,
            plugin,
            options,
            mode: Mode::To { end },
            relative: false,
            values: None,
        }
    }

    /// Reads the current value as the destination and writes `from` at once.
    pub fn from(accessor: A, plugin: P, options: P::Options, from: P::Data) -> Self {
        let original = plugin.to_data(&options, &accessor.read());
        let mut core = Self {
            accessor,
            plugin,
            options,
            mode: Mode::From { from, original },
            relative: false,
            values: None,
        };
        core.startup();
        core.write_start();
        core
    }

    pub fn path(accessor: A, plugin: P, options: P::Options) -> Self {
        Self {
            accessor,
            plugin,
            options,
            mode: Mode::Path,
            relative: false,
            values: None,
        }
    }

    fn write_start(&mut self) {
        let Some(values) = &self.values else { return };
        let value = self.plugin.calculate(
            &self.options,
            None,
            0.0,
            &values.start,
            &values.change,
            1.0,
            &Ease::default(),
        );
        self.accessor.write(value);
    }
}

impl<P, A> Tweener for TweenerCore<P, A>
where
    P: Plugin,
    A: Accessor<P::Value>,
{
    fn startup(&mut self) {
        if self.values.is_some() {
            return;
        }
        let (start, end) = match &self.mode {
            Mode::To { end } => {
                let start = self.plugin.to_data(&self.options, &self.accessor.read());
                let end = if self.relative {
                    self.plugin.relative_end_value(&self.options, &start, end)
                } else {
                    end.clone()
                };
                (start, end)
            }
            Mode::From { from, original } => {
                let start = if self.relative {
                    self.plugin.relative_end_value(&self.options, original, from)
                } else {
                    from.clone()
                };
                (start, original.clone())
            }
            Mode::Path => {
                let start = self.plugin.to_data(&self.options, &self.accessor.read());
                (start.clone(), start)
            }
        };
        let change = self.plugin.change_value(&self.options, &start, &end);
        self.values = Some(Values { start, change });
    }

    fn apply(&mut self, elapsed: f32, duration: f32, loop_index: u32, incremental: bool, ease: &Ease) {
        self.startup();
        let Some(values) = &self.values else { return };
        let start = if incremental && loop_index > 0 {
            self.plugin
                .incremental_start(&self.options, &values.start, &values.change, loop_index)
        } else {
            values.start.clone()
        };
        let current = if self.plugin.reads_current(&self.options) {
            Some(self.accessor.read())
        } else {
            None
        };
        let value = self.plugin.calculate(
            &self.options,
            current.as_ref(),
            elapsed,
            &start,
            &values.change,
            duration,
            ease,
        );
        self.accessor.write(value);
    }

    fn set_relative(&mut self, relative: bool) {
        if self.relative == relative {
            return;
        }
        self.relative = relative;
        if let Mode::From { .. } = self.mode {
            // From tweens already wrote their start; redo it with the new origin.
            self.values = None;
            self.startup();
            self.write_start();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::easing::Easing;
    use crate::plugins::{FloatOptions, FloatPlugin, Property};
    use std::cell::Cell;
    use std::rc::Rc;

    fn cell_prop(cell: &Rc<Cell<f32>>) -> impl Accessor<f32> {
        let (r, w) = (cell.clone(), cell.clone());
        Property::new(move || r.get(), move |v| w.set(v))
    }

    #[test]
    fn to_captures_start_lazily() {
        let cell = Rc::new(Cell::new(2.0));
        let mut core = TweenerCore::to(cell_prop(&cell), FloatPlugin, FloatOptions::default(), 6.0);
        assert!(core.values.is_none());
        cell.set(4.0);
        core.apply(0.5, 1.0, 0, false, &Ease::from(Easing::Linear));
        assert_eq!(cell.get(), 5.0);
    }

    #[test]
    fn from_writes_origin_immediately() {
        let cell = Rc::new(Cell::new(10.0));
        let mut core = TweenerCore::from(cell_prop(&cell), FloatPlugin, FloatOptions::default(), 0.0);
        assert_eq!(cell.get(), 0.0);
        core.apply(1.0, 1.0, 0, false, &Ease::from(Easing::Linear));
        assert_eq!(cell.get(), 10.0);
    }

    #[test]
    fn relative_to_adds_change() {
        let cell = Rc::new(Cell::new(3.0));
        let mut core = TweenerCore::to(cell_prop(&cell), FloatPlugin, FloatOptions::default(), 2.0);
        core.set_relative(true);
        core.apply(1.0, 1.0, 0, false, &Ease::from(Easing::Linear));
        assert_eq!(cell.get(), 5.0);
    }

    #[test]
    fn incremental_shifts_start_per_loop() {
        let cell = Rc::new(Cell::new(0.0));
        let mut core = TweenerCore::to(cell_prop(&cell), FloatPlugin, FloatOptions::default(), 1.0);
        core.apply(0.0, 1.0, 2, true, &Ease::from(Easing::Linear));
        assert_eq!(cell.get(), 2.0);
    }
}
