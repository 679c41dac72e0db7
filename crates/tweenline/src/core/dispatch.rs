// core/dispatch.rs
//
// Lifecycle callbacks. A callback receives the scheduler itself, so it can
// play, pause, kill or create tweens (including the one that fired it).
// Nothing in the node tree is borrowed while a callback runs.

use std::cell::RefCell;
use std::rc::Rc;

use super::scheduler::TweenScheduler;

/// Shared handle to a lifecycle callback.
pub type TweenCallback = Rc<RefCell<dyn FnMut(&mut TweenScheduler)>>;

pub(crate) fn callback(f: impl FnMut(&mut TweenScheduler) + 'static) -> TweenCallback {
    Rc::new(RefCell::new(f))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hook {
    Start,
    Update,
    StepComplete,
    Complete,
    Rewind,
}

#[derive(Default, Clone)]
pub(crate) struct Callbacks {
    pub on_start: Option<TweenCallback>,
    pub on_update: Option<TweenCallback>,
    pub on_step_complete: Option<TweenCallback>,
    pub on_complete: Option<TweenCallback>,
    pub on_rewind: Option<TweenCallback>,
}

impl Callbacks {
    pub fn get(&self, hook: Hook) -> Option<TweenCallback> {
        match hook {
            Hook::Start => self.on_start.clone(),
            Hook::Update => self.on_update.clone(),
            Hook::StepComplete => self.on_step_complete.clone(),
            Hook::Complete => self.on_complete.clone(),
            Hook::Rewind => self.on_rewind.clone(),
        }
    }

    pub fn set(&mut self, hook: Hook, cb: TweenCallback) {
        let slot = match hook {
            Hook::Start => &mut self.on_start,
            Hook::Update => &mut self.on_update,
            Hook::StepComplete => &mut self.on_step_complete,
            Hook::Complete => &mut self.on_complete,
            Hook::Rewind => &mut self.on_rewind,
        };
        *slot = Some(cb);
    }
}

/// Run `cb` against the scheduler. A callback that is already running
/// further up the stack is skipped rather than re-entered.
pub(crate) fn invoke(cb: &TweenCallback, hook: Hook, scheduler: &mut TweenScheduler) {
    match cb.try_borrow_mut() {
        Ok(mut f) => (&mut *f)(scheduler),
        Err(_) => log::warn!("{:?} callback re-entered while running; skipped", hook),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn hooks_map_to_their_slots() {
        let mut cbs = Callbacks::default();
        cbs.set(Hook::Complete, callback(|_| {}));
        assert!(cbs.get(Hook::Complete).is_some());
        assert!(cbs.get(Hook::Start).is_none());
        assert!(cbs.get(Hook::Rewind).is_none());
    }

    #[test]
    fn running_callback_is_not_reentered() {
        let hits = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<TweenCallback>>> = Rc::new(RefCell::new(None));
        let (h, s) = (hits.clone(), slot.clone());
        let cb = callback(move |sched| {
            h.set(h.get() + 1);
            let me = s.borrow().clone();
            if let Some(me) = me {
                invoke(&me, Hook::Update, sched);
            }
        });
        *slot.borrow_mut() = Some(cb.clone());

        let mut sched = TweenScheduler::new();
        invoke(&cb, Hook::Update, &mut sched);
        assert_eq!(hits.get(), 1);
    }
}
