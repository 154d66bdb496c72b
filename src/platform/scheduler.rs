//! requestAnimationFrame / setInterval scheduler
//!
//! Both callbacks are created once and reused for every (re)schedule, so a
//! tick that cancels and reschedules its own loop never drops the closure
//! that is currently running.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::games::Cadence;
use crate::lifecycle::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handle {
    Frame(i32),
    Interval(i32),
}

#[derive(Default)]
struct LoopState {
    wanted: Cell<Option<Cadence>>,
    pending: Cell<Option<Handle>>,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct WebScheduler {
    window: Window,
    state: Rc<LoopState>,
    frame: FrameCallback,
    interval: Closure<dyn FnMut()>,
}

fn request_frame(window: &Window, frame: &FrameCallback, state: &LoopState) {
    let Some(callback) = frame.borrow().as_ref().map(|c| c.as_ref().clone()) else {
        return;
    };
    match window.request_animation_frame(callback.unchecked_ref()) {
        Ok(id) => state.pending.set(Some(Handle::Frame(id))),
        Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
    }
}

impl WebScheduler {
    /// `on_tick` receives the frame timestamp (ms) or the wall clock for intervals
    pub fn new(window: Window, on_tick: Rc<dyn Fn(f64)>) -> Self {
        let state = Rc::new(LoopState::default());
        let frame: FrameCallback = Rc::new(RefCell::new(None));

        {
            let window = window.clone();
            let state = state.clone();
            let on_tick = on_tick.clone();
            let next = frame.clone();
            *frame.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |now: f64| {
                // This request has fired
                state.pending.set(None);
                on_tick(now);
                let still_wanted = state.wanted.get() == Some(Cadence::Frame);
                if still_wanted && state.pending.get().is_none() {
                    request_frame(&window, &next, &state);
                }
            }));
        }

        let interval = Closure::<dyn FnMut()>::new(move || on_tick(js_sys::Date::now()));

        Self {
            window,
            state,
            frame,
            interval,
        }
    }
}

impl Scheduler for WebScheduler {
    fn schedule(&mut self, cadence: Cadence) {
        self.state.wanted.set(Some(cadence));
        if self.state.pending.get().is_some() {
            return;
        }
        match cadence {
            Cadence::Frame => request_frame(&self.window, &self.frame, &self.state),
            Cadence::Interval { ms } => {
                let timeout = ms.min(i32::MAX as u32) as i32;
                match self
                    .window
                    .set_interval_with_callback_and_timeout_and_arguments_0(
                        self.interval.as_ref().unchecked_ref(),
                        timeout,
                    ) {
                    Ok(id) => self.state.pending.set(Some(Handle::Interval(id))),
                    Err(e) => log::warn!("setInterval failed: {e:?}"),
                }
            }
        }
    }

    fn cancel(&mut self) {
        self.state.wanted.set(None);
        match self.state.pending.take() {
            Some(Handle::Frame(id)) => {
                if let Err(e) = self.window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {e:?}");
                }
            }
            Some(Handle::Interval(id)) => self.window.clear_interval_with_handle(id),
            None => {}
        }
    }
}

impl Drop for WebScheduler {
    fn drop(&mut self) {
        self.cancel();
        // Break the frame closure's reference to itself
        self.frame.borrow_mut().take();
    }
}
