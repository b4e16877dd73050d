use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tauri::async_runtime::JoinHandle;

use crate::{append_desktop_log, FADE_INTERVAL, FADE_STEP};

pub trait FadeTarget: Clone + Send + Sync + 'static {
    fn set_opacity(&self, opacity: f64);
    fn show(&self);
    fn hide(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeTick {
    Continue(f64),
    Finished(f64),
}

// Pure opacity ramp advanced once per timer tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeRamp {
    direction: FadeDirection,
    opacity: f64,
    step: f64,
}

impl FadeRamp {
    pub fn fade_in(step: f64) -> Self {
        Self {
            direction: FadeDirection::In,
            opacity: 0.0,
            step,
        }
    }

    pub fn fade_out(step: f64) -> Self {
        Self::fade_out_from(step, 1.0)
    }

    // An interrupted fade-in leaves the window partly transparent.
    pub fn fade_out_from(step: f64, opacity: f64) -> Self {
        Self {
            direction: FadeDirection::Out,
            opacity: opacity.clamp(0.0, 1.0),
            step,
        }
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    pub fn tick(&mut self) -> FadeTick {
        match self.direction {
            FadeDirection::In => {
                self.opacity += self.step;
                if self.opacity >= 1.0 {
                    self.opacity = 1.0;
                    return FadeTick::Finished(self.opacity);
                }
            }
            FadeDirection::Out => {
                self.opacity -= self.step;
                if self.opacity <= 0.0 {
                    self.opacity = 0.0;
                    return FadeTick::Finished(self.opacity);
                }
            }
        }
        FadeTick::Continue(self.opacity)
    }
}

// Runs at most one fade at a time; starting a fade aborts the running one.
pub struct FadeController {
    step: f64,
    interval: Duration,
    active: Mutex<Option<JoinHandle<()>>>,
    opacity: Arc<Mutex<f64>>,
}

impl Default for FadeController {
    fn default() -> Self {
        Self::new(FADE_STEP, FADE_INTERVAL)
    }
}

impl FadeController {
    pub fn new(step: f64, interval: Duration) -> Self {
        Self {
            step,
            interval,
            active: Mutex::new(None),
            opacity: Arc::new(Mutex::new(1.0)),
        }
    }

    fn current_opacity(&self) -> f64 {
        self.opacity.lock().map(|guard| *guard).unwrap_or(1.0)
    }

    fn cancel_active(&self) {
        match self.active.lock() {
            Ok(mut guard) => {
                if let Some(handle) = guard.take() {
                    handle.abort();
                }
            }
            Err(_) => append_desktop_log("fade controller lock poisoned; previous fade not cancelled"),
        }
    }

    pub fn fade_in<T, F>(&self, target: &T, animated: bool, on_done: F)
    where
        T: FadeTarget,
        F: FnOnce() + Send + 'static,
    {
        self.cancel_active();
        if !animated {
            if self.current_opacity() < 1.0 {
                apply_opacity(target, &self.opacity, 1.0);
            }
            target.show();
            on_done();
            return;
        }

        apply_opacity(target, &self.opacity, 0.0);
        target.show();
        self.start(target.clone(), FadeRamp::fade_in(self.step), on_done);
    }

    pub fn fade_out<T, F>(&self, target: &T, animated: bool, on_done: F)
    where
        T: FadeTarget,
        F: FnOnce() + Send + 'static,
    {
        self.cancel_active();
        if !animated {
            target.hide();
            on_done();
            return;
        }

        let ramp = FadeRamp::fade_out_from(self.step, self.current_opacity());
        self.start(target.clone(), ramp, on_done);
    }

    fn start<T, F>(&self, target: T, mut ramp: FadeRamp, on_done: F)
    where
        T: FadeTarget,
        F: FnOnce() + Send + 'static,
    {
        let interval = self.interval;
        let current = self.opacity.clone();
        let handle = tauri::async_runtime::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                match ramp.tick() {
                    FadeTick::Continue(opacity) => apply_opacity(&target, &current, opacity),
                    FadeTick::Finished(opacity) => {
                        apply_opacity(&target, &current, opacity);
                        if ramp.direction() == FadeDirection::Out {
                            target.hide();
                            apply_opacity(&target, &current, 1.0);
                        }
                        on_done();
                        return;
                    }
                }
            }
        });

        match self.active.lock() {
            Ok(mut guard) => *guard = Some(handle),
            Err(_) => append_desktop_log("fade controller lock poisoned; fade left untracked"),
        }
    }
}

fn apply_opacity<T: FadeTarget>(target: &T, current: &Mutex<f64>, opacity: f64) {
    target.set_opacity(opacity);
    if let Ok(mut guard) = current.lock() {
        *guard = opacity;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use super::FadeTarget;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum SurfaceCall {
        Opacity(f64),
        Show,
        Hide,
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct RecordingSurface {
        calls: Arc<Mutex<Vec<SurfaceCall>>>,
    }

    impl RecordingSurface {
        pub(crate) fn calls(&self) -> Vec<SurfaceCall> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn record(&self, call: SurfaceCall) {
            self.calls.lock().expect("calls lock").push(call);
        }
    }

    impl FadeTarget for RecordingSurface {
        fn set_opacity(&self, opacity: f64) {
            self.record(SurfaceCall::Opacity(opacity));
        }

        fn show(&self) {
            self.record(SurfaceCall::Show);
        }

        fn hide(&self) {
            self.record(SurfaceCall::Hide);
        }
    }
}
