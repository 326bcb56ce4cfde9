use std::time::Instant;

use log::{debug, warn};

use crate::animation::{self, IntroConfig, WaveParams};
use crate::gpa;
use crate::semester::{SemesterRecord, clamp_sgpa, round_to_precision};

/// Host-supplied callback invoked with the fresh sequence after every
/// successful recomputation.
pub type ChangeListener = Box<dyn FnMut(&[SemesterRecord]) + Send>;

/// Tunables consumed by the controller. All have working defaults matching
/// the dashboard chart.
#[derive(Clone, Debug)]
pub struct ChartConfig {
    pub min_sgpa: f64,
    pub max_sgpa: f64,
    /// Rounding step applied to drag-produced values.
    pub precision: f64,
    /// Vertical drag sensitivity denominator: the chart's pixel height maps
    /// onto the full SGPA domain.
    pub chart_height_px: f64,
    pub intro: IntroConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            min_sgpa: 0.0,
            max_sgpa: 10.0,
            precision: 0.1,
            chart_height_px: 250.0,
            intro: IntroConfig::default(),
        }
    }
}

/// Current drag interaction, at most one active at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    NotDragging,
    /// Vertical drag on a chart point. The grabbed value and pointer height
    /// anchor the delta for every subsequent move sample.
    DraggingPoint {
        index: usize,
        start_y: f64,
        start_value: f64,
    },
    /// Horizontal drag on a bar; each sample maps the cursor fraction of the
    /// bar width straight to a value.
    DraggingBar { index: usize },
}

enum IntroState {
    Idle,
    Scheduled { starts_at: Instant },
    Playing { started_at: Instant, waves: Vec<WaveParams> },
}

/// Stateful session behind the interactive GPA chart.
///
/// Owns the working copy of the semester sequence exclusively. Pointer
/// samples and animation ticks are funneled through the pure recalculation
/// engine; each successful recomputation replaces the working sequence
/// wholesale and notifies the change listener. Time is always injected by
/// the caller, so the whole machine runs the same under tests and under a
/// live tick loop.
pub struct ChartController {
    config: ChartConfig,
    original: Vec<SemesterRecord>,
    working: Vec<SemesterRecord>,
    drag: DragState,
    intro: IntroState,
    listener: Option<ChangeListener>,
}

impl ChartController {
    pub fn new(records: Vec<SemesterRecord>, config: ChartConfig) -> Self {
        ChartController {
            config,
            working: records.clone(),
            original: records,
            drag: DragState::NotDragging,
            intro: IntroState::Idle,
            listener: None,
        }
    }

    pub fn on_data_change<F>(&mut self, listener: F)
    where
        F: FnMut(&[SemesterRecord]) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// The current (possibly edited or mid-animation) sequence.
    pub fn data(&self) -> &[SemesterRecord] {
        &self.working
    }

    /// The host-supplied sequence the intro animation settles back to.
    pub fn original_data(&self) -> &[SemesterRecord] {
        &self.original
    }

    pub fn snapshot(&self) -> Vec<SemesterRecord> {
        self.working.clone()
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_intro_playing(&self) -> bool {
        matches!(self.intro, IntroState::Playing { .. })
    }

    pub fn is_intro_scheduled(&self) -> bool {
        matches!(self.intro, IntroState::Scheduled { .. })
    }

    /// Arms the intro animation to begin after the configured delay,
    /// measured from `now`. Ticks drive it from there. Any drag in flight
    /// ends here so the animation stays the only source of offsets.
    pub fn schedule_intro(&mut self, now: Instant) {
        self.drag = DragState::NotDragging;
        self.intro = IntroState::Scheduled {
            starts_at: now + self.config.intro.delay,
        };
    }

    /// Drops any scheduled or running intro without touching the working
    /// sequence. Used on teardown and when user input takes over.
    pub fn cancel_intro(&mut self) {
        self.intro = IntroState::Idle;
    }

    /// Advances the intro animation to `now`. Returns true while the intro
    /// is still pending or playing; once it completes the working sequence
    /// is reset to the original data (not the last frame) and the listener
    /// is notified with exactly that.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.intro {
            IntroState::Idle => false,
            IntroState::Scheduled { starts_at } => {
                if now < *starts_at {
                    return true;
                }
                let waves = animation::generate_wave_parameters(
                    self.working.len(),
                    &self.config.intro.wave,
                    &mut rand::thread_rng(),
                );
                debug!("intro animation started over {} semesters", waves.len());
                self.intro = IntroState::Playing {
                    started_at: now,
                    waves,
                };
                self.advance_intro(now)
            }
            IntroState::Playing { .. } => self.advance_intro(now),
        }
    }

    fn advance_intro(&mut self, now: Instant) -> bool {
        let IntroState::Playing { started_at, waves } = &self.intro else {
            return false;
        };

        let duration = self.config.intro.duration;
        let progress = if duration.is_zero() {
            1.0
        } else {
            now.saturating_duration_since(*started_at).as_secs_f64() / duration.as_secs_f64()
        };

        if progress >= 1.0 {
            // settle on the real data, not the last animated frame
            self.intro = IntroState::Idle;
            self.working = self.original.clone();
            debug!("intro animation finished, original values restored");
            self.publish();
            false
        } else {
            let frame = animation::apply_wave_frame(
                &self.original,
                waves,
                progress,
                self.config.min_sgpa,
                self.config.max_sgpa,
                self.config.intro.ease_out_start,
            );
            self.working = frame;
            self.publish();
            true
        }
    }

    /// Begins a vertical point drag. Returns false (state untouched) while
    /// the intro is playing, while another drag is active, or for an index
    /// the chart does not have. A drag landing during the pre-intro delay
    /// cancels the pending intro instead of fighting it later.
    pub fn pointer_down(&mut self, index: usize, client_y: f64) -> bool {
        if self.is_intro_playing() {
            debug!("ignoring point drag during intro animation");
            return false;
        }
        if self.drag != DragState::NotDragging {
            return false;
        }
        let Some(grabbed) = self.working.get(index) else {
            warn!("point drag on unknown semester index {index}");
            return false;
        };
        let start_value = grabbed.sgpa;
        self.cancel_intro();
        self.drag = DragState::DraggingPoint {
            index,
            start_y: client_y,
            start_value,
        };
        true
    }

    /// One pointer-move sample of an active point drag. The vertical delta
    /// from the grab position converts to an SGPA delta via the chart height
    /// sensitivity, then the result is clamped, rounded to the configured
    /// precision and run through the recalculation engine.
    pub fn pointer_move(&mut self, client_y: f64) -> bool {
        let DragState::DraggingPoint {
            index,
            start_y,
            start_value,
        } = self.drag
        else {
            return false;
        };

        let sensitivity = (self.config.max_sgpa - self.config.min_sgpa) / self.config.chart_height_px;
        let delta_value = (start_y - client_y) * sensitivity;
        self.apply_edit(index, start_value + delta_value);
        true
    }

    /// Ends any active drag. Pointer-up and pointer-cancel both land here;
    /// drag state always resets no matter where the pointer is.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::NotDragging;
    }

    pub fn pointer_cancel(&mut self) {
        self.pointer_up();
    }

    /// Begins a horizontal bar drag and, unlike the point drag, already
    /// applies the value under the initial contact point.
    pub fn bar_pointer_down(&mut self, index: usize, client_x: f64, bar_width_px: f64) -> bool {
        if self.is_intro_playing() {
            debug!("ignoring bar drag during intro animation");
            return false;
        }
        if self.drag != DragState::NotDragging {
            return false;
        }
        if index >= self.working.len() || bar_width_px <= 0.0 {
            warn!("bar drag rejected for index {index}");
            return false;
        }
        self.cancel_intro();
        self.drag = DragState::DraggingBar { index };
        self.apply_bar_sample(index, client_x, bar_width_px);
        true
    }

    /// One pointer-move sample of an active bar drag.
    pub fn bar_pointer_move(&mut self, client_x: f64, bar_width_px: f64) -> bool {
        let DragState::DraggingBar { index } = self.drag else {
            return false;
        };
        if bar_width_px <= 0.0 {
            return false;
        }
        self.apply_bar_sample(index, client_x, bar_width_px);
        true
    }

    /// Direct what-if edit from the host (typed value rather than a drag).
    /// Same clamping, rounding and rejection rules as the drag paths.
    pub fn set_sgpa(&mut self, index: usize, value: f64) -> bool {
        if self.is_intro_playing() {
            return false;
        }
        if index >= self.working.len() {
            warn!("what-if edit on unknown semester index {index}");
            return false;
        }
        self.cancel_intro();
        self.apply_edit(index, value);
        true
    }

    /// Discards what-if edits and republishes the host-supplied data.
    pub fn reset_to_original(&mut self) {
        self.cancel_intro();
        self.drag = DragState::NotDragging;
        self.working = self.original.clone();
        self.publish();
    }

    fn apply_bar_sample(&mut self, index: usize, client_x: f64, bar_width_px: f64) {
        // the cursor's fraction of the bar maps straight onto the value
        let fraction = (client_x / bar_width_px).clamp(0.0, 1.0);
        self.apply_edit(index, fraction * self.config.max_sgpa);
    }

    fn apply_edit(&mut self, index: usize, raw_value: f64) {
        let clamped = clamp_sgpa(raw_value, self.config.min_sgpa, self.config.max_sgpa);
        let value = round_to_precision(clamped, self.config.precision);
        self.working = gpa::recalculate_cgpa(&self.working, index, value);
        self.publish();
    }

    fn publish(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.working);
        }
    }
}
