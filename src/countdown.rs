//! Live countdown presenter for Bubble Tea applications.
//!
//! The presenter shows how long remains until a scheduled epoch timestamp, or
//! how late it is once that time has passed. It re-renders itself on a fixed
//! tick (half a second by default) until it is canceled.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_countdown::countdown::Model;
//! use bubbletea_countdown::clock::ManualClock;
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new(1_700_000_000));
//! let mut countdown = Model::new().with_clock(clock.clone());
//!
//! // Renders immediately and returns the first tick command.
//! let cmd = countdown.activate(1_700_000_125, |text| println!("{}", text));
//! assert!(cmd.is_some());
//! assert_eq!(countdown.text(), "02:05");
//!
//! countdown.cancel();
//! assert!(!countdown.running());
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use bubbletea_countdown::countdown::Model as Countdown;
//!
//! struct App {
//!     countdown: Countdown,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut countdown = Countdown::new();
//!         let cmd = countdown.activate(1_900_000_000, |_| {});
//!         (Self { countdown }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.countdown.view()
//!     }
//! }
//! ```
//!
//! # Cancellation
//!
//! Every tick command carries the generation it was scheduled under.
//! [`Model::cancel`] bumps the generation, so a tick that was already queued
//! is rejected when it arrives and the callback never runs again. A
//! [`CancelHandle`] holds only a weak reference, which makes it safe to
//! capture inside the tick callback itself.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::format::{format_remaining, schedule_subtitle, CountdownFormat, DefaultFormat, Phase};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use chrono::{FixedOffset, Offset, Utc};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, trace};

/// Default time between re-renders.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

// Internal ID management for presenter instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Callback that receives the formatted countdown text on every render.
pub type OnTick = Box<dyn FnMut(&str) + Send>;

/// Message delivered by the presenter's tick command.
///
/// Ticks for another presenter, or ticks scheduled before the last
/// cancellation, are ignored by [`Model::update`].
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// The presenter that scheduled this tick.
    pub id: i64,
    tag: i64,
}

/// Shared run state. The presenter holds the only strong reference.
#[derive(Debug, Default)]
struct TickToken {
    generation: AtomicI64,
    running: AtomicBool,
}

impl TickToken {
    fn generation(&self) -> i64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns true if this call moved the token from running to idle.
    fn cancel(&self) -> bool {
        if self.running.swap(false, Ordering::SeqCst) {
            self.generation.fetch_add(1, Ordering::SeqCst);
            true
        } else {
            false
        }
    }
}

/// Non-owning handle that stops a presenter's ticks.
///
/// Obtained from [`Model::cancel_handle`]. Canceling through a handle whose
/// presenter has been dropped does nothing.
///
/// ```rust
/// use bubbletea_countdown::countdown::Model;
///
/// let mut countdown = Model::new();
/// let handle = countdown.cancel_handle();
///
/// // Stop after the first render.
/// countdown.activate(0, move |_| handle.cancel());
/// assert!(!countdown.running());
/// ```
#[derive(Debug, Clone)]
pub struct CancelHandle {
    id: i64,
    token: Weak<TickToken>,
}

impl CancelHandle {
    /// Stops the presenter if it is still alive and running.
    pub fn cancel(&self) {
        if let Some(token) = self.token.upgrade() {
            if token.cancel() {
                debug!(id = self.id, "countdown canceled through handle");
            }
        }
    }

    /// Returns false once the presenter has been dropped.
    pub fn is_alive(&self) -> bool {
        self.token.strong_count() > 0
    }
}

/// A countdown to a scheduled epoch timestamp.
///
/// The presenter is either idle or running. [`Model::activate`] starts it,
/// and [`Model::cancel`], a [`CancelHandle`], or dropping the model stops it.
/// Only one tick command is ever outstanding per running presenter.
pub struct Model {
    /// Time between re-renders.
    pub interval: Duration,
    /// Style of the "Starts in" / "Late by" heading.
    pub title_style: Style,
    /// Style of the countdown text.
    pub timer_style: Style,
    /// Style of the schedule description line.
    pub subtitle_style: Style,
    /// Whether `view()` includes the schedule description line.
    pub show_subtitle: bool,
    target: Option<i32>,
    phase: Phase,
    text: String,
    size: Option<(u16, u16)>,
    utc_offset: FixedOffset,
    clock: Arc<dyn Clock>,
    format: Arc<dyn CountdownFormat>,
    on_tick: Option<OnTick>,
    id: i64,
    token: Arc<TickToken>,
}

impl Model {
    /// Creates an idle presenter using the system clock and English text.
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_TICK_INTERVAL,
            title_style: Style::new().bold(true),
            timer_style: Style::new().bold(true),
            subtitle_style: Style::new(),
            show_subtitle: true,
            target: None,
            phase: Phase::Imminent,
            text: String::new(),
            size: None,
            utc_offset: Utc.fix(),
            clock: Arc::new(SystemClock),
            format: Arc::new(DefaultFormat),
            on_tick: None,
            id: next_id(),
            token: Arc::new(TickToken::default()),
        }
    }

    /// Creates a presenter from a validated [`Config`].
    pub fn from_config(config: &Config) -> Self {
        let mut m = Self::new();
        m.interval = config.tick_interval();
        m.utc_offset = config.utc_offset();
        m.show_subtitle = config.show_subtitle;
        m
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the text templates.
    pub fn with_format(mut self, format: Arc<dyn CountdownFormat>) -> Self {
        self.format = format;
        self
    }

    /// Sets the time between re-renders.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the offset used for the schedule subtitle.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Sets the heading style.
    pub fn with_title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }

    /// Sets the countdown text style.
    pub fn with_timer_style(mut self, style: Style) -> Self {
        self.timer_style = style;
        self
    }

    /// Sets the subtitle style.
    pub fn with_subtitle_style(mut self, style: Style) -> Self {
        self.subtitle_style = style;
        self
    }

    /// Returns the unique identifier of this presenter.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns whether a tick is currently scheduled.
    pub fn running(&self) -> bool {
        self.token.running()
    }

    /// The scheduled timestamp, if the presenter was ever activated.
    pub fn target(&self) -> Option<i32> {
        self.target
    }

    /// Phase as of the last render.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Countdown text as of the last render.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Heading for the current phase.
    pub fn title(&self) -> String {
        self.format.title(self.phase)
    }

    /// Describes the scheduled date relative to the current clock.
    pub fn subtitle(&self) -> String {
        match self.target {
            Some(target) => schedule_subtitle(i64::from(target), self.clock.now(), self.utc_offset),
            None => String::new(),
        }
    }

    /// Records the last known layout size. The width centers `view()` lines.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = Some((width, height));
    }

    /// The last recorded layout size.
    pub fn size(&self) -> Option<(u16, u16)> {
        self.size
    }

    /// Returns a weak handle that can stop this presenter from anywhere,
    /// including from inside the tick callback.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            id: self.id,
            token: Arc::downgrade(&self.token),
        }
    }

    /// Starts counting down to `target` and renders once right away.
    ///
    /// `on_tick` is called synchronously before this returns, then once per
    /// tick. If the presenter was idle, the first tick command is returned.
    /// If it was already running, the target and callback are replaced and
    /// `None` is returned, since the existing tick keeps going.
    pub fn activate<F>(&mut self, target: i32, on_tick: F) -> Option<Cmd>
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.target = Some(target);
        self.on_tick = Some(Box::new(on_tick));

        let was_running = self.token.running.swap(true, Ordering::SeqCst);
        let generation = self.token.generation();
        debug!(id = self.id, target, was_running, "countdown activated");

        self.render();

        // The callback may have canceled us.
        if was_running || self.token.generation() != generation {
            return None;
        }
        Some(self.tick())
    }

    /// Stops ticking. Queued ticks are rejected when they arrive.
    ///
    /// Calling this on an idle presenter does nothing.
    pub fn cancel(&mut self) {
        if self.token.cancel() {
            debug!(id = self.id, "countdown canceled");
        }
    }

    /// Handles tick and window size messages.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.set_size(size.width, size.height);
            return None;
        }

        if let Some(tick_msg) = msg.downcast_ref::<TickMsg>() {
            if tick_msg.id != self.id {
                return None;
            }

            let generation = self.token.generation();
            if !self.running() || tick_msg.tag != generation {
                debug!(id = self.id, tag = tick_msg.tag, generation, "stale countdown tick rejected");
                return None;
            }

            self.render();

            if self.token.generation() != generation {
                return None;
            }
            return Some(self.tick());
        }

        None
    }

    /// Renders the title, countdown and optional subtitle, centered to the
    /// last known width.
    pub fn view(&self) -> String {
        if self.target.is_none() {
            return String::new();
        }

        let mut lines = vec![
            self.title_style.render(&self.title()),
            self.timer_style.render(&self.text),
        ];
        if self.show_subtitle {
            lines.push(self.subtitle_style.render(&self.subtitle()));
        }

        match self.size {
            Some((width, _)) => lines
                .iter()
                .map(|line| center(line, width))
                .collect::<Vec<_>>()
                .join("\n"),
            None => lines.join("\n"),
        }
    }

    fn render(&mut self) {
        let Some(target) = self.target else {
            return;
        };

        let remaining = i64::from(target) - self.clock.now();
        let (phase, text) = format_remaining(self.format.as_ref(), remaining);
        trace!(id = self.id, remaining, ?phase, %text, "countdown rendered");
        self.phase = phase;
        self.text = text;

        if let Some(on_tick) = self.on_tick.as_mut() {
            on_tick(&self.text);
        }
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.token.generation();

        bubbletea_tick(self.interval, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    #[cfg(test)]
    fn tick_msg(&self) -> TickMsg {
        TickMsg {
            id: self.id,
            tag: self.token.generation(),
        }
    }
}

fn center(line: &str, width: u16) -> String {
    let pad = usize::from(width).saturating_sub(lipgloss::width_visible(line)) / 2;
    format!("{}{}", " ".repeat(pad), line)
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("interval", &self.interval)
            .field("target", &self.target)
            .field("phase", &self.phase)
            .field("text", &self.text)
            .field("size", &self.size)
            .field("running", &self.running())
            .finish_non_exhaustive()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (Model::new(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
