#![warn(missing_docs)]

//! # bubbletea-countdown
//!
//! A live countdown component for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications. Give it a scheduled epoch timestamp and it shows how long
//! remains, or how late it is, re-rendering every half second until canceled.
//!
//! ## Overview
//!
//! The component follows the Elm Architecture pattern. [`countdown::Model::activate`]
//! renders once and returns the first tick command, `update()` consumes tick
//! messages and schedules the next one, and `view()` renders the title,
//! countdown and schedule lines.
//!
//! - [`clock`]: injectable time sources, including a manual clock for tests
//! - [`format`]: phase selection and pluggable text templates
//! - [`config`]: TOML configuration
//! - [`countdown`]: the presenter itself
//!
//! ```rust
//! use bubbletea_countdown::prelude::*;
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new(1_700_000_000));
//! let mut countdown = Countdown::new().with_clock(clock.clone());
//!
//! countdown.activate(1_699_999_970, |_| {});
//! assert_eq!(countdown.title(), "Late by");
//! assert_eq!(countdown.text(), "+00:30");
//! ```

pub mod clock;
pub mod config;
pub mod countdown;
pub mod error;
pub mod format;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use countdown::{
    CancelHandle, Model as Countdown, TickMsg as CountdownTickMsg, DEFAULT_TICK_INTERVAL,
};
pub use error::{Error, Result};
pub use format::{format_remaining, schedule_subtitle, CountdownFormat, DefaultFormat, Phase};

/// Commonly used items, for glob import.
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::Config;
    pub use crate::countdown::{CancelHandle, Model as Countdown, TickMsg as CountdownTickMsg};
    pub use crate::format::{CountdownFormat, DefaultFormat, Phase};
}
