//! Stitchline renders a knitting progress tracker ("knitted scarf") as pixels.
//!
//! The crate is a thin presentation layer over three small pieces:
//!
//! 1. **Progress**: a single validated row count (`0..=150`), persisted as one
//!    JSON record on disk and restored on load ([`ProgressStore`]).
//! 2. **Scene + render**: a pure repaint that maps the row/stitch grid to draw
//!    ops ([`build_scene`]) and rasterizes them on the CPU ([`CpuRenderer`]).
//! 3. **Timer**: an elapsed-time display since a fixed start date that eases
//!    from zero to the true value over 3 seconds, then ticks live
//!    ([`TimerAnimator`]).
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic repaint**: a scene is a pure function of the row count and
//!   canvas size; rendering it twice yields identical pixels.
//! - **Soft-failing storage**: a missing or corrupt progress record loads as
//!   zero rows and is never surfaced as an error.
//! - **No shared globals**: all mutable state lives in a [`Tracker`] instance
//!   and is passed explicitly to the renderer and animator.
#![forbid(unsafe_code)]

mod animation;
mod app;
mod foundation;
mod progress;
mod render;

pub use animation::ease::Ease;
pub use animation::timer::{
    Clock, ElapsedBreakdown, SystemClock, TIMER_ANIMATION_MS, TimerAnimator, TimerPhase,
    TimerSample, default_start_epoch_ms,
};
pub use app::controller::{SubmitOutcome, Tracker};
pub use foundation::core::{Canvas, GridSpec, Rgba8};
pub use foundation::error::{StitchlineError, StitchlineResult};
pub use progress::model::{
    Progress, ProgressStats, RowRejection, STITCHES_PER_ROW, TOTAL_ROWS, parse_row_input,
};
pub use progress::store::{ProgressRecord, ProgressStore, STORE_KEY};
pub use render::cpu::{CpuRenderer, FrameRgba, RenderSettings};
pub use render::scene::{DrawOp, ScarfScene, build_scene};
