use std::path::PathBuf;

use crate::foundation::core::{Canvas, GridSpec};
use crate::foundation::error::StitchlineResult;
use crate::progress::model::{
    Progress, ProgressStats, RowRejection, STITCHES_PER_ROW, TOTAL_ROWS, parse_row_input,
};
use crate::progress::store::ProgressStore;
use crate::render::scene::{ScarfScene, build_scene};

/// Result of submitting a row-count input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input failed validation; nothing changed and nothing was persisted.
    Rejected(RowRejection),
    /// Progress was updated and persisted. `celebrate` is set only when this
    /// submit crossed into a finished scarf.
    Updated {
        stats: ProgressStats,
        celebrate: bool,
    },
}

/// Owns the mutable tracker state and wires store, stats and repaint together.
///
/// All state lives here and is passed explicitly to the renderer and animator;
/// there are no module-level globals.
pub struct Tracker {
    progress: Progress,
    store: ProgressStore,
    grid: GridSpec,
}

impl Tracker {
    /// Open the tracker, restoring persisted progress from `data_dir` (missing
    /// or corrupt records restore as zero rows).
    pub fn open(data_dir: impl Into<PathBuf>) -> StitchlineResult<Self> {
        let grid = GridSpec::new(TOTAL_ROWS, STITCHES_PER_ROW)?;
        let store = ProgressStore::open(data_dir);
        let progress = Progress::from_stored(store.load());
        tracing::debug!(rows = progress.current_rows(), "tracker opened");
        Ok(Self {
            progress,
            store,
            grid,
        })
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn stats(&self) -> ProgressStats {
        self.progress.stats()
    }

    /// Timestamp of the last persisted update, if a record exists.
    pub fn last_updated(&self) -> Option<String> {
        self.store
            .try_load()
            .ok()
            .flatten()
            .map(|record| record.last_updated)
    }

    /// Validate and apply a raw row-count input: persist, update in-memory
    /// progress, and report recomputed stats. Invalid input is reported as a
    /// named rejection with no mutation. Persisting happens first so a failed
    /// save leaves the in-memory rows matching the stored record.
    pub fn submit(&mut self, raw: &str) -> StitchlineResult<SubmitOutcome> {
        let rows = match parse_row_input(raw) {
            Ok(rows) => rows,
            Err(rejection) => return Ok(SubmitOutcome::Rejected(rejection)),
        };
        self.store.save(rows)?;
        let celebrate = self.progress.set_rows(rows)?;
        Ok(SubmitOutcome::Updated {
            stats: self.progress.stats(),
            celebrate,
        })
    }

    /// Reset progress to zero. Without confirmation this is a no-op and both
    /// the in-memory state and the persisted record are untouched.
    pub fn reset(&mut self, confirmed: bool) -> StitchlineResult<bool> {
        if !confirmed {
            return Ok(false);
        }
        self.store.reset()?;
        self.progress.set_rows(0)?;
        Ok(true)
    }

    /// Canvas size for the configured grid in a container of the given width.
    pub fn canvas_for_container(&self, container_width: f64) -> Canvas {
        self.grid.canvas_for_container(container_width)
    }

    /// Build the repaint scene for the current progress.
    pub fn scene(&self, canvas: Canvas) -> StitchlineResult<ScarfScene> {
        build_scene(self.grid, canvas, self.progress.current_rows())
    }
}
