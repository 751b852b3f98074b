use crate::foundation::error::{StitchlineError, StitchlineResult};

/// Stitches per row (grid columns).
pub const STITCHES_PER_ROW: u32 = 55;

/// Rows in a finished scarf (grid rows).
pub const TOTAL_ROWS: u32 = 150;

/// Why a row-count input was rejected. Rejection never mutates state.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowRejection {
    #[error("row count must be a whole number")]
    NotAnInteger,

    #[error("row count must not be negative")]
    Negative,

    #[error("row count must be at most {TOTAL_ROWS}")]
    AboveTotal,
}

/// Validate a raw row-count input string.
pub fn parse_row_input(raw: &str) -> Result<u32, RowRejection> {
    let value: i64 = raw.trim().parse().map_err(|_| RowRejection::NotAnInteger)?;
    if value < 0 {
        return Err(RowRejection::Negative);
    }
    if value > i64::from(TOTAL_ROWS) {
        return Err(RowRejection::AboveTotal);
    }
    Ok(value as u32)
}

/// Derived display stats for the current progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProgressStats {
    pub rows_completed: u32,
    pub total_stitches: u32,
    pub percent: u32,
}

/// The one piece of persistent state: completed rows, `0..=TOTAL_ROWS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Progress {
    current_rows: u32,
}

impl Progress {
    pub fn new(rows: u32) -> StitchlineResult<Self> {
        if rows > TOTAL_ROWS {
            return Err(StitchlineError::validation(format!(
                "rows must be <= {TOTAL_ROWS}, got {rows}"
            )));
        }
        Ok(Self { current_rows: rows })
    }

    /// Restore from a stored value. Out-of-range stored rows clamp to the
    /// total rather than failing, matching the store's soft-failure policy.
    pub fn from_stored(rows: u32) -> Self {
        Self {
            current_rows: rows.min(TOTAL_ROWS),
        }
    }

    pub fn current_rows(self) -> u32 {
        self.current_rows
    }

    pub fn is_complete(self) -> bool {
        self.current_rows == TOTAL_ROWS
    }

    /// Set the row count. Returns whether this call crossed into completion,
    /// so the celebration fires once per crossing and not on every update
    /// while already complete.
    pub fn set_rows(&mut self, rows: u32) -> StitchlineResult<bool> {
        if rows > TOTAL_ROWS {
            return Err(StitchlineError::validation(format!(
                "rows must be <= {TOTAL_ROWS}, got {rows}"
            )));
        }
        let was_complete = self.is_complete();
        self.current_rows = rows;
        Ok(!was_complete && self.is_complete())
    }

    pub fn total_stitches(self) -> u32 {
        self.current_rows * STITCHES_PER_ROW
    }

    pub fn percent(self) -> u32 {
        ((f64::from(self.current_rows) / f64::from(TOTAL_ROWS)) * 100.0).round() as u32
    }

    pub fn stats(self) -> ProgressStats {
        ProgressStats {
            rows_completed: self.current_rows,
            total_stitches: self.total_stitches(),
            percent: self.percent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_rejections_are_named() {
        assert_eq!(parse_row_input("abc"), Err(RowRejection::NotAnInteger));
        assert_eq!(parse_row_input("12.5"), Err(RowRejection::NotAnInteger));
        assert_eq!(parse_row_input(""), Err(RowRejection::NotAnInteger));
        assert_eq!(parse_row_input("-1"), Err(RowRejection::Negative));
        assert_eq!(parse_row_input("151"), Err(RowRejection::AboveTotal));
    }

    #[test]
    fn input_accepts_full_range() {
        assert_eq!(parse_row_input("0"), Ok(0));
        assert_eq!(parse_row_input(" 75 "), Ok(75));
        assert_eq!(parse_row_input("150"), Ok(150));
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(Progress::new(75).unwrap().percent(), 50);
        // 1/150 is 0.67%; round, not floor.
        assert_eq!(Progress::new(1).unwrap().percent(), 1);
        assert_eq!(Progress::new(0).unwrap().percent(), 0);
        assert_eq!(Progress::new(150).unwrap().percent(), 100);
    }

    #[test]
    fn stitches_scale_by_row() {
        assert_eq!(Progress::new(10).unwrap().total_stitches(), 550);
        assert_eq!(Progress::new(0).unwrap().total_stitches(), 0);
    }

    #[test]
    fn completion_crossing_fires_once() {
        let mut p = Progress::new(149).unwrap();
        assert!(p.set_rows(150).unwrap());
        // Already complete: re-submitting the max is not a crossing.
        assert!(!p.set_rows(150).unwrap());
        // Drop below and cross again.
        assert!(!p.set_rows(10).unwrap());
        assert!(p.set_rows(150).unwrap());
    }

    #[test]
    fn out_of_range_rows_rejected_and_stored_values_clamp() {
        assert!(Progress::new(151).is_err());
        let mut p = Progress::new(5).unwrap();
        assert!(p.set_rows(151).is_err());
        assert_eq!(p.current_rows(), 5);

        assert_eq!(Progress::from_stored(9999).current_rows(), TOTAL_ROWS);
    }
}
