//! # Column Generation Task
//!
//! The population work unit: a disjoint `&mut` slice of one or more full-height
//! voxel columns, plus the caller's sampling function. Each task writes only
//! its own slice, so tasks run in parallel without locks.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::PopulateError;
use crate::task_management::task::Task;

/// A disjoint, full-height region of a chunk grid.
///
/// The slice is laid out like a chunk: `y + height * (local_x + width_x * local_z)`.
pub struct WorkUnit<'a, T> {
    /// World X of the region's first column.
    pub origin_x: usize,
    /// World Z of the region's first column.
    pub origin_z: usize,
    /// Columns along X.
    pub width_x: usize,
    /// Columns along Z.
    pub width_z: usize,
    /// Column height.
    pub height: usize,
    /// The region's values.
    pub data: &'a mut [T],
}

/// What a finished unit reports back to the populator.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome {
    /// Every sample of the unit was written.
    Completed {
        /// Samples written.
        visited: usize,
        /// Net change in active samples (see [`ColumnGenerationTask`]).
        active_delta: i64,
    },
    /// The sampling function panicked. Samples written before the panic stay
    /// in place until the populator resets the storage.
    Failed(PopulateError),
    /// Not processed because a lower-indexed unit already failed.
    Skipped,
}

/// Fills one [`WorkUnit`] by calling `sample` once per voxel.
///
/// `is_active` classifies values for the running count: the task reports how
/// many samples flipped from inactive to active minus the reverse.
pub struct ColumnGenerationTask<'a, T, F> {
    unit: WorkUnit<'a, T>,
    unit_index: usize,
    sample: &'a F,
    is_active: fn(&T) -> bool,
    first_failed_unit: &'a AtomicUsize,
}

impl<'a, T, F> ColumnGenerationTask<'a, T, F>
where
    T: Copy + Send,
    F: Fn(i32, i32, i32) -> T + Sync,
{
    /// Creates a task for `unit`.
    ///
    /// # Arguments
    /// * `unit` - The region this task owns
    /// * `unit_index` - Position of the unit in the run, used to order failures
    /// * `sample` - The caller's pure sampling function
    /// * `is_active` - Classifies stored values for the active count
    /// * `first_failed_unit` - Shared lowest failing unit index, `usize::MAX` if none
    pub fn new(
        unit: WorkUnit<'a, T>,
        unit_index: usize,
        sample: &'a F,
        is_active: fn(&T) -> bool,
        first_failed_unit: &'a AtomicUsize,
    ) -> Self {
        ColumnGenerationTask {
            unit,
            unit_index,
            sample,
            is_active,
            first_failed_unit,
        }
    }
}

impl<'a, T, F> Task for ColumnGenerationTask<'a, T, F>
where
    T: Copy + Send,
    F: Fn(i32, i32, i32) -> T + Sync,
{
    type Output = UnitOutcome;

    fn process(self) -> UnitOutcome {
        // A lower-indexed unit has already failed; its error wins regardless.
        if self.first_failed_unit.load(Ordering::Acquire) < self.unit_index {
            return UnitOutcome::Skipped;
        }

        let WorkUnit {
            origin_x,
            origin_z,
            width_x,
            width_z,
            height,
            data,
        } = self.unit;

        let mut visited = 0;
        let mut active_delta = 0i64;

        for local_z in 0..width_z {
            for local_x in 0..width_x {
                let column = &mut data[height * (local_x + width_x * local_z)..][..height];
                let x = (origin_x + local_x) as i32;
                let z = (origin_z + local_z) as i32;

                for (y, slot) in column.iter_mut().enumerate() {
                    let y = y as i32;
                    let value = match catch_unwind(AssertUnwindSafe(|| (self.sample)(x, y, z))) {
                        Ok(value) => value,
                        Err(payload) => {
                            self.first_failed_unit
                                .fetch_min(self.unit_index, Ordering::AcqRel);
                            return UnitOutcome::Failed(PopulateError::Callback {
                                x,
                                y,
                                z,
                                message: panic_message(payload.as_ref()),
                            });
                        }
                    };

                    match ((self.is_active)(slot), (self.is_active)(&value)) {
                        (false, true) => active_delta += 1,
                        (true, false) => active_delta -= 1,
                        _ => {}
                    }
                    *slot = value;
                    visited += 1;
                }
            }
        }

        UnitOutcome::Completed {
            visited,
            active_delta,
        }
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
