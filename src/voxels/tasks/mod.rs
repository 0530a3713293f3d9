//! # Voxel Task System
//!
//! Parallel population of chunk grids.
//!
//! The grid is split into disjoint [`WorkUnit`]s (one per chunk, or one per
//! voxel column), each becomes a [`ColumnGenerationTask`], and the batch runs
//! on a [`WorkerPool`]. No two tasks ever touch the same memory, so no locks
//! are needed; the only cross-worker value, the active count, is accumulated
//! per unit and merged after every worker has been joined.
//!
//! ## Failure Semantics
//!
//! A panic in the sampling function fails its unit with a coordinate-tagged
//! [`PopulateError::Callback`]. Units with a higher index than the lowest
//! failing unit are skipped, every worker is joined, and the error of the
//! lowest failing unit is returned. The result does not depend on the worker
//! count. Resetting the partially written storage is the caller's job.

pub mod column_generation_task;

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, info};
use web_time::Instant;

pub use column_generation_task::{ColumnGenerationTask, UnitOutcome, WorkUnit};

use crate::config::WorkUnitKind;
use crate::error::PopulateError;
use crate::task_management::WorkerPool;

use super::chunk_store::ChunkGrid;

/// Summary of a successful population run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationReport {
    /// Work units processed.
    pub units: usize,
    /// Samples written. Equals the grid capacity.
    pub visited: usize,
    /// Net change in active samples.
    pub active_delta: i64,
    /// Wall-clock duration of the run.
    pub elapsed_ms: f64,
}

/// Drives a sampling function over a whole chunk grid on a worker pool.
#[derive(Debug, Clone, Copy)]
pub struct ParallelPopulator {
    pool: WorkerPool,
    work_unit: WorkUnitKind,
}

impl ParallelPopulator {
    /// Creates a populator.
    pub fn new(pool: WorkerPool, work_unit: WorkUnitKind) -> Self {
        ParallelPopulator { pool, work_unit }
    }

    /// The pool population runs on.
    pub fn pool(&self) -> WorkerPool {
        self.pool
    }

    /// The work-unit granularity.
    pub fn work_unit(&self) -> WorkUnitKind {
        self.work_unit
    }

    /// Calls `sample` exactly once for every coordinate of `grid` and stores
    /// the results.
    ///
    /// `sample` may be called from several threads at once and in any order.
    ///
    /// # Errors
    /// [`PopulateError::Callback`] for the lowest-indexed unit whose sampling
    /// panicked, [`PopulateError::WorkerLost`] if a worker died outside the
    /// callback. On error the grid is left partially written.
    pub fn populate<T, F>(
        &self,
        grid: &mut ChunkGrid<T>,
        sample: &F,
        is_active: fn(&T) -> bool,
    ) -> Result<PopulationReport, PopulateError>
    where
        T: Copy + Send,
        F: Fn(i32, i32, i32) -> T + Sync,
    {
        let start = Instant::now();
        let first_failed_unit = AtomicUsize::new(usize::MAX);

        let units = split_work_units(grid, self.work_unit);
        let num_units = units.len();
        let tasks: Vec<_> = units
            .into_iter()
            .enumerate()
            .map(|(index, unit)| {
                ColumnGenerationTask::new(unit, index, sample, is_active, &first_failed_unit)
            })
            .collect();

        debug!(
            "Populating {} {:?} units on {} workers",
            num_units,
            self.work_unit,
            self.pool.num_workers()
        );
        let outcomes = self.pool.run(tasks);

        let mut visited = 0;
        let mut active_delta = 0i64;
        let mut first_error: Option<PopulateError> = None;
        let mut lost = false;

        // Outcomes are in unit order, so the first failure seen is the lowest.
        for outcome in outcomes {
            match outcome {
                Some(UnitOutcome::Completed {
                    visited: unit_visited,
                    active_delta: unit_delta,
                }) => {
                    visited += unit_visited;
                    active_delta += unit_delta;
                }
                Some(UnitOutcome::Failed(error)) => {
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
                Some(UnitOutcome::Skipped) => {}
                None => lost = true,
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }
        if lost {
            return Err(PopulateError::WorkerLost);
        }
        debug_assert_eq!(
            first_failed_unit.load(Ordering::Acquire),
            usize::MAX,
            "failed unit without a failure outcome"
        );

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            "Populated {} samples in {} units in {:.2} ms",
            visited, num_units, elapsed_ms
        );

        Ok(PopulationReport {
            units: num_units,
            visited,
            active_delta,
            elapsed_ms,
        })
    }
}

/// Splits a grid into disjoint work units.
///
/// Chunk units hand out each chunk's whole buffer; column units split every
/// chunk buffer into its contiguous full-height columns.
pub fn split_work_units<T: Copy>(grid: &mut ChunkGrid<T>, kind: WorkUnitKind) -> Vec<WorkUnit<'_, T>> {
    let dimensions = grid.dimensions();
    let chunk_size = dimensions.chunk_size;
    let height = dimensions.max_height;

    let mut units = Vec::with_capacity(match kind {
        WorkUnitKind::Chunk => dimensions.chunk_count(),
        WorkUnitKind::Column => dimensions.chunk_count() * chunk_size * chunk_size,
    });

    for chunk in grid.chunks_mut() {
        let (origin_x, origin_z) = chunk.origin();
        match kind {
            WorkUnitKind::Chunk => units.push(WorkUnit {
                origin_x,
                origin_z,
                width_x: chunk_size,
                width_z: chunk_size,
                height,
                data: chunk.data_mut(),
            }),
            WorkUnitKind::Column => {
                for (column_index, column) in chunk.data_mut().chunks_mut(height).enumerate() {
                    units.push(WorkUnit {
                        origin_x: origin_x + column_index % chunk_size,
                        origin_z: origin_z + column_index / chunk_size,
                        width_x: 1,
                        width_z: 1,
                        height,
                        data: column,
                    });
                }
            }
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldDimensions;

    fn dimensions() -> WorldDimensions {
        WorldDimensions {
            chunk_size: 3,
            world_size_x: 2,
            world_size_z: 2,
            max_height: 4,
        }
    }

    fn is_positive(value: &i32) -> bool {
        *value > 0
    }

    #[test]
    fn test_split_covers_grid_exactly_once() {
        for kind in [WorkUnitKind::Chunk, WorkUnitKind::Column] {
            let mut grid = ChunkGrid::new(dimensions(), 0i32);
            let units = split_work_units(&mut grid, kind);
            let mut seen = std::collections::HashSet::new();
            for unit in &units {
                for local_z in 0..unit.width_z {
                    for local_x in 0..unit.width_x {
                        assert!(seen.insert((unit.origin_x + local_x, unit.origin_z + local_z)));
                    }
                }
                assert_eq!(unit.data.len(), unit.width_x * unit.width_z * unit.height);
            }
            assert_eq!(seen.len(), 36);
        }
    }

    #[test]
    fn test_populate_writes_every_coordinate() {
        let sample = |x: i32, y: i32, z: i32| x * 100 + y * 10 + z;
        for kind in [WorkUnitKind::Chunk, WorkUnitKind::Column] {
            let mut grid = ChunkGrid::new(dimensions(), -1i32);
            let populator = ParallelPopulator::new(WorkerPool::new(3), kind);
            let report = populator.populate(&mut grid, &sample, is_positive).unwrap();

            assert_eq!(report.visited, grid.capacity());
            // Only (0, 0, 0) maps to a non-positive value.
            assert_eq!(report.active_delta, grid.capacity() as i64 - 1);
            for z in 0..6 {
                for y in 0..4 {
                    for x in 0..6 {
                        assert_eq!(grid.get(x, y, z), Some(sample(x, y, z)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_lowest_failing_unit_wins_for_any_worker_count() {
        let sample = |x: i32, y: i32, z: i32| -> i32 {
            if y == 2 && (x + z) % 2 == 1 {
                panic!("odd column");
            }
            1
        };
        for workers in [1, 2, 8] {
            let mut grid = ChunkGrid::new(dimensions(), 0i32);
            let populator = ParallelPopulator::new(WorkerPool::new(workers), WorkUnitKind::Column);
            let error = populator.populate(&mut grid, &sample, is_positive).unwrap_err();
            // Column unit 1 of chunk 0 is world (1, 0): the first odd column.
            assert_eq!(
                error,
                PopulateError::Callback {
                    x: 1,
                    y: 2,
                    z: 0,
                    message: "odd column".to_string()
                }
            );
        }
    }
}
