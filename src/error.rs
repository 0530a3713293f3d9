//! Error types for world construction and population.

use thiserror::Error;

use crate::config::MeshingMode;

/// A rejected world configuration.
///
/// Raised once at construction. The world is never built from a configuration
/// that fails validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A size parameter was zero or negative.
    #[error("world dimension `{name}` must be positive, got {value}")]
    NonPositiveDimension {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// The world is too large to address with `i32` coordinates or to allocate.
    #[error("world is too large to address: `{name}` overflows the voxel extent")]
    TooLarge {
        /// The parameter whose product overflowed.
        name: &'static str,
    },

    /// The voxel edge length was zero, negative or not finite.
    #[error("voxel size must be a positive finite number, got {0}")]
    NonPositiveVoxelSize(f32),

    /// `worker_threads` was explicitly set to zero.
    #[error("worker thread count must be at least 1")]
    ZeroWorkers,

    /// The configuration file could not be parsed.
    #[error("failed to parse world configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read world configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed parallel population run.
///
/// When population fails the storage that was being written is reset to its
/// empty state before the error is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PopulateError {
    /// The caller-supplied function panicked while sampling a voxel.
    #[error("generation callback panicked at ({x}, {y}, {z}): {message}")]
    Callback {
        /// World X of the failing sample.
        x: i32,
        /// World Y of the failing sample.
        y: i32,
        /// World Z of the failing sample.
        z: i32,
        /// The panic payload, when it was a string.
        message: String,
    },

    /// The requested storage does not exist in this world's mode.
    #[error("operation requires a {expected:?} world, but this world is {actual:?}")]
    ModeMismatch {
        /// Mode the operation needs.
        expected: MeshingMode,
        /// Mode the world was built with.
        actual: MeshingMode,
    },

    /// A worker thread terminated without reporting its units.
    #[error("a population worker exited before finishing its work units")]
    WorkerLost,
}

/// Any failure of the build-populate-mesh pipeline.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The world could not be constructed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The world could not be populated.
    #[error(transparent)]
    Populate(#[from] PopulateError),
}
