//! # Task System Core Trait
//!
//! A `Task` is a self-contained unit of work executed on a pool worker.
//!
//! ## Task Lifecycle
//! 1. Tasks are handed to [`WorkerPool::run`](super::WorkerPool::run)
//! 2. The pool distributes them round-robin onto its worker channels
//! 3. Each worker calls [`Task::process`] on the tasks it receives, one at a time
//! 4. Outputs travel back to the calling thread tagged with the task's index
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - `Task::Output` must be `Send` to be transferred back
//! - Tasks may borrow from the caller's stack: the pool uses scoped threads

/// A unit of work that runs to completion on a worker thread.
///
/// # Implementation Guidelines
/// - Should own (or exclusively borrow) everything it writes
/// - Should be coarse enough to amortize channel overhead
/// - Must not block on other tasks of the same run
pub trait Task: Send {
    /// What the task reports back to the caller.
    type Output: Send;

    /// Processes the task and returns its output.
    ///
    /// Runs on a worker thread. There are no suspension points: the task runs
    /// synchronously until it returns.
    fn process(self) -> Self::Output;
}
