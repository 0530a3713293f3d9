//! # Task Management System
//!
//! A fixed-size pool of worker threads that drains a batch of independent
//! tasks and hands every output back to the caller.
//!
//! ## Architecture Overview
//! - `WorkerPool`: owns the worker count and runs batches
//! - `Task`: a unit of work executed on a worker
//! - `TaskChannel`: the per-worker queue tasks are published onto
//!
//! ## Task Lifecycle
//! 1. The caller builds a batch of tasks and calls `WorkerPool::run()`
//! 2. Workers are spawned as scoped threads, one channel each
//! 3. Tasks are published round-robin across the channels
//! 4. Each worker drains its channel and sends `(index, output)` back
//! 5. `run()` joins every worker before returning, so all writes made by the
//!    tasks happen-before the caller continues
//!
//! Because workers are scoped, tasks may hold `&mut` borrows of caller data.
//! Handing each task a disjoint borrow is what makes population lock-free.
//!
//! ## Example Usage
//! ```
//! use voxel_world::task_management::{task::Task, WorkerPool};
//!
//! struct Square(u64);
//!
//! impl Task for Square {
//!     type Output = u64;
//!     fn process(self) -> u64 {
//!         self.0 * self.0
//!     }
//! }
//!
//! let pool = WorkerPool::new(4);
//! let outputs = pool.run((0..10).map(Square).collect());
//! let squares: Vec<u64> = outputs.into_iter().map(Option::unwrap).collect();
//! assert_eq!(squares[9], 81);
//! ```

pub mod task;

use std::sync::mpsc::{channel, Sender};
use std::thread::{self, ScopedJoinHandle};

use log::{debug, warn};
use task::Task;

/// A communication channel between the publishing thread and one worker.
///
/// # Fields
/// - `task_sender`: Sends `(index, task)` pairs to the worker
/// - `num_tasks_published`: Number of tasks this worker was given
/// - `worker`: Handle used to join the worker at the end of the run
struct TaskChannel<'scope, T> {
    task_sender: Sender<(usize, T)>,
    num_tasks_published: usize,
    worker: ScopedJoinHandle<'scope, ()>,
}

/// A fixed-size pool of worker threads.
///
/// The pool itself holds no threads between runs; each [`run`](Self::run)
/// spawns its workers inside a thread scope and joins them before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    num_workers: usize,
}

impl WorkerPool {
    /// Creates a pool with the specified number of worker threads.
    ///
    /// A count of zero is raised to one.
    pub fn new(num_workers: usize) -> Self {
        WorkerPool {
            num_workers: num_workers.max(1),
        }
    }

    /// Creates a pool sized to the machine's available parallelism.
    pub fn with_available_parallelism() -> Self {
        let available = thread::available_parallelism();
        debug!("Available parallelism: {:?}", available);
        Self::new(available.map(|n| n.get()).unwrap_or(1))
    }

    /// Number of worker threads a run uses.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Runs every task on the pool and returns the outputs in task order.
    ///
    /// Blocks until all workers have been joined. An entry is `None` only if
    /// the worker processing that task died (the task itself panicked); all
    /// other workers still finish their queues.
    pub fn run<T>(&self, tasks: Vec<T>) -> Vec<Option<T::Output>>
    where
        T: Task,
    {
        let num_tasks = tasks.len();
        let mut outputs: Vec<Option<T::Output>> = (0..num_tasks).map(|_| None).collect();
        if num_tasks == 0 {
            return outputs;
        }

        let num_workers = self.num_workers.min(num_tasks);

        thread::scope(|scope| {
            let (result_tx, result_rx) = channel::<(usize, T::Output)>();
            let mut channels = Vec::with_capacity(num_workers);

            for _ in 0..num_workers {
                let (task_tx, task_rx) = channel::<(usize, T)>();
                let result_tx = result_tx.clone();

                let worker = scope.spawn(move || {
                    while let Ok((index, task)) = task_rx.recv() {
                        let output = task.process();
                        if result_tx.send((index, output)).is_err() {
                            break;
                        }
                    }
                });

                channels.push(TaskChannel {
                    task_sender: task_tx,
                    num_tasks_published: 0,
                    worker,
                });
            }
            drop(result_tx);

            // Round-robin publication
            let mut current_channel = 0;
            for (index, task) in tasks.into_iter().enumerate() {
                let channel = &mut channels[current_channel];
                if channel.task_sender.send((index, task)).is_ok() {
                    channel.num_tasks_published += 1;
                } else {
                    warn!("Worker {} disconnected before receiving task {}", current_channel, index);
                }
                current_channel = (current_channel + 1) % num_workers;
            }

            let mut lost_workers = 0;
            for (worker_index, channel) in channels.into_iter().enumerate() {
                let TaskChannel {
                    task_sender,
                    num_tasks_published,
                    worker,
                } = channel;
                // Closing the queue lets the worker's recv loop end.
                drop(task_sender);
                if worker.join().is_err() {
                    lost_workers += 1;
                    warn!(
                        "Worker {} panicked while processing its {} tasks",
                        worker_index, num_tasks_published
                    );
                }
            }
            if lost_workers > 0 {
                warn!("{} of {} workers were lost", lost_workers, num_workers);
            }

            for (index, output) in result_rx.try_iter() {
                outputs[index] = Some(output);
            }
        });

        outputs
    }
}
