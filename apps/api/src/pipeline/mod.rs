//! The asynchronous scoring pipeline: job queue, worker loop, result store,
//! and the batch completion protocol on top of them.
//!
//! The queue and store are process-wide singletons created at startup; the
//! worker pool drains the queue for the life of the process, independent of
//! any single batch.

pub mod coordinator;
pub mod job;
pub mod queue;
pub mod store;
pub mod worker;
