//! Núcleo do scheduler: filas de prontos, fila de espera, seleção.

pub mod runqueue;
pub mod scheduler;
pub mod sleep_queue;
pub mod stats;

pub use runqueue::{ReadyQueues, TaskList};
pub use scheduler::Scheduler;
pub use sleep_queue::SleepQueue;
pub use stats::SchedStats;
