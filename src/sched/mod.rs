//! # Scheduler Subsystem
//!
//! Processos e escalonamento:
//! - `task`: PCB, estados, handles índice + geração, tabela de processos
//! - `core`: filas de prontos por prioridade, fila de espera, seleção por tick
//! - `config`: níveis, quantum, tamanho de stack, capacidade da tabela
//!
//! Dirigido por uma fonte de ticks externa; usa o heap apenas para stacks.

pub mod config;
pub mod core;
pub mod error;
pub mod task;

#[cfg(feature = "self_test")]
pub mod test;

pub use self::config::SchedConfig;
pub use self::core::{SchedStats, Scheduler};
pub use self::error::{SchedError, SchedResult};
pub use self::task::{Pcb, Pid, ProcessEntry, ProcessHandle, ProcessState, ProcessTable};
