//! Forge Core.
//!
//! Núcleo de gerenciamento de recursos do Forge:
//! - `mm`: heap first-fit sobre uma arena linear, com split, coalescência
//!   e detecção de corrupção por guard token.
//! - `sched`: tabela de processos (handles índice + geração) e scheduler
//!   preemptivo com filas por prioridade, sleep por deadline e término.
//! - `kernel`: o contexto `KernelCore` que possui os três subsistemas,
//!   além de logging, fonte de ticks, configuração e erros.
//!
//! O crate é `no_std` + `alloc`. O kernel hospedeiro fornece o alocador
//! global, o sink de log (`log::Log`) e a fonte de ticks.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (Vec/Box para arena, blocos e slots)
extern crate alloc;

#[doc(hidden)]
pub use log as __log;

pub mod kernel; // Contexto, Logging, Tempo, Configuração, Erros
pub mod klib; // Utilitários Internos (Alinhamento, Self-Test)
pub mod mm; // Heap First-Fit
pub mod sched; // Processos e Scheduler

pub use kernel::{
    ErrorKind, Jiffies, KResult, KernelConfig, KernelCore, KernelError, LockedKernel, TickSource,
};
pub use mm::{Heap, HeapHandle, MmError};
pub use sched::{ProcessHandle, ProcessState, SchedError, SchedStats};
