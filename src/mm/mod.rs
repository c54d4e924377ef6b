//! # Memory Management
//!
//! Heap first-fit sobre uma arena linear.
//!
//! - `config`: layout do header, guard token, tamanhos, `HeapConfig`/`HeapFlags`
//! - `heap`: o alocador (`allocate`, `free`, `reallocate`, `check_integrity`)
//! - `stats`: contadores de uso
//! - `error`: `MmError` / `MmResult`
//!
//! O heap não conhece o scheduler; a tabela de processos o usa para
//! obter stacks.

pub mod config;
pub mod error;
pub mod heap;
pub mod stats;

#[cfg(feature = "self_test")]
pub mod test;

pub use config::{HeapConfig, HeapFlags};
pub use error::{MmError, MmResult};
pub use heap::{Block, BlockFlags, Heap, HeapHandle, Provenance};
pub use stats::HeapStats;
