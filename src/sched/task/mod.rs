//! Processos: PCB, estados, handles, tabela e ciclo de vida.

pub mod accounting;
pub mod context;
pub mod entity;
pub mod handle;
pub mod lifecycle;
pub mod state;
pub mod table;

pub use accounting::Accounting;
pub use context::SavedContext;
pub use entity::{Pcb, ProcessEntry, QueueTag};
pub use handle::{Pid, ProcessHandle};
pub use state::ProcessState;
pub use table::ProcessTable;
