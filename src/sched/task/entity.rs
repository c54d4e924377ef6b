//! Process Control Block (PCB)

use super::accounting::Accounting;
use super::context::SavedContext;
use super::handle::Pid;
use super::state::ProcessState;
use crate::mm::HeapHandle;

/// Ponto de entrada de um processo
pub type ProcessEntry = fn();

/// Fila em que o PCB está encadeado.
///
/// O processo em execução não está em fila nenhuma (`Detached`): ele ocupa
/// o slot `current` do scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueTag {
    Detached,
    Ready(u8),
    Waiting,
    Terminated,
}

/// Bloco de controle de processo
#[derive(Debug)]
pub struct Pcb {
    pub pid: Pid,
    pub name: &'static str,
    pub(crate) state: ProcessState,
    pub(crate) priority: u8,
    pub(crate) stack: Option<HeapHandle>,
    pub context: SavedContext,
    /// Definido apenas enquanto `Waiting`
    pub(crate) wake_deadline: Option<u64>,
    pub(crate) queue: QueueTag,
    /// Próximo slot na fila intrusiva
    pub(crate) next: Option<u16>,
    pub accounting: Accounting,
}

impl Pcb {
    pub(crate) fn new(
        pid: Pid,
        name: &'static str,
        priority: u8,
        entry: ProcessEntry,
        stack: HeapHandle,
        stack_size: usize,
    ) -> Self {
        let stack_top = (stack.offset() + stack_size) as u64;
        Self {
            pid,
            name,
            state: ProcessState::Ready,
            priority,
            stack: Some(stack),
            context: SavedContext::new_for_entry(entry as usize as u64, stack_top),
            wake_deadline: None,
            queue: QueueTag::Detached,
            next: None,
            accounting: Accounting::new(),
        }
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Stack no heap. `None` depois que o heap aceitou a devolução.
    pub fn stack(&self) -> Option<HeapHandle> {
        self.stack
    }

    pub fn wake_deadline(&self) -> Option<u64> {
        self.wake_deadline
    }

    pub fn queue(&self) -> QueueTag {
        self.queue
    }
}
