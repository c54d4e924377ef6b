//! Estados de processo

/// Estado de um processo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Pronto para executar (em uma fila de prioridade)
    Ready,
    /// Executando (slot `current` do scheduler)
    Running,
    /// Dormindo até um deadline em ticks
    Waiting,
    /// Terminado. Estado absorvente
    Terminated,
}

impl ProcessState {
    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Terminated)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Waiting => "WAITING",
            Self::Terminated => "TERMINATED",
        }
    }
}
