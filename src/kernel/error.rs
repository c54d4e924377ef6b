//! Erros do Kernel Core
//!
//! `KernelError` une os erros dos subsistemas. `ErrorKind` é a taxonomia
//! que o kernel hospedeiro usa para decidir o que fazer (ou apenas exibir
//! `as_str()` como texto de status).

use super::config::ConfigError;
use crate::mm::MmError;
use crate::sched::SchedError;
use core::fmt;

/// Categoria de um erro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ResourceExhausted,
    CorruptionDetected,
    InvalidArgument,
    DoubleFree,
    FreeOfUnallocated,
    TableFull,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceExhausted => "recurso esgotado",
            Self::CorruptionDetected => "corrupção detectada",
            Self::InvalidArgument => "argumento inválido",
            Self::DoubleFree => "double free",
            Self::FreeOfUnallocated => "free de memória não alocada",
            Self::TableFull => "tabela cheia",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    Mm(MmError),
    Sched(SchedError),
    Config(ConfigError),
}

impl KernelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Mm(e) => mm_kind(e),
            Self::Sched(SchedError::TableFull) => ErrorKind::TableFull,
            Self::Sched(SchedError::StackAllocation(e) | SchedError::StackRelease(e)) => {
                mm_kind(e)
            }
            Self::Sched(SchedError::InvalidHandle | SchedError::AlreadyTerminated) => {
                ErrorKind::InvalidArgument
            }
            Self::Config(_) => ErrorKind::InvalidArgument,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mm(e) => e.as_str(),
            Self::Sched(e) => e.as_str(),
            Self::Config(e) => e.as_str(),
        }
    }
}

fn mm_kind(e: &MmError) -> ErrorKind {
    match e {
        MmError::OutOfMemory => ErrorKind::ResourceExhausted,
        MmError::CorruptionDetected => ErrorKind::CorruptionDetected,
        MmError::DoubleFree => ErrorKind::DoubleFree,
        MmError::FreeOfUnallocated => ErrorKind::FreeOfUnallocated,
        MmError::InvalidSize | MmError::InvalidHandle => ErrorKind::InvalidArgument,
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mm(e) => write!(f, "(mm) {}", e),
            Self::Sched(e) => write!(f, "(sched) {}", e),
            Self::Config(e) => write!(f, "(config) {}", e),
        }
    }
}

impl From<MmError> for KernelError {
    fn from(e: MmError) -> Self {
        Self::Mm(e)
    }
}

impl From<SchedError> for KernelError {
    fn from(e: SchedError) -> Self {
        Self::Sched(e)
    }
}

impl From<ConfigError> for KernelError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Tipo Result do Kernel Core
pub type KResult<T> = Result<T, KernelError>;
