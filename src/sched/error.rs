//! Tipos de Erro do Scheduler e da Tabela de Processos

use crate::mm::MmError;

/// Erros do subsistema de processos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    /// Nenhum slot livre na tabela de processos
    TableFull,
    /// Handle desconhecido, de slot vazio ou de geração antiga
    InvalidHandle,
    /// Operação sobre um processo já terminado
    AlreadyTerminated,
    /// Falha ao obter a stack do processo no heap
    StackAllocation(MmError),
    /// Heap recusou devolver a stack; o processo continua com ela
    StackRelease(MmError),
}

impl SchedError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TableFull => "Tabela de processos cheia",
            Self::InvalidHandle => "Handle de processo inválido",
            Self::AlreadyTerminated => "Processo já terminado",
            Self::StackAllocation(e) | Self::StackRelease(e) => e.as_str(),
        }
    }
}

impl core::fmt::Display for SchedError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StackAllocation(e) => write!(f, "Falha ao alocar stack: {}", e),
            Self::StackRelease(e) => write!(f, "Falha ao devolver stack: {}", e),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl From<MmError> for SchedError {
    fn from(e: MmError) -> Self {
        Self::StackAllocation(e)
    }
}

/// Tipo Result específico para operações de processos
pub type SchedResult<T> = Result<T, SchedError>;
