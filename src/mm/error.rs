//! Tipos de Erro do Subsistema de Memória
//!
//! Define erros estruturados para diagnóstico preciso de falhas no heap.
//! Todos são recuperáveis: o heap nunca entra em pânico.

/// Erros do subsistema de memória
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmError {
    /// Nenhum bloco livre serve e a arena atingiu o tamanho máximo
    OutOfMemory,
    /// Tamanho inválido (zero)
    InvalidSize,
    /// Guard token ou header de bloco corrompido
    CorruptionDetected,
    /// Double free detectado
    DoubleFree,
    /// Handle não corresponde a nenhum bloco da cadeia
    FreeOfUnallocated,
    /// Handle não aponta para um bloco em uso
    InvalidHandle,
}

impl MmError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfMemory => "OOM: arena esgotada",
            Self::InvalidSize => "Tamanho inválido",
            Self::CorruptionDetected => "Corrupção de heap detectada",
            Self::DoubleFree => "Double free detectado",
            Self::FreeOfUnallocated => "Free de memória não alocada",
            Self::InvalidHandle => "Handle de memória inválido",
        }
    }

    /// Erros que o heap apenas reporta (warning) e ignora.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::DoubleFree | Self::FreeOfUnallocated)
    }
}

impl core::fmt::Display for MmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tipo Result específico para operações de memória
pub type MmResult<T> = Result<T, MmError>;
