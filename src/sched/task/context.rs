//! Contexto salvo do processo
//!
//! Marcador de posição: o núcleo não faz a troca de registradores. O
//! código de arquitetura do kernel hospedeiro preenche e consome estes
//! campos na troca de contexto.

/// Contexto de CPU salvo
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedContext {
    /// Callee-saved registers
    pub registers: [u64; 6],

    /// Stack pointer (offset do topo da stack na arena do heap)
    pub stack_top: u64,

    /// Instruction pointer (ponto de entrada na primeira execução)
    pub entry: u64,
}

impl SavedContext {
    /// Cria contexto zerado
    pub const fn new() -> Self {
        Self {
            registers: [0; 6],
            stack_top: 0,
            entry: 0,
        }
    }

    /// Configura para iniciar em `entry` com a stack terminando em `stack_top`
    pub fn new_for_entry(entry: u64, stack_top: u64) -> Self {
        Self {
            stack_top,
            entry,
            ..Self::new()
        }
    }
}

impl Default for SavedContext {
    fn default() -> Self {
        Self::new()
    }
}
