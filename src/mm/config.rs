//! # Configuração do Módulo de Memória
//!
//! Define constantes, flags e a configuração de runtime do heap.

use bitflags::bitflags;

// =============================================================================
// LAYOUT DO BLOCO
// =============================================================================

/// Tamanho do header gravado na arena antes de cada payload:
/// guard (u32) | tamanho (u32) | flags (u32) | reservado (u32)
pub const HEADER_SIZE: usize = 16;

/// Unidade de alinhamento padrão dos payloads
pub const HEAP_ALIGN: usize = 4;

/// Guard token válido de todo header
pub const GUARD_TOKEN: u32 = 0xDEAD_BEEF;

/// Byte usado para envenenar payloads liberados (flag POISON)
pub const POISON_BYTE: u8 = 0x6B;

// =============================================================================
// TAMANHOS DA ARENA
// =============================================================================

/// Tamanho máximo padrão da arena (4 MiB)
pub const DEFAULT_ARENA_SIZE: usize = 4 * 1024 * 1024;

/// Menor arena útil: um header e uma unidade de payload
pub const MIN_ARENA_SIZE: usize = HEADER_SIZE + HEAP_ALIGN;

/// Campos de tamanho do header são u32
pub const MAX_ARENA_SIZE: usize = u32::MAX as usize;

bitflags! {
    /// Comportamentos opcionais do heap.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HeapFlags: u32 {
        /// Zera o payload em toda alocação.
        const ZERO           = 1 << 0;
        /// Preenche payloads liberados com `POISON_BYTE`.
        const POISON         = 1 << 1;
        /// Caminha a cadeia inteira após cada free e reporta corrupção.
        const VERIFY_ON_FREE = 1 << 2;
    }
}

/// Configuração de runtime do heap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
    /// Tamanho máximo da arena em bytes (limite do high-water mark)
    pub arena_size: usize,
    /// Unidade de alinhamento (potência de dois, no máximo `HEADER_SIZE`)
    pub alignment: usize,
    pub flags: HeapFlags,
}

impl HeapConfig {
    pub const fn new() -> Self {
        Self {
            arena_size: DEFAULT_ARENA_SIZE,
            alignment: HEAP_ALIGN,
            flags: HeapFlags::empty(),
        }
    }

    /// Configuração padrão com outro tamanho de arena.
    pub const fn with_arena_size(arena_size: usize) -> Self {
        Self {
            arena_size,
            alignment: HEAP_ALIGN,
            flags: HeapFlags::empty(),
        }
    }

    /// Alinhamento válido: potência de dois que divide o header.
    pub const fn alignment_is_valid(&self) -> bool {
        self.alignment.is_power_of_two() && self.alignment <= HEADER_SIZE
    }

    pub const fn arena_size_is_valid(&self) -> bool {
        self.arena_size >= HEADER_SIZE + self.alignment && self.arena_size <= MAX_ARENA_SIZE
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new()
    }
}
