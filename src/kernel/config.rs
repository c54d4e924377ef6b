//! Configuração do Kernel Core
//!
//! Padrões vêm das constantes de `mm::config` e `sched::config`. O kernel
//! hospedeiro ajusta campos com struct-update e chama `validate()` (o
//! `KernelCore::new` valida de qualquer forma).

use crate::mm::config::{HeapConfig, HeapFlags};
use crate::sched::config::{SchedConfig, MAX_PRIORITY_LEVELS, MAX_PROCESSES_LIMIT};
use core::fmt;

/// Configuração completa do núcleo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KernelConfig {
    pub heap: HeapConfig,
    pub sched: SchedConfig,
}

/// Campo de configuração fora do intervalo aceito
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_processes` fora de 1..=1024
    ProcessLimit,
    /// `priority_levels` fora de 1..=32
    PriorityLevels,
    /// `quantum` zero
    Quantum,
    /// `stack_size` zero
    StackSize,
    /// Arena menor que um bloco mínimo ou maior que 4 GiB
    ArenaSize,
    /// Alinhamento não é potência de dois ou excede o header
    Alignment,
}

impl ConfigError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProcessLimit => "max_processes fora de 1..=1024",
            Self::PriorityLevels => "priority_levels fora de 1..=32",
            Self::Quantum => "quantum deve ser >= 1",
            Self::StackSize => "stack_size deve ser > 0",
            Self::ArenaSize => "arena_size fora do intervalo aceito",
            Self::Alignment => "alinhamento inválido",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl KernelConfig {
    pub const fn new() -> Self {
        Self {
            heap: HeapConfig::new(),
            sched: SchedConfig::new(),
        }
    }

    /// Padrões com outra arena (testes, kernels pequenos).
    pub const fn with_arena_size(arena_size: usize) -> Self {
        Self {
            heap: HeapConfig::with_arena_size(arena_size),
            sched: SchedConfig::new(),
        }
    }

    pub fn with_quantum(mut self, quantum: u64) -> Self {
        self.sched.quantum = quantum;
        self
    }

    pub fn with_heap_flags(mut self, flags: HeapFlags) -> Self {
        self.heap.flags = flags;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sched = &self.sched;
        if sched.max_processes == 0 || sched.max_processes > MAX_PROCESSES_LIMIT {
            return Err(ConfigError::ProcessLimit);
        }
        if sched.priority_levels == 0 || sched.priority_levels > MAX_PRIORITY_LEVELS {
            return Err(ConfigError::PriorityLevels);
        }
        if sched.quantum == 0 {
            return Err(ConfigError::Quantum);
        }
        if sched.stack_size == 0 {
            return Err(ConfigError::StackSize);
        }
        if !self.heap.alignment_is_valid() {
            return Err(ConfigError::Alignment);
        }
        if !self.heap.arena_size_is_valid() {
            return Err(ConfigError::ArenaSize);
        }
        Ok(())
    }
}
