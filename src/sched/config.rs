//! Constantes de configuração do Scheduler

/// Número padrão de níveis de prioridade (0 = mais alta)
pub const PRIORITY_LEVELS: usize = 8;

/// Limite superior para `SchedConfig::priority_levels`
pub const MAX_PRIORITY_LEVELS: usize = 32;

/// Prioridade padrão de processos novos
pub const DEFAULT_PRIORITY: u8 = 1;

/// Quantum padrão (Timeslice) em ticks do timer
pub const DEFAULT_QUANTUM: u64 = 10;

/// Tamanho da stack de cada processo (em bytes)
pub const STACK_SIZE: usize = 4096;

/// Capacidade padrão da tabela de processos
pub const MAX_PROCESSES: usize = 64;

/// Limite superior para `SchedConfig::max_processes`
pub const MAX_PROCESSES_LIMIT: usize = 1024;

/// Configuração de runtime do scheduler e da tabela de processos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedConfig {
    pub max_processes: usize,
    pub priority_levels: usize,
    pub quantum: u64,
    pub stack_size: usize,
    pub default_priority: u8,
}

impl SchedConfig {
    pub const fn new() -> Self {
        Self {
            max_processes: MAX_PROCESSES,
            priority_levels: PRIORITY_LEVELS,
            quantum: DEFAULT_QUANTUM,
            stack_size: STACK_SIZE,
            default_priority: DEFAULT_PRIORITY,
        }
    }

    /// Menor prioridade (nível mais baixo) aceita.
    pub const fn lowest_priority(&self) -> u8 {
        if self.priority_levels == 0 {
            0
        } else {
            (self.priority_levels - 1) as u8
        }
    }

    /// Limita `priority` aos níveis configurados.
    pub const fn clamp_priority(&self, priority: u8) -> u8 {
        let lowest = self.lowest_priority();
        if priority > lowest {
            lowest
        } else {
            priority
        }
    }
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self::new()
    }
}
