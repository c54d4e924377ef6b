//! Contabilidade de Recursos (Accounting)
//!
//! Rastreia o consumo de CPU e as trocas de contexto de cada processo.

/// Estatísticas de uso de recursos de um processo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accounting {
    /// Ticks em que o processo foi o escolhido por `select_next`
    pub ticks_run: u64,

    /// Quantas vezes ganhou a CPU vindo da fila de prontos
    pub times_scheduled: u64,

    /// Trocas voluntárias (yield, sleep, término do próprio processo)
    pub voluntary_switches: u64,

    /// Trocas involuntárias (quantum expirado)
    pub preemptions: u64,

    /// Tick em que foi despachado pela última vez
    pub last_dispatch: u64,
}

impl Accounting {
    /// Cria uma nova estrutura de contabilidade zerada
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra o início da execução (chamado quando ganha a CPU)
    pub fn start_exec(&mut self, now: u64) {
        self.times_scheduled += 1;
        self.last_dispatch = now;
    }
}
