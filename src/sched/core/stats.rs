//! Estatísticas do Scheduler

/// Contadores globais do scheduler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedStats {
    /// Toda chamada de `select_next`
    pub total_switches: u64,
    /// Quantum expirado
    pub preemptive_switches: u64,
    /// O processo em execução cedeu a CPU (yield, sleep, terminate)
    pub voluntary_switches: u64,
    pub processes_created: u64,
    pub processes_terminated: u64,
    /// Chamadas de `select_next` sem nenhum processo pronto
    pub idle_ticks: u64,
}
