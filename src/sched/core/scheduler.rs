//! # Orquestrador de Agendamento
//!
//! Coordena a transição entre estados de processos (Ready, Running, Waiting,
//! Terminated) e decide quem ocupa a CPU a cada tick.
//!
//! ## Mecanismos de Execução:
//! - **Prioridade estrita:** filas FIFO por nível; a varredura começa no 0.
//! - **Preemptivo:** `select_next` conta ticks do processo atual; ao atingir
//!   o quantum ele volta para o fim da sua fila.
//! - **Cooperativo:** `yield_current`, `sleep` e `terminate` do processo em
//!   execução contam como trocas voluntárias.
//!
//! ## Pertinência às filas
//! Cada PCB está em exatamente uma fila (`QueueTag`), exceto o processo em
//! execução, que ocupa o slot `current`. Toda transição passa por `detach`.
//!
//! O scheduler não possui a tabela de processos: cada operação recebe
//! `&mut ProcessTable` do `KernelCore`.

use super::runqueue::{ReadyQueues, TaskList};
use super::sleep_queue::SleepQueue;
use super::stats::SchedStats;
use crate::sched::config::SchedConfig;
use crate::sched::error::{SchedError, SchedResult};
use crate::sched::task::{ProcessHandle, ProcessState, ProcessTable, QueueTag};
use alloc::vec::Vec;

pub struct Scheduler {
    config: SchedConfig,
    ready: ReadyQueues,
    waiting: SleepQueue,
    terminated: TaskList,
    current: Option<ProcessHandle>,
    /// Ticks consumidos pelo processo atual nesta fatia
    slice: u64,
    stats: SchedStats,
}

impl Scheduler {
    pub fn new(config: SchedConfig) -> Self {
        crate::kdebug!(
            "(Sched) init: {} níveis, quantum={} ticks",
            config.priority_levels,
            config.quantum
        );
        Self {
            config,
            ready: ReadyQueues::new(config.priority_levels),
            waiting: SleepQueue::new(),
            terminated: TaskList::new(),
            current: None,
            slice: 0,
            stats: SchedStats::default(),
        }
    }

    /// Entrega um processo recém-criado ao scheduler.
    pub fn admit(&mut self, table: &mut ProcessTable, handle: ProcessHandle) -> SchedResult<()> {
        self.enqueue_ready(table, handle)?;
        self.stats.processes_created += 1;
        Ok(())
    }

    // =========================================================================
    // FILAS DE PRONTOS
    // =========================================================================

    /// Marca `Ready` e coloca no fim da fila da sua prioridade (limitada).
    pub fn enqueue_ready(
        &mut self,
        table: &mut ProcessTable,
        handle: ProcessHandle,
    ) -> SchedResult<()> {
        let index = self.resolve(table, handle, "enqueue_ready")?;
        let pcb = table.get(handle)?;
        if pcb.state.is_terminated() {
            crate::kwarn!("(Sched) enqueue_ready: pid={} já terminado", pcb.pid);
            return Err(SchedError::AlreadyTerminated);
        }
        let level = self.config.clamp_priority(pcb.priority);

        self.detach(table, index, handle);

        let pcb = table.get_mut(handle)?;
        pcb.state = ProcessState::Ready;
        pcb.priority = level;
        pcb.wake_deadline = None;
        self.ready.push(table, index, level);

        crate::ktrace!("(Sched) ready: {} nível {}", handle, level);
        Ok(())
    }

    /// Cabeça da primeira fila não vazia, varrendo a partir do nível 0.
    pub fn dequeue_ready(&mut self, table: &mut ProcessTable) -> Option<ProcessHandle> {
        let index = self.ready.pop_highest(table)?;
        table.handle_at(index)
    }

    // =========================================================================
    // SELEÇÃO (UMA VEZ POR TICK)
    // =========================================================================

    /// Decide quem executa neste tick.
    ///
    /// O processo atual continua enquanto sua fatia estiver abaixo do
    /// quantum. Ao atingi-lo, é preemptado para o fim da sua fila e o
    /// próximo pronto é despachado. `None` quando não há nada pronto.
    pub fn select_next(&mut self, table: &mut ProcessTable, now: u64) -> Option<ProcessHandle> {
        self.stats.total_switches += 1;

        if let Some(current) = self.current {
            self.slice += 1;
            if self.slice < self.config.quantum {
                if let Ok(pcb) = table.get_mut(current) {
                    pcb.accounting.ticks_run += 1;
                }
                return Some(current);
            }

            self.stats.preemptive_switches += 1;
            if let Ok(pcb) = table.get_mut(current) {
                pcb.accounting.preemptions += 1;
            }
            self.current = None;
            self.slice = 0;
            if let Err(e) = self.enqueue_ready(table, current) {
                crate::kerror!("(Sched) preempção de {} falhou: {}", current, e);
            }
            crate::ktrace!("(Sched) quantum expirado: {}", current);
        }

        match self.dequeue_ready(table) {
            Some(next) => {
                if let Ok(pcb) = table.get_mut(next) {
                    pcb.state = ProcessState::Running;
                    pcb.accounting.start_exec(now);
                    pcb.accounting.ticks_run += 1;
                }
                self.current = Some(next);
                self.slice = 0;
                crate::ktrace!("(Sched) dispatch: {} no tick {}", next, now);
                Some(next)
            }
            None => {
                self.stats.idle_ticks += 1;
                None
            }
        }
    }

    /// O processo em execução cede a CPU e vai para o fim da sua fila.
    pub fn yield_current(&mut self, table: &mut ProcessTable) -> Option<ProcessHandle> {
        let current = self.current?;
        self.count_voluntary(table, current);
        self.current = None;
        self.slice = 0;
        match self.enqueue_ready(table, current) {
            Ok(()) => Some(current),
            Err(e) => {
                crate::kerror!("(Sched) yield de {} falhou: {}", current, e);
                None
            }
        }
    }

    // =========================================================================
    // SLEEP / WAKE
    // =========================================================================

    /// Dorme por `ticks`: `Waiting` até `now + ticks`. Retorna o deadline.
    pub fn sleep(
        &mut self,
        table: &mut ProcessTable,
        handle: ProcessHandle,
        ticks: u64,
        now: u64,
    ) -> SchedResult<u64> {
        let index = self.resolve(table, handle, "sleep")?;
        if table.get(handle)?.state.is_terminated() {
            crate::kwarn!("(Sched) sleep: {} já terminado", handle);
            return Err(SchedError::AlreadyTerminated);
        }
        if self.current == Some(handle) {
            self.count_voluntary(table, handle);
        }

        self.detach(table, index, handle);

        let deadline = now.saturating_add(ticks);
        let pcb = table.get_mut(handle)?;
        pcb.state = ProcessState::Waiting;
        pcb.wake_deadline = Some(deadline);
        self.waiting.push(table, index);

        crate::ktrace!("(Sched) sleep: {} até o tick {}", handle, deadline);
        Ok(deadline)
    }

    /// Uma varredura da fila de espera: deadlines alcançados voltam a `Ready`.
    /// Retorna quantos acordaram.
    pub fn wake_waiting(&mut self, table: &mut ProcessTable, now: u64) -> usize {
        let expired = self.waiting.take_expired(table, now);
        for &index in &expired {
            if let Some(handle) = table.handle_at(index) {
                if let Err(e) = self.enqueue_ready(table, handle) {
                    crate::kerror!("(Sched) wake de {} falhou: {}", handle, e);
                }
            }
        }
        if !expired.is_empty() {
            crate::ktrace!("(Sched) wake: {} processos no tick {}", expired.len(), now);
        }
        expired.len()
    }

    // =========================================================================
    // TÉRMINO
    // =========================================================================

    /// Remove de toda fila e marca `Terminated`. Estado absorvente.
    pub fn terminate(&mut self, table: &mut ProcessTable, handle: ProcessHandle) -> SchedResult<()> {
        let index = self.resolve(table, handle, "terminate")?;
        if table.get(handle)?.state.is_terminated() {
            crate::kwarn!("(Sched) terminate: {} já terminado", handle);
            return Err(SchedError::AlreadyTerminated);
        }
        if self.current == Some(handle) {
            self.count_voluntary(table, handle);
        }

        self.detach(table, index, handle);

        let pcb = table.get_mut(handle)?;
        pcb.state = ProcessState::Terminated;
        pcb.wake_deadline = None;
        let pid = pcb.pid;
        self.terminated.push_back(table, index, QueueTag::Terminated);
        self.stats.processes_terminated += 1;

        crate::kdebug!("(Sched) terminate: pid={} ({})", pid, handle);
        Ok(())
    }

    /// Esvazia a fila de terminados (para o reaper).
    pub fn drain_terminated(&mut self, table: &mut ProcessTable) -> Vec<ProcessHandle> {
        let mut drained = Vec::with_capacity(self.terminated.len());
        while let Some(index) = self.terminated.pop_front(table) {
            if let Some(handle) = table.handle_at(index) {
                drained.push(handle);
            }
        }
        drained
    }

    /// Recoloca na fila de terminados um processo que o reaper não conseguiu
    /// recolher.
    pub(crate) fn requeue_terminated(&mut self, table: &mut ProcessTable, handle: ProcessHandle) {
        if let Ok(index) = table.resolve(handle) {
            self.terminated.push_back(table, index, QueueTag::Terminated);
        }
    }

    // =========================================================================
    // PRIORIDADE
    // =========================================================================

    /// Altera a prioridade (limitada). Um processo pronto vai para o fim da
    /// fila do novo nível. Retorna o nível efetivo.
    pub fn set_priority(
        &mut self,
        table: &mut ProcessTable,
        handle: ProcessHandle,
        priority: u8,
    ) -> SchedResult<u8> {
        let index = self.resolve(table, handle, "set_priority")?;
        let level = self.config.clamp_priority(priority);

        let pcb = table.get_mut(handle)?;
        if pcb.state.is_terminated() {
            return Err(SchedError::AlreadyTerminated);
        }
        pcb.priority = level;
        let tag = pcb.queue;

        if let QueueTag::Ready(old) = tag {
            if old != level {
                self.ready.remove(table, index, old);
                self.ready.push(table, index, level);
            }
        }
        Ok(level)
    }

    // =========================================================================
    // CONSULTAS
    // =========================================================================

    pub fn current(&self) -> Option<ProcessHandle> {
        self.current
    }

    pub fn stats(&self) -> SchedStats {
        self.stats
    }

    pub fn config(&self) -> &SchedConfig {
        &self.config
    }

    pub fn ready_len(&self, level: usize) -> usize {
        self.ready.level(level).map_or(0, TaskList::len)
    }

    pub fn ready_total(&self) -> usize {
        self.ready.len()
    }

    /// Handles prontos no nível `level`, na ordem da fila.
    pub fn ready_handles(&self, table: &ProcessTable, level: usize) -> Vec<ProcessHandle> {
        match self.ready.level(level) {
            Some(list) => list
                .iter(table)
                .filter_map(|index| table.handle_at(index))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn next_wake_deadline(&self, table: &ProcessTable) -> Option<u64> {
        self.waiting.next_deadline(table)
    }

    pub fn terminated_len(&self) -> usize {
        self.terminated.len()
    }

    pub fn dump_stats(&self) {
        let s = &self.stats;
        crate::kinfo!("(Sched) === Estatísticas ===");
        crate::kinfo!("(Sched) trocas totais:      {}", s.total_switches);
        crate::kinfo!("(Sched) trocas preemptivas: {}", s.preemptive_switches);
        crate::kinfo!("(Sched) trocas voluntárias: {}", s.voluntary_switches);
        crate::kinfo!("(Sched) criados={} terminados={}", s.processes_created, s.processes_terminated);
        crate::kinfo!("(Sched) ticks ociosos:      {}", s.idle_ticks);
        for level in 0..self.ready.level_count() {
            crate::kinfo!("(Sched) fila {}: {} prontos", level, self.ready_len(level));
        }
        crate::kinfo!(
            "(Sched) esperando={} terminados={}",
            self.waiting.len(),
            self.terminated.len()
        );
    }

    // =========================================================================
    // AUXILIARES
    // =========================================================================

    fn resolve(&self, table: &ProcessTable, handle: ProcessHandle, op: &str) -> SchedResult<usize> {
        table.resolve(handle).map_err(|e| {
            crate::kwarn!("(Sched) {}: handle inválido {}", op, handle);
            e
        })
    }

    /// Tira o PCB da fila em que está e do slot `current`.
    fn detach(&mut self, table: &mut ProcessTable, index: usize, handle: ProcessHandle) {
        match table.pcb_at(index).map(|p| p.queue) {
            Some(QueueTag::Ready(level)) => {
                self.ready.remove(table, index, level);
            }
            Some(QueueTag::Waiting) => {
                self.waiting.remove(table, index);
            }
            Some(QueueTag::Terminated) => {
                self.terminated.remove(table, index);
            }
            Some(QueueTag::Detached) | None => {}
        }
        if self.current == Some(handle) {
            self.current = None;
            self.slice = 0;
        }
    }

    fn count_voluntary(&mut self, table: &mut ProcessTable, handle: ProcessHandle) {
        self.stats.voluntary_switches += 1;
        if let Ok(pcb) = table.get_mut(handle) {
            pcb.accounting.voluntary_switches += 1;
        }
    }
}
