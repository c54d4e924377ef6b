//! # Kernel Core
//!
//! Contexto explícito que possui o heap, a tabela de processos e o
//! scheduler. Não há estado global: cada `KernelCore` é independente, o
//! que permite várias instâncias isoladas (um por teste, por exemplo).
//!
//! ## Fluxo por tick
//! O handler do timer do kernel hospedeiro avança a fonte de ticks e chama
//! `tick()`, que acorda os processos com deadline vencido e escolhe quem
//! executa. O heap só é usado pelo scheduler indiretamente, na criação
//! (stack) e no término (devolução da stack) de processos.
//!
//! ## Concorrência
//! Todas as operações são síncronas e exigem `&mut self`. Um hospedeiro com
//! várias threads serializa o acesso com `LockedKernel`.

use super::config::KernelConfig;
use super::error::KResult;
use super::time::{Jiffies, TickSource};
use crate::mm::Heap;
use crate::sched::core::{SchedStats, Scheduler};
use crate::sched::task::{lifecycle, Pcb, ProcessEntry, ProcessHandle, ProcessTable};
use spin::{Mutex, MutexGuard};

/// Nome dado a processos criados sem nome explícito
pub const ANONYMOUS: &str = "anon";

pub struct KernelCore<C = Jiffies> {
    config: KernelConfig,
    heap: Heap,
    table: ProcessTable,
    scheduler: Scheduler,
    clock: C,
}

impl<C: TickSource> KernelCore<C> {
    /// Valida a configuração e monta os três subsistemas.
    pub fn new(config: KernelConfig, clock: C) -> KResult<Self> {
        if let Err(e) = config.validate() {
            crate::kerror!("(Kernel) configuração rejeitada: {}", e);
            return Err(e.into());
        }

        let heap = Heap::new(config.heap)?;
        let table = ProcessTable::new(config.sched.max_processes);
        let scheduler = Scheduler::new(config.sched);

        crate::kok!(
            "(Kernel) core pronto: arena={} bytes, {} slots, quantum={}",
            config.heap.arena_size,
            config.sched.max_processes,
            config.sched.quantum
        );

        Ok(Self {
            config,
            heap,
            table,
            scheduler,
            clock,
        })
    }

    // =========================================================================
    // PROCESSOS
    // =========================================================================

    /// Cria um processo com a prioridade padrão e o coloca na fila de prontos.
    pub fn create_process(&mut self, entry: ProcessEntry) -> KResult<ProcessHandle> {
        let priority = self.config.sched.default_priority;
        self.create_process_with(entry, priority, ANONYMOUS)
    }

    /// Cria um processo com prioridade (limitada aos níveis) e nome.
    pub fn create_process_with(
        &mut self,
        entry: ProcessEntry,
        priority: u8,
        name: &'static str,
    ) -> KResult<ProcessHandle> {
        let priority = self.config.sched.clamp_priority(priority);
        let handle = self.table.create_process(
            &mut self.heap,
            entry,
            priority,
            name,
            self.config.sched.stack_size,
        )?;
        self.scheduler.admit(&mut self.table, handle)?;
        Ok(handle)
    }

    pub fn process(&self, handle: ProcessHandle) -> KResult<&Pcb> {
        Ok(self.table.get(handle)?)
    }

    // =========================================================================
    // SCHEDULER
    // =========================================================================

    /// Ponto de entrada do timer: acorda quem venceu e seleciona o próximo.
    pub fn tick(&mut self) -> Option<ProcessHandle> {
        self.wake_waiting();
        self.select_next()
    }

    pub fn select_next(&mut self) -> Option<ProcessHandle> {
        let now = self.clock.current_tick();
        self.scheduler.select_next(&mut self.table, now)
    }

    pub fn enqueue_ready(&mut self, handle: ProcessHandle) -> KResult<()> {
        Ok(self.scheduler.enqueue_ready(&mut self.table, handle)?)
    }

    pub fn dequeue_ready(&mut self) -> Option<ProcessHandle> {
        self.scheduler.dequeue_ready(&mut self.table)
    }

    /// Dorme `ticks` a partir do tick atual. Retorna o deadline.
    pub fn sleep(&mut self, handle: ProcessHandle, ticks: u64) -> KResult<u64> {
        let now = self.clock.current_tick();
        Ok(self.scheduler.sleep(&mut self.table, handle, ticks, now)?)
    }

    pub fn wake_waiting(&mut self) -> usize {
        let now = self.clock.current_tick();
        self.scheduler.wake_waiting(&mut self.table, now)
    }

    /// Termina o processo e devolve sua stack ao heap.
    ///
    /// O PCB permanece na tabela como `Terminated` até `reap_terminated`.
    /// Se o heap recusar a stack (`StackRelease`), o término já ocorreu e
    /// o PCB guarda a stack; `reap_terminated` tenta de novo.
    pub fn terminate(&mut self, handle: ProcessHandle) -> KResult<()> {
        self.scheduler.terminate(&mut self.table, handle)?;
        self.table.release_stack(&mut self.heap, handle)?;
        Ok(())
    }

    pub fn yield_now(&mut self) -> Option<ProcessHandle> {
        self.scheduler.yield_current(&mut self.table)
    }

    pub fn set_priority(&mut self, handle: ProcessHandle, priority: u8) -> KResult<u8> {
        Ok(self.scheduler.set_priority(&mut self.table, handle, priority)?)
    }

    /// Libera os slots dos processos terminados.
    pub fn reap_terminated(&mut self) -> usize {
        lifecycle::reap(&mut self.table, &mut self.scheduler, &mut self.heap)
    }

    pub fn current(&self) -> Option<ProcessHandle> {
        self.scheduler.current()
    }

    pub fn stats(&self) -> SchedStats {
        self.scheduler.stats()
    }

    // =========================================================================
    // ACESSO AOS SUBSISTEMAS
    // =========================================================================

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Heap para alocações do kernel hospedeiro.
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn dump_stats(&self) {
        self.heap.dump_stats();
        self.scheduler.dump_stats();
    }
}

/// `KernelCore` protegido por Mutex
/// --------------------------------
/// Serializa todas as operações para hospedeiros com mais de uma thread.
/// Acesso ao core deve sempre passar pelo lock.
pub struct LockedKernel<C = Jiffies> {
    inner: Mutex<KernelCore<C>>,
}

impl<C: TickSource> LockedKernel<C> {
    pub fn new(config: KernelConfig, clock: C) -> KResult<Self> {
        Ok(Self {
            inner: Mutex::new(KernelCore::new(config, clock)?),
        })
    }

    pub fn lock(&self) -> MutexGuard<'_, KernelCore<C>> {
        self.inner.lock()
    }

    /// Não bloqueia. Para handlers de interrupção que não podem esperar.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, KernelCore<C>>> {
        self.inner.try_lock()
    }

    /// Executa `f` com o lock tomado.
    pub fn with<R>(&self, f: impl FnOnce(&mut KernelCore<C>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
