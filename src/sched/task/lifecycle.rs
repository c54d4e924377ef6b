//! Cleanup de processos terminados (reaper)
//!
//! Processos terminados continuam na tabela (e na fila de terminados) até
//! serem recolhidos. Recolher devolve a stack, se ainda houver uma, e
//! libera o slot avançando sua geração. Um processo cuja stack o heap
//! recusa devolver fica na fila para a próxima passada.

use super::table::ProcessTable;
use crate::mm::Heap;
use crate::sched::core::Scheduler;

/// Recolhe todos os processos terminados. Retorna quantos slots voltaram
/// a ficar livres.
pub fn reap(table: &mut ProcessTable, scheduler: &mut Scheduler, heap: &mut Heap) -> usize {
    let mut reaped = 0;

    for handle in scheduler.drain_terminated(table) {
        if let Err(e) = table.release_stack(heap, handle) {
            crate::kwarn!("(Lifecycle) {} mantido: {}", handle, e);
            scheduler.requeue_terminated(table, handle);
            continue;
        }

        if let Some(pcb) = table.release_slot(handle.index() as usize) {
            crate::kdebug!("(Lifecycle) Cleaning up zombie pid={} '{}'", pcb.pid, pcb.name);
            reaped += 1;
        }
    }

    if reaped > 0 {
        crate::kinfo!("(Lifecycle) {} processos recolhidos", reaped);
    }
    reaped
}
