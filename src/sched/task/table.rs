//! # Process Table
//!
//! Array de slots de capacidade fixa. PCBs são endereçados por
//! `ProcessHandle` (índice + geração), nunca por ponteiro.

use super::entity::{Pcb, ProcessEntry};
use super::handle::{Pid, ProcessHandle};
use crate::mm::Heap;
use crate::sched::error::{SchedError, SchedResult};
use alloc::vec::Vec;

/// Rótulo de proveniência das stacks no heap
pub const STACK_LABEL: &str = "process-stack";

struct Slot {
    generation: u16,
    pcb: Option<Pcb>,
}

/// Tabela de processos
pub struct ProcessTable {
    slots: Vec<Slot>,
    next_pid: u32,
    live: usize,
}

impl ProcessTable {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(u16::MAX as usize);
        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            slots.push(Slot {
                generation: 0,
                pcb: None,
            });
        }
        Self {
            slots,
            next_pid: 1,
            live: 0,
        }
    }

    /// Cria um processo com stack de `stack_size` bytes.
    ///
    /// Falha sem efeitos colaterais: o slot só é ocupado depois que a stack
    /// foi obtida, e o pid só avança em caso de sucesso.
    pub fn create_process(
        &mut self,
        heap: &mut Heap,
        entry: ProcessEntry,
        priority: u8,
        name: &'static str,
        stack_size: usize,
    ) -> SchedResult<ProcessHandle> {
        let Some(index) = self.slots.iter().position(|s| s.pcb.is_none()) else {
            crate::kwarn!("(Proc) create: tabela cheia ({} slots)", self.slots.len());
            return Err(SchedError::TableFull);
        };

        let stack = heap.allocate_tagged(stack_size, STACK_LABEL).map_err(|e| {
            crate::kwarn!("(Proc) create: sem stack para '{}': {}", name, e);
            SchedError::StackAllocation(e)
        })?;

        let pid = Pid::new(self.next_pid);
        self.next_pid += 1;

        let slot = &mut self.slots[index];
        slot.pcb = Some(Pcb::new(pid, name, priority, entry, stack, stack_size));
        self.live += 1;

        let handle = ProcessHandle::new(index as u16, slot.generation);
        crate::kdebug!(
            "(Proc) create: pid={} '{}' prio={} handle={} stack={}",
            pid,
            name,
            priority,
            handle,
            stack
        );
        Ok(handle)
    }

    /// Resolve um handle para o índice do slot.
    pub fn resolve(&self, handle: ProcessHandle) -> SchedResult<usize> {
        let index = handle.index() as usize;
        match self.slots.get(index) {
            Some(slot) if slot.pcb.is_some() && slot.generation == handle.generation() => {
                Ok(index)
            }
            _ => Err(SchedError::InvalidHandle),
        }
    }

    pub fn get(&self, handle: ProcessHandle) -> SchedResult<&Pcb> {
        let index = self.resolve(handle)?;
        self.slots[index].pcb.as_ref().ok_or(SchedError::InvalidHandle)
    }

    pub fn get_mut(&mut self, handle: ProcessHandle) -> SchedResult<&mut Pcb> {
        let index = self.resolve(handle)?;
        self.slots[index].pcb.as_mut().ok_or(SchedError::InvalidHandle)
    }

    /// Handle atual do slot `index`, se ocupado.
    pub fn handle_at(&self, index: usize) -> Option<ProcessHandle> {
        let slot = self.slots.get(index)?;
        slot.pcb
            .as_ref()
            .map(|_| ProcessHandle::new(index as u16, slot.generation))
    }

    pub(crate) fn pcb_at(&self, index: usize) -> Option<&Pcb> {
        self.slots.get(index)?.pcb.as_ref()
    }

    pub(crate) fn pcb_at_mut(&mut self, index: usize) -> Option<&mut Pcb> {
        self.slots.get_mut(index)?.pcb.as_mut()
    }

    /// Devolve a stack do processo ao heap. Idempotente.
    ///
    /// O handle da stack só é descartado quando o heap confirma a devolução
    /// (ou quando o bloco já não está em uso). Em caso de corrupção o PCB
    /// mantém a stack e a chamada pode ser repetida.
    pub fn release_stack(&mut self, heap: &mut Heap, handle: ProcessHandle) -> SchedResult<()> {
        let pcb = self.get_mut(handle)?;
        let Some(stack) = pcb.stack else {
            return Ok(());
        };
        match heap.free(stack) {
            Ok(()) => {}
            Err(e) if e.is_benign() => {
                crate::kwarn!("(Proc) pid={}: stack {} já estava livre: {}", pcb.pid, stack, e);
            }
            Err(e) => {
                crate::kerror!("(Proc) pid={}: stack {} não devolvida: {}", pcb.pid, stack, e);
                return Err(SchedError::StackRelease(e));
            }
        }
        pcb.stack = None;
        Ok(())
    }

    /// Esvazia o slot e avança sua geração. Handles antigos ficam inválidos.
    pub(crate) fn release_slot(&mut self, index: usize) -> Option<Pcb> {
        let slot = self.slots.get_mut(index)?;
        let pcb = slot.pcb.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.live -= 1;
        Some(pcb)
    }

    /// Processos vivos ou terminados ainda não recolhidos.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.live == self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProcessHandle, &Pcb)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.pcb
                .as_ref()
                .map(|pcb| (ProcessHandle::new(index as u16, slot.generation), pcb))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mm::MmError;
    use crate::sched::task::ProcessState;

    fn noop() {}

    #[test]
    fn creates_ready_processes_with_monotonic_pids() {
        let mut heap = Heap::with_arena_size(64 * 1024).unwrap();
        let mut table = ProcessTable::new(4);
        let a = table.create_process(&mut heap, noop, 1, "a", 4096).unwrap();
        let b = table.create_process(&mut heap, noop, 1, "b", 4096).unwrap();

        let (pa, pb) = (table.get(a).unwrap(), table.get(b).unwrap());
        assert!(pa.pid < pb.pid);
        assert_eq!(pa.state(), ProcessState::Ready);
        assert_eq!(heap.size_of(pa.stack().unwrap()), Ok(4096));
        assert_eq!(
            pa.context.stack_top,
            (pa.stack().unwrap().offset() + 4096) as u64
        );
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn full_table_fails_before_touching_the_heap() {
        let mut heap = Heap::with_arena_size(64 * 1024).unwrap();
        let mut table = ProcessTable::new(1);
        table.create_process(&mut heap, noop, 1, "a", 4096).unwrap();
        let before = heap.stats();

        assert_eq!(
            table.create_process(&mut heap, noop, 1, "b", 4096),
            Err(SchedError::TableFull)
        );
        assert_eq!(heap.stats(), before);
    }

    #[test]
    fn stack_failure_rolls_back() {
        let mut heap = Heap::with_arena_size(6000).unwrap();
        let mut table = ProcessTable::new(4);
        table.create_process(&mut heap, noop, 1, "a", 4096).unwrap();

        let err = table.create_process(&mut heap, noop, 1, "b", 4096);
        assert_eq!(err, Err(SchedError::StackAllocation(MmError::OutOfMemory)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.handle_at(1), None);

        // O pid não foi consumido pela falha.
        heap = Heap::with_arena_size(64 * 1024).unwrap();
        let c = table.create_process(&mut heap, noop, 1, "c", 4096).unwrap();
        assert_eq!(table.get(c).unwrap().pid, Pid::new(2));
    }

    #[test]
    fn corrupted_stack_is_kept_until_released() {
        let mut heap = Heap::with_arena_size(64 * 1024).unwrap();
        let mut table = ProcessTable::new(1);
        let a = table.create_process(&mut heap, noop, 1, "a", 4096).unwrap();
        let stack = table.get(a).unwrap().stack().unwrap();
        let header = stack.offset() - crate::mm::config::HEADER_SIZE;
        heap.backing_mut()[header] ^= 0xFF;

        assert_eq!(
            table.release_stack(&mut heap, a),
            Err(SchedError::StackRelease(MmError::CorruptionDetected))
        );
        assert_eq!(table.get(a).unwrap().stack(), Some(stack));
        assert_eq!(heap.stats().current_usage, 4096);

        // Reparado o header, a devolução é repetida com sucesso.
        heap.backing_mut()[header] ^= 0xFF;
        assert_eq!(table.release_stack(&mut heap, a), Ok(()));
        assert_eq!(table.get(a).unwrap().stack(), None);
        assert_eq!(heap.stats().current_usage, 0);
        assert_eq!(table.release_stack(&mut heap, a), Ok(()));
    }

    #[test]
    fn released_slot_invalidates_old_handle() {
        let mut heap = Heap::with_arena_size(64 * 1024).unwrap();
        let mut table = ProcessTable::new(1);
        let old = table.create_process(&mut heap, noop, 1, "a", 4096).unwrap();
        table.release_stack(&mut heap, old).unwrap();
        table.release_slot(old.index() as usize).unwrap();

        let new = table.create_process(&mut heap, noop, 1, "b", 4096).unwrap();
        assert_eq!(new.index(), old.index());
        assert_ne!(new.generation(), old.generation());
        assert_eq!(table.resolve(old), Err(SchedError::InvalidHandle));
        assert_eq!(table.get(new).unwrap().name, "b");
    }
}
