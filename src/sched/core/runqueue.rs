//! Filas de processos
//!
//! Listas FIFO intrusivas: o encadeamento vive no campo `next` de cada PCB
//! (índice de slot), então enfileirar não aloca.

use crate::sched::task::{ProcessTable, QueueTag};
use alloc::vec::Vec;

/// Lista FIFO intrusiva sobre slots da tabela de processos
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskList {
    head: Option<u16>,
    tail: Option<u16>,
    len: usize,
}

impl TaskList {
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Adiciona no fim da fila e marca o PCB com `tag`.
    pub fn push_back(&mut self, table: &mut ProcessTable, index: usize, tag: QueueTag) {
        let Some(pcb) = table.pcb_at_mut(index) else {
            return;
        };
        pcb.next = None;
        pcb.queue = tag;

        let index = index as u16;
        match self.tail {
            Some(tail) => {
                if let Some(prev) = table.pcb_at_mut(tail as usize) {
                    prev.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
    }

    /// Remove o primeiro da fila (FIFO)
    pub fn pop_front(&mut self, table: &mut ProcessTable) -> Option<usize> {
        let head = self.head?;
        let pcb = table.pcb_at_mut(head as usize)?;
        self.head = pcb.next.take();
        pcb.queue = QueueTag::Detached;
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(head as usize)
    }

    /// Remove `index` de qualquer posição. Retorna `false` se não estava na fila.
    pub fn remove(&mut self, table: &mut ProcessTable, index: usize) -> bool {
        let target = index as u16;
        let mut prev: Option<u16> = None;
        let mut cursor = self.head;

        while let Some(current) = cursor {
            let next = table.pcb_at(current as usize).and_then(|p| p.next);
            if current == target {
                match prev {
                    Some(p) => {
                        if let Some(prev_pcb) = table.pcb_at_mut(p as usize) {
                            prev_pcb.next = next;
                        }
                    }
                    None => self.head = next,
                }
                if self.tail == Some(target) {
                    self.tail = prev;
                }
                if let Some(pcb) = table.pcb_at_mut(index) {
                    pcb.next = None;
                    pcb.queue = QueueTag::Detached;
                }
                self.len -= 1;
                return true;
            }
            prev = cursor;
            cursor = next;
        }
        false
    }

    /// Remove e retorna, em ordem, todos os slots que satisfazem `pred`.
    pub fn extract_if<F>(&mut self, table: &mut ProcessTable, mut pred: F) -> Vec<usize>
    where
        F: FnMut(&crate::sched::task::Pcb) -> bool,
    {
        let matches: Vec<usize> = self
            .iter(table)
            .filter(|&index| table.pcb_at(index).map_or(false, &mut pred))
            .collect();
        for &index in &matches {
            self.remove(table, index);
        }
        matches
    }

    /// Slots da fila em ordem.
    pub fn iter<'a>(&self, table: &'a ProcessTable) -> impl Iterator<Item = usize> + 'a {
        let mut cursor = self.head;
        core::iter::from_fn(move || {
            let current = cursor?;
            cursor = table.pcb_at(current as usize).and_then(|p| p.next);
            Some(current as usize)
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Uma fila FIFO por nível de prioridade (0 = mais alta)
pub struct ReadyQueues {
    levels: Vec<TaskList>,
}

impl ReadyQueues {
    pub fn new(levels: usize) -> Self {
        Self {
            levels: alloc::vec![TaskList::new(); levels.max(1)],
        }
    }

    pub fn push(&mut self, table: &mut ProcessTable, index: usize, level: u8) {
        let level = (level as usize).min(self.levels.len() - 1);
        self.levels[level].push_back(table, index, QueueTag::Ready(level as u8));
    }

    /// Varredura estrita a partir do nível 0.
    pub fn pop_highest(&mut self, table: &mut ProcessTable) -> Option<usize> {
        let level = self.highest_level()?;
        self.levels[level as usize].pop_front(table)
    }

    pub fn remove(&mut self, table: &mut ProcessTable, index: usize, level: u8) -> bool {
        match self.levels.get_mut(level as usize) {
            Some(q) => q.remove(table, index),
            None => false,
        }
    }

    /// Nível não vazio de maior prioridade.
    pub fn highest_level(&self) -> Option<u8> {
        self.levels.iter().position(|q| !q.is_empty()).map(|l| l as u8)
    }

    pub fn level(&self, level: usize) -> Option<&TaskList> {
        self.levels.get(level)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(TaskList::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(TaskList::is_empty)
    }
}
