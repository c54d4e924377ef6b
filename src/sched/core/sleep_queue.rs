//! Sleep Queue - processos dormindo até um deadline em ticks
//!
//! Fila FIFO não ordenada. A cada tick, uma varredura retira todos os
//! processos cujo deadline já foi alcançado.

use super::runqueue::TaskList;
use crate::sched::task::{ProcessTable, QueueTag};
use alloc::vec::Vec;

#[derive(Debug, Default)]
pub struct SleepQueue {
    list: TaskList,
}

impl SleepQueue {
    pub const fn new() -> Self {
        Self {
            list: TaskList::new(),
        }
    }

    pub fn push(&mut self, table: &mut ProcessTable, index: usize) {
        self.list.push_back(table, index, QueueTag::Waiting);
    }

    pub fn remove(&mut self, table: &mut ProcessTable, index: usize) -> bool {
        self.list.remove(table, index)
    }

    /// Retira, em ordem de chegada, os processos com `deadline <= now`.
    pub fn take_expired(&mut self, table: &mut ProcessTable, now: u64) -> Vec<usize> {
        self.list
            .extract_if(table, |pcb| pcb.wake_deadline.map_or(true, |d| d <= now))
    }

    /// Menor deadline pendente (útil para programar o próximo timer).
    pub fn next_deadline(&self, table: &ProcessTable) -> Option<u64> {
        self.list
            .iter(table)
            .filter_map(|index| table.pcb_at(index).and_then(|p| p.wake_deadline))
            .min()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
