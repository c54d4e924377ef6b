//! # Memory Statistics

/// Contadores do heap. Bytes contam apenas payload, sem headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub total_allocated: u64,
    pub total_freed: u64,
    pub current_usage: u64,
    pub peak_usage: u64,
    pub allocation_count: u64,
    pub free_count: u64,
    pub failed_allocations: u64,
    pub corruption_events: u64,
    /// Fim da área já utilizada da arena
    pub high_water_mark: u64,
    /// Tamanho máximo configurado da arena
    pub arena_size: u64,
}

impl HeapStats {
    pub fn usage_percent(&self) -> u64 {
        if self.arena_size == 0 {
            return 0;
        }
        (self.current_usage * 100) / self.arena_size
    }

    pub(crate) fn record_alloc(&mut self, bytes: usize) {
        self.total_allocated += bytes as u64;
        self.current_usage += bytes as u64;
        self.allocation_count += 1;
        if self.current_usage > self.peak_usage {
            self.peak_usage = self.current_usage;
        }
    }

    pub(crate) fn record_free(&mut self, bytes: usize) {
        self.total_freed += bytes as u64;
        self.current_usage = self.current_usage.saturating_sub(bytes as u64);
        self.free_count += 1;
    }
}
