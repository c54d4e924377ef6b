//! # Heap First-Fit
//!
//! Alocador de lista livre sobre uma arena linear.
//!
//! ## Arquitetura
//! - **Arena:** região contígua que cresce por um high-water mark até
//!   `HeapConfig::arena_size`. Nunca encolhe.
//! - **Cadeia de blocos:** `Vec<Block>` ordenado por endereço que ladrilha
//!   exatamente `[0, high_water_mark)`, sem buracos nem sobreposição.
//! - **Headers na arena:** cada bloco tem um header com guard token gravado
//!   nos bytes da arena (ver `block.rs`). Um overrun destrói o guard.
//! - **First-fit:** a primeira área livre que serve é usada; se sobrar mais
//!   que um header, o bloco é dividido (split). Se nada serve, um bloco novo
//!   é anexado no high-water mark.
//! - **Coalescência global:** após cada free, uma única varredura funde
//!   todo par adjacente de blocos livres. O(n) no tamanho da cadeia.
//!
//! ## Handles
//! `HeapHandle` é o offset do payload dentro da arena. Não é ponteiro: o
//! acesso ao conteúdo passa por `payload`/`payload_mut`.

pub mod block;

pub use block::{Block, BlockFlags, Provenance, RawHeader};

use super::config::{HeapConfig, HeapFlags, HEADER_SIZE, POISON_BYTE};
use super::error::{MmError, MmResult};
use super::stats::HeapStats;
use crate::klib::align_up;
use alloc::vec::Vec;
use core::fmt;
use core::panic::Location;

/// Handle de uma alocação: offset do payload na arena.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeapHandle(usize);

impl HeapHandle {
    /// Reconstrói um handle a partir do valor cru (ex: vindo de uma syscall).
    pub const fn from_raw(offset: usize) -> Self {
        Self(offset)
    }

    pub const fn offset(&self) -> usize {
        self.0
    }
}

impl fmt::Display for HeapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Heap first-fit com detecção de corrupção.
pub struct Heap {
    arena: Vec<u8>,
    blocks: Vec<Block>,
    config: HeapConfig,
    stats: HeapStats,
}

impl Heap {
    /// Cria um heap vazio. A arena só é materializada conforme cresce.
    pub fn new(config: HeapConfig) -> MmResult<Self> {
        if !config.alignment_is_valid() || !config.arena_size_is_valid() {
            crate::kerror!(
                "(Heap) Configuração inválida: arena={} align={}",
                config.arena_size,
                config.alignment
            );
            return Err(MmError::InvalidSize);
        }

        crate::kdebug!(
            "(Heap) init: max={} bytes align={} flags={:?}",
            config.arena_size,
            config.alignment,
            config.flags
        );

        Ok(Self {
            arena: Vec::new(),
            blocks: Vec::new(),
            config,
            stats: HeapStats {
                arena_size: config.arena_size as u64,
                ..HeapStats::default()
            },
        })
    }

    /// Heap com a configuração padrão e arena de `arena_size` bytes.
    pub fn with_arena_size(arena_size: usize) -> MmResult<Self> {
        Self::new(HeapConfig::with_arena_size(arena_size))
    }

    // =========================================================================
    // ALLOCATE
    // =========================================================================

    /// Aloca `size` bytes. A proveniência é o call-site do chamador.
    #[track_caller]
    pub fn allocate(&mut self, size: usize) -> MmResult<HeapHandle> {
        let caller = Location::caller();
        self.allocate_with(size, Some(Provenance::Caller(caller)))
    }

    /// Aloca `size` bytes com um rótulo de proveniência explícito.
    pub fn allocate_tagged(&mut self, size: usize, label: &'static str) -> MmResult<HeapHandle> {
        self.allocate_with(size, Some(Provenance::Label(label)))
    }

    fn allocate_with(
        &mut self,
        size: usize,
        provenance: Option<Provenance>,
    ) -> MmResult<HeapHandle> {
        let size = match self.round_size(size) {
            Ok(size) => size,
            Err(e) => {
                self.stats.failed_allocations += 1;
                crate::kwarn!("(Heap) allocate: pedido de {} bytes recusado: {}", size, e);
                return Err(e);
            }
        };

        // First-fit em ordem de endereço, verificando cada header visitado.
        let mut found = None;
        let mut corrupted = None;
        for (idx, block) in self.blocks.iter().enumerate() {
            if !block.header_intact(&self.arena) {
                corrupted = Some(block.offset);
                break;
            }
            if block.is_free() && block.size >= size {
                found = Some(idx);
                break;
            }
        }
        if let Some(offset) = corrupted {
            self.stats.failed_allocations += 1;
            return Err(self.report_corruption("allocate", offset));
        }

        let handle = match found {
            Some(idx) => self.take_free_block(idx, size, provenance),
            None => self.extend(size, provenance)?,
        };

        self.stats.record_alloc(size);
        if self.config.flags.contains(HeapFlags::ZERO) {
            self.arena[handle.offset()..handle.offset() + size].fill(0);
        }

        crate::ktrace!("(Heap) allocate: {} bytes em {}", size, handle);
        Ok(handle)
    }

    /// Usa o bloco livre `idx`, dividindo-o se sobrar mais que um header.
    fn take_free_block(
        &mut self,
        idx: usize,
        size: usize,
        provenance: Option<Provenance>,
    ) -> HeapHandle {
        let block = &mut self.blocks[idx];

        if block.size > size + HEADER_SIZE {
            let rest = Block::free(block.offset + HEADER_SIZE + size, block.size - size - HEADER_SIZE);
            block.size = size;
            rest.write_header(&mut self.arena);
            self.blocks.insert(idx + 1, rest);
            crate::ktrace!("(Heap) split: resto de {} bytes em {:#x}", rest.size, rest.offset);
        }

        let block = &mut self.blocks[idx];
        block.mark_used(provenance);
        block.write_header(&mut self.arena);
        HeapHandle(block.payload_offset())
    }

    /// Anexa um bloco novo no high-water mark.
    fn extend(&mut self, size: usize, provenance: Option<Provenance>) -> MmResult<HeapHandle> {
        let offset = self.arena.len();
        let new_end = offset
            .checked_add(HEADER_SIZE)
            .and_then(|o| o.checked_add(size))
            .filter(|end| *end <= self.config.arena_size);

        let Some(new_end) = new_end else {
            self.stats.failed_allocations += 1;
            crate::kwarn!(
                "(Heap) OOM: pedido de {} bytes, hwm={} max={}",
                size,
                offset,
                self.config.arena_size
            );
            return Err(MmError::OutOfMemory);
        };

        if self.arena.try_reserve(new_end - offset).is_err() {
            self.stats.failed_allocations += 1;
            crate::kerror!("(Heap) OOM: backing recusou {} bytes", new_end - offset);
            return Err(MmError::OutOfMemory);
        }
        self.arena.resize(new_end, 0);

        let block = Block::used(offset, size, provenance);
        block.write_header(&mut self.arena);
        self.blocks.push(block);
        self.stats.high_water_mark = new_end as u64;

        crate::ktrace!("(Heap) extend: hwm={}", new_end);
        Ok(HeapHandle(block.payload_offset()))
    }

    // =========================================================================
    // FREE
    // =========================================================================

    /// Libera uma alocação e funde todos os blocos livres adjacentes.
    ///
    /// Double free e free de handle desconhecido são reportados como
    /// warning e não alteram nada. Corrupção aborta sem mutação.
    pub fn free(&mut self, handle: HeapHandle) -> MmResult<()> {
        let Some(idx) = self.find(handle) else {
            crate::kwarn!("(Heap) free: handle {} não alocado", handle);
            return Err(MmError::FreeOfUnallocated);
        };

        let block = self.blocks[idx];
        if !block.header_intact(&self.arena) {
            return Err(self.report_corruption("free", block.offset));
        }
        if block.is_free() {
            crate::kwarn!(
                "(Heap) free: double free em {} (alocado em: {})",
                handle,
                ProvenanceDisplay(block.last_owner)
            );
            return Err(MmError::DoubleFree);
        }

        let block = &mut self.blocks[idx];
        let (offset, size) = (block.payload_offset(), block.size);
        block.mark_free();
        block.write_header(&mut self.arena);
        self.stats.record_free(size);

        if self.config.flags.contains(HeapFlags::POISON) {
            self.arena[offset..offset + size].fill(POISON_BYTE);
        }

        let (merged, corrupted) = self.coalesce();
        crate::ktrace!("(Heap) free: {} bytes em {}, {} fusões", size, handle, merged);
        if let Some(offset) = corrupted {
            // O bloco pedido foi liberado; o vizinho fica como está.
            self.report_corruption("coalesce", offset);
        }

        if self.config.flags.contains(HeapFlags::VERIFY_ON_FREE) {
            let bad = self.check_integrity();
            if bad > 0 {
                crate::kcrit!("(Heap) verify: {} blocos corrompidos após free", bad);
            }
        }
        Ok(())
    }

    /// Uma varredura funde todo par adjacente de blocos livres.
    ///
    /// Um par em que algum header está corrompido não é fundido nem
    /// regravado. Retorna as fusões e o primeiro bloco corrompido visto.
    fn coalesce(&mut self) -> (usize, Option<usize>) {
        let arena = &mut self.arena;
        let mut merged = 0;
        let mut corrupted = None;

        self.blocks.dedup_by(|next, prev| {
            if !(prev.is_free() && next.is_free()) {
                return false;
            }
            for block in [&*prev, &*next] {
                if !block.header_intact(arena) {
                    corrupted = corrupted.or(Some(block.offset));
                    return false;
                }
            }
            prev.size += HEADER_SIZE + next.size;
            prev.last_owner = None;
            prev.write_header(arena);
            merged += 1;
            true
        });

        (merged, corrupted)
    }

    // =========================================================================
    // REALLOCATE
    // =========================================================================

    /// Redimensiona uma alocação.
    ///
    /// Retorna o mesmo handle se o payload atual já comporta `new_size`.
    /// Caso contrário aloca, copia o conteúdo antigo e libera o bloco antigo.
    #[track_caller]
    pub fn reallocate(&mut self, handle: HeapHandle, new_size: usize) -> MmResult<HeapHandle> {
        let caller = Location::caller();
        let new_size = self.round_size(new_size)?;

        let idx = self.find(handle).ok_or(MmError::InvalidHandle)?;
        let block = self.blocks[idx];
        if !block.header_intact(&self.arena) {
            return Err(self.report_corruption("reallocate", block.offset));
        }
        if block.is_free() {
            crate::kwarn!("(Heap) reallocate: handle {} já liberado", handle);
            return Err(MmError::InvalidHandle);
        }

        if block.size >= new_size {
            return Ok(handle);
        }

        let provenance = block.provenance.or(Some(Provenance::Caller(caller)));
        let new_handle = self.allocate_with(new_size, provenance)?;

        // Os blocos podem ter mudado de índice; offsets não.
        let old = handle.offset();
        self.arena
            .copy_within(old..old + block.size, new_handle.offset());
        self.free(handle)?;

        crate::ktrace!("(Heap) reallocate: {} -> {} ({} bytes)", handle, new_handle, new_size);
        Ok(new_handle)
    }

    // =========================================================================
    // INTEGRIDADE
    // =========================================================================

    /// Caminha a cadeia e conta os blocos com header corrompido.
    /// Somente leitura.
    pub fn check_integrity(&self) -> usize {
        let mut bad = 0;
        let mut expected = 0;

        for block in &self.blocks {
            if block.offset != expected || !block.header_intact(&self.arena) {
                crate::kcrit!(
                    "(Heap) integridade: bloco {:#x} corrompido (origem: {})",
                    block.offset,
                    ProvenanceDisplay(block.provenance)
                );
                bad += 1;
            }
            expected = block.end();
        }

        bad
    }

    fn report_corruption(&mut self, op: &str, offset: usize) -> MmError {
        self.stats.corruption_events += 1;
        crate::kcrit!("(Heap) {}: guard corrompido no bloco {:#x}", op, offset);
        MmError::CorruptionDetected
    }

    // =========================================================================
    // ACESSO AO PAYLOAD
    // =========================================================================

    /// Bytes do payload de uma alocação em uso.
    pub fn payload(&self, handle: HeapHandle) -> MmResult<&[u8]> {
        let block = self.used_block(handle)?;
        Ok(&self.arena[block.payload_offset()..block.end()])
    }

    pub fn payload_mut(&mut self, handle: HeapHandle) -> MmResult<&mut [u8]> {
        let block = self.used_block(handle)?;
        Ok(&mut self.arena[block.payload_offset()..block.end()])
    }

    /// Tamanho do payload (já arredondado).
    pub fn size_of(&self, handle: HeapHandle) -> MmResult<usize> {
        self.used_block(handle).map(|b| b.size)
    }

    pub fn provenance_of(&self, handle: HeapHandle) -> MmResult<Option<Provenance>> {
        self.used_block(handle).map(|b| b.provenance)
    }

    fn used_block(&self, handle: HeapHandle) -> MmResult<Block> {
        match self.find(handle).map(|idx| self.blocks[idx]) {
            Some(block) if !block.is_free() => Ok(block),
            _ => Err(MmError::InvalidHandle),
        }
    }

    /// Arena crua até o high-water mark, headers incluídos.
    ///
    /// Escrever aqui ignora toda verificação; um colaborador que sobrescreve
    /// um header será detectado por `check_integrity`.
    pub fn backing_mut(&mut self) -> &mut [u8] {
        &mut self.arena
    }

    // =========================================================================
    // DIAGNÓSTICO
    // =========================================================================

    /// Cadeia de blocos em ordem de endereço.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn high_water_mark(&self) -> usize {
        self.arena.len()
    }

    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    pub fn stats(&self) -> HeapStats {
        self.stats
    }

    pub fn free_block_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_free()).count()
    }

    pub fn largest_free_block(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.is_free())
            .map(|b| b.size)
            .max()
            .unwrap_or(0)
    }

    pub fn dump_stats(&self) {
        let s = &self.stats;
        crate::kinfo!("(Heap) === Estatísticas ===");
        crate::kinfo!("(Heap) total alocado:  {} bytes", s.total_allocated);
        crate::kinfo!("(Heap) total liberado: {} bytes", s.total_freed);
        crate::kinfo!("(Heap) uso atual:      {} bytes ({}%)", s.current_usage, s.usage_percent());
        crate::kinfo!("(Heap) pico de uso:    {} bytes", s.peak_usage);
        crate::kinfo!("(Heap) allocs={} frees={}", s.allocation_count, s.free_count);
        crate::kinfo!(
            "(Heap) falhas={} corrupções={}",
            s.failed_allocations,
            s.corruption_events
        );
        crate::kinfo!("(Heap) hwm={} max={}", s.high_water_mark, s.arena_size);
    }

    pub fn dump_blocks(&self) {
        crate::kdebug!("(Heap) === Cadeia ({} blocos) ===", self.blocks.len());
        for block in &self.blocks {
            crate::kdebug!(
                "(Heap) {:#08x} size={:<8} {} {}",
                block.offset,
                block.size,
                if block.is_free() { "FREE" } else { "USED" },
                ProvenanceDisplay(block.provenance)
            );
        }
    }

    // =========================================================================
    // AUXILIARES
    // =========================================================================

    /// Zero é inválido. Pedidos maiores que a arena seguem até `extend`,
    /// que os recusa como OOM.
    fn round_size(&self, size: usize) -> MmResult<usize> {
        if size == 0 {
            return Err(MmError::InvalidSize);
        }
        align_up(size, self.config.alignment).ok_or(MmError::OutOfMemory)
    }

    /// Índice do bloco cujo payload começa em `handle`.
    fn find(&self, handle: HeapHandle) -> Option<usize> {
        let offset = handle.offset().checked_sub(HEADER_SIZE)?;
        self.blocks.binary_search_by_key(&offset, |b| b.offset).ok()
    }
}

struct ProvenanceDisplay(Option<Provenance>);

impl fmt::Display for ProvenanceDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "{}", p),
            None => f.write_str("-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::logging::capture;
    use crate::mm::config::{GUARD_TOKEN, HeapFlags};
    use log::Level;

    fn heap(size: usize) -> Heap {
        Heap::with_arena_size(size).unwrap()
    }

    fn assert_tiled(heap: &Heap) {
        let mut expected = 0;
        for pair in heap.blocks().windows(2) {
            assert!(
                !(pair[0].is_free() && pair[1].is_free()),
                "blocos livres adjacentes: {:?}",
                pair
            );
        }
        for b in heap.blocks() {
            assert_eq!(b.offset, expected);
            assert!(b.size > 0);
            expected = b.end();
        }
        assert_eq!(expected, heap.high_water_mark());
    }

    #[test]
    fn zero_size_is_rejected() {
        let mut h = heap(4096);
        assert_eq!(h.allocate(0), Err(MmError::InvalidSize));
        assert_eq!(h.stats().failed_allocations, 1);
        assert!(h.blocks().is_empty());
    }

    #[test]
    fn sizes_are_rounded_to_alignment() {
        let mut h = heap(4096);
        let a = h.allocate(5).unwrap();
        assert_eq!(h.size_of(a), Ok(8));
        assert_eq!(a.offset(), HEADER_SIZE);
        assert_eq!(h.high_water_mark(), HEADER_SIZE + 8);
    }

    #[test]
    fn reuse_freed_range_without_extending() {
        let mut h = heap(4096);
        let a = h.allocate(1024).unwrap();
        let _b = h.allocate(2048).unwrap();
        let hwm = h.high_water_mark();
        h.free(a).unwrap();

        let c = h.allocate(512).unwrap();
        assert_eq!(c, a);
        assert_eq!(h.high_water_mark(), hwm);
        // 1024 - 512 - header sobra como bloco livre
        assert_eq!(h.blocks()[1], Block::free(HEADER_SIZE + 512, 1024 - 512 - HEADER_SIZE));
        assert_tiled(&h);
    }

    #[test]
    fn no_split_when_remainder_fits_only_a_header() {
        let mut h = heap(4096);
        let a = h.allocate(64).unwrap();
        let _guard = h.allocate(8).unwrap();
        h.free(a).unwrap();

        // 64 não é > 48 + 16: o bloco inteiro é entregue.
        let b = h.allocate(48).unwrap();
        assert_eq!(b, a);
        assert_eq!(h.size_of(b), Ok(64));
        assert_eq!(h.blocks().len(), 2);
    }

    #[test]
    fn arena_limit_is_out_of_memory() {
        let mut h = heap(256);
        let _a = h.allocate(200).unwrap();
        assert_eq!(h.allocate(64), Err(MmError::OutOfMemory));
        assert_eq!(h.stats().failed_allocations, 1);
        assert_eq!(h.high_water_mark(), HEADER_SIZE + 200);
    }

    #[test]
    fn oversize_request_is_out_of_memory() {
        let mut h = heap(4096);
        assert_eq!(h.allocate(4096), Err(MmError::OutOfMemory));
        assert_eq!(h.allocate(4097), Err(MmError::OutOfMemory));
        assert_eq!(h.allocate(usize::MAX), Err(MmError::OutOfMemory));
        assert_eq!(h.stats().failed_allocations, 3);
        assert!(h.blocks().is_empty());
    }

    #[test]
    fn first_fit_takes_earlier_block_over_exact_fit() {
        let mut h = heap(8192);
        let big = h.allocate(256).unwrap();
        let _p1 = h.allocate(16).unwrap();
        let exact = h.allocate(64).unwrap();
        let _p2 = h.allocate(16).unwrap();
        h.free(big).unwrap();
        h.free(exact).unwrap();

        // Best-fit escolheria `exact`; first-fit divide o bloco anterior.
        let c = h.allocate(64).unwrap();
        assert_eq!(c, big);
        assert_eq!(h.size_of(c), Ok(64));
        assert_eq!(h.blocks()[1], Block::free(HEADER_SIZE + 64, 256 - 64 - HEADER_SIZE));
        assert_eq!(h.size_of(exact), Err(MmError::InvalidHandle));
        assert_eq!(h.free_block_count(), 2);
        assert_tiled(&h);
    }

    #[test]
    fn free_merges_both_neighbours() {
        let mut h = heap(4096);
        let a = h.allocate(32).unwrap();
        let b = h.allocate(32).unwrap();
        let c = h.allocate(32).unwrap();
        let _d = h.allocate(32).unwrap();

        h.free(a).unwrap();
        h.free(c).unwrap();
        assert_eq!(h.free_block_count(), 2);

        h.free(b).unwrap();
        assert_eq!(h.free_block_count(), 1);
        assert_eq!(h.blocks()[0], Block::free(0, 3 * 32 + 2 * HEADER_SIZE));
        assert_tiled(&h);
    }

    #[test]
    fn double_free_is_a_warning_noop() {
        capture::install();
        let mut h = heap(4096);
        let a = h.allocate(16).unwrap();
        let _b = h.allocate(16).unwrap();
        h.free(a).unwrap();
        let before = h.blocks().to_vec();
        let stats = h.stats();

        assert_eq!(h.free(a), Err(MmError::DoubleFree));
        assert_eq!(h.blocks(), &before[..]);
        assert_eq!(h.stats(), stats);
        #[cfg(not(feature = "no_logs"))]
        assert!(capture::contains(&capture::take(), Level::Warn, "double free"));
    }

    #[test]
    fn double_free_reports_original_owner() {
        capture::install();
        let mut h = heap(4096);
        let a = h.allocate_tagged(16, "net-buffer").unwrap();
        let _pin = h.allocate(16).unwrap();
        h.free(a).unwrap();
        capture::take();

        assert_eq!(h.free(a), Err(MmError::DoubleFree));
        #[cfg(not(feature = "no_logs"))]
        assert!(capture::contains(&capture::take(), Level::Warn, "net-buffer"));
    }

    #[test]
    fn corrupted_free_neighbour_is_not_absorbed() {
        capture::install();
        let mut h = heap(4096);
        let a = h.allocate(32).unwrap();
        let b = h.allocate(32).unwrap();
        let _c = h.allocate(32).unwrap();
        h.free(a).unwrap();

        let a_header = a.offset() - HEADER_SIZE;
        h.backing_mut()[a_header] ^= 0xFF;
        assert_eq!(h.check_integrity(), 1);
        capture::take();

        // `b` está íntegro e é liberado, mas não se funde com `a`.
        assert_eq!(h.free(b), Ok(()));
        assert_eq!(h.blocks().len(), 3);
        assert!(h.blocks()[1].is_free());
        assert_eq!(h.check_integrity(), 1);
        assert_eq!(h.stats().corruption_events, 1);
        assert_ne!(h.backing_mut()[a_header], GUARD_TOKEN.to_le_bytes()[0]);
        #[cfg(not(feature = "no_logs"))]
        assert!(capture::contains(&capture::take(), Level::Error, "coalesce"));
    }

    #[test]
    fn free_of_unallocated_is_rejected() {
        let mut h = heap(4096);
        let _a = h.allocate(16).unwrap();
        assert_eq!(h.free(HeapHandle::from_raw(3)), Err(MmError::FreeOfUnallocated));
        assert_eq!(h.free(HeapHandle::from_raw(999)), Err(MmError::FreeOfUnallocated));
        assert_eq!(h.stats().free_count, 0);
    }

    #[test]
    fn corrupted_guard_aborts_free_without_mutation() {
        capture::install();
        let mut h = heap(4096);
        let a = h.allocate(16).unwrap();
        let b = h.allocate(16).unwrap();

        // Overrun de `a` atinge o header de `b`.
        let b_header = b.offset() - HEADER_SIZE;
        h.payload_mut(a).unwrap().fill(0xAA);
        h.backing_mut()[b_header] ^= 0xFF;

        let before = h.blocks().to_vec();
        assert_eq!(h.free(b), Err(MmError::CorruptionDetected));
        assert_eq!(h.blocks(), &before[..]);
        assert_eq!(h.check_integrity(), 1);
        assert_eq!(h.stats().corruption_events, 1);
        #[cfg(not(feature = "no_logs"))]
        assert!(capture::contains(&capture::take(), Level::Error, "[CRIT]"));
    }

    #[test]
    fn allocation_scan_detects_corruption() {
        let mut h = heap(4096);
        let a = h.allocate(16).unwrap();
        let a_header = a.offset() - HEADER_SIZE;
        h.backing_mut()[a_header..a_header + 4].copy_from_slice(&0u32.to_le_bytes());
        assert_eq!(h.allocate(16), Err(MmError::CorruptionDetected));
    }

    #[test]
    fn reallocate_in_place_when_it_fits() {
        let mut h = heap(4096);
        let a = h.allocate(100).unwrap();
        assert_eq!(h.reallocate(a, 50), Ok(a));
        assert_eq!(h.reallocate(a, 100), Ok(a));
        assert_eq!(h.reallocate(a, 0), Err(MmError::InvalidSize));
    }

    #[test]
    fn reallocate_moves_and_preserves_content() {
        let mut h = heap(4096);
        let a = h.allocate(8).unwrap();
        let _pin = h.allocate(8).unwrap();
        h.payload_mut(a).unwrap().copy_from_slice(b"forge!!!");

        let b = h.reallocate(a, 64).unwrap();
        assert_ne!(a, b);
        assert_eq!(&h.payload(b).unwrap()[..8], b"forge!!!");
        assert_eq!(h.payload(a), Err(MmError::InvalidHandle));
        assert_tiled(&h);
    }

    #[test]
    fn reallocate_of_freed_handle_fails() {
        let mut h = heap(4096);
        let a = h.allocate(8).unwrap();
        let _pin = h.allocate(8).unwrap();
        h.free(a).unwrap();
        assert_eq!(h.reallocate(a, 64), Err(MmError::InvalidHandle));
    }

    #[test]
    fn provenance_is_recorded() {
        let mut h = heap(4096);
        let a = h.allocate(8).unwrap();
        let s = h.allocate_tagged(8, "stack").unwrap();
        match h.provenance_of(a).unwrap() {
            Some(Provenance::Caller(loc)) => assert!(loc.file().ends_with("mod.rs")),
            other => panic!("proveniência inesperada: {:?}", other),
        }
        assert_eq!(h.provenance_of(s), Ok(Some(Provenance::Label("stack"))));
    }

    #[test]
    fn zero_and_poison_flags() {
        let mut h = Heap::new(HeapConfig {
            flags: HeapFlags::ZERO | HeapFlags::POISON,
            ..HeapConfig::with_arena_size(4096)
        })
        .unwrap();
        let a = h.allocate(16).unwrap();
        let _pin = h.allocate(16).unwrap();
        h.payload_mut(a).unwrap().fill(0x11);
        h.free(a).unwrap();

        let off = a.offset();
        assert!(h.backing_mut()[off..off + 16].iter().all(|b| *b == POISON_BYTE));

        let again = h.allocate(16).unwrap();
        assert!(h.payload(again).unwrap().iter().all(|b| *b == 0));
    }

    #[test]
    fn stats_track_usage() {
        let mut h = heap(4096);
        let a = h.allocate(100).unwrap();
        let b = h.allocate(200).unwrap();
        h.free(a).unwrap();
        let s = h.stats();
        assert_eq!(s.allocation_count, 2);
        assert_eq!(s.free_count, 1);
        assert_eq!(s.current_usage, 200);
        assert_eq!(s.peak_usage, 300);
        assert_eq!(s.high_water_mark as usize, h.high_water_mark());
        h.free(b).unwrap();
        assert_eq!(h.stats().current_usage, 0);
        assert_eq!(h.largest_free_block(), 300 + HEADER_SIZE);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(Heap::with_arena_size(8).is_err());
        let odd = HeapConfig {
            alignment: 3,
            ..HeapConfig::new()
        };
        assert_eq!(Heap::new(odd).err(), Some(MmError::InvalidSize));
        // Guard é exportado para colaboradores que inspecionam a arena.
        assert_eq!(GUARD_TOKEN, 0xDEAD_BEEF);
    }
}
