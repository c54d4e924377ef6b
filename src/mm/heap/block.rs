//! Bloco de memória da cadeia do heap.
//!
//! Cada bloco ocupa `HEADER_SIZE + size` bytes da arena. O header é gravado
//! nos próprios bytes da arena (little-endian), então um overrun do payload
//! anterior destrói o guard token e é detectado na próxima verificação.
//!
//! ```text
//! offset      +4      +8      +12     +16                 +16+size
//! | guard     | size  | flags | rsvd  | payload ...       | próximo bloco
//! ```

use super::super::config::{GUARD_TOKEN, HEADER_SIZE};
use bitflags::bitflags;
use core::fmt;
use core::panic::Location;

bitflags! {
    /// Flags gravadas no header do bloco.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BlockFlags: u32 {
        /// Bloco livre.
        const FREE   = 1 << 0;
        /// Bloco em uso com proveniência registrada.
        const TAGGED = 1 << 1;
    }
}

/// Origem de uma alocação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Call-site capturado com `#[track_caller]`.
    Caller(&'static Location<'static>),
    /// Rótulo explícito (ex: "process-stack").
    Label(&'static str),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Caller(loc) => write!(f, "{}:{}", loc.file(), loc.line()),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Nó da cadeia de blocos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Offset do header dentro da arena
    pub offset: usize,
    /// Tamanho do payload em bytes (múltiplo do alinhamento, nunca zero)
    pub size: usize,
    pub flags: BlockFlags,
    pub provenance: Option<Provenance>,
    /// Proveniência do último dono, mantida enquanto o bloco está livre
    /// e ainda não foi fundido.
    pub last_owner: Option<Provenance>,
}

/// Header como lido da arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHeader {
    pub guard: u32,
    pub size: u32,
    pub flags: u32,
}

impl Block {
    pub const fn free(offset: usize, size: usize) -> Self {
        Self {
            offset,
            size,
            flags: BlockFlags::FREE,
            provenance: None,
            last_owner: None,
        }
    }

    pub const fn used(offset: usize, size: usize, provenance: Option<Provenance>) -> Self {
        let flags = if provenance.is_some() {
            BlockFlags::TAGGED
        } else {
            BlockFlags::empty()
        };
        Self {
            offset,
            size,
            flags,
            provenance,
            last_owner: None,
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.flags.contains(BlockFlags::FREE)
    }

    /// Offset do payload (o valor do handle).
    #[inline]
    pub const fn payload_offset(&self) -> usize {
        self.offset + HEADER_SIZE
    }

    /// Primeiro byte depois do bloco.
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + HEADER_SIZE + self.size
    }

    pub fn mark_free(&mut self) {
        self.flags = BlockFlags::FREE;
        self.last_owner = self.provenance.take();
    }

    pub fn mark_used(&mut self, provenance: Option<Provenance>) {
        *self = Self::used(self.offset, self.size, provenance);
    }

    /// Grava o header nos bytes da arena.
    pub fn write_header(&self, arena: &mut [u8]) {
        let h = &mut arena[self.offset..self.offset + HEADER_SIZE];
        h[0..4].copy_from_slice(&GUARD_TOKEN.to_le_bytes());
        h[4..8].copy_from_slice(&(self.size as u32).to_le_bytes());
        h[8..12].copy_from_slice(&self.flags.bits().to_le_bytes());
        h[12..16].fill(0);
    }

    /// Lê o header gravado em `offset`. `None` se não cabe na arena.
    pub fn read_header(arena: &[u8], offset: usize) -> Option<RawHeader> {
        let h = arena.get(offset..offset.checked_add(HEADER_SIZE)?)?;
        let word = |i: usize| u32::from_le_bytes([h[i], h[i + 1], h[i + 2], h[i + 3]]);
        Some(RawHeader {
            guard: word(0),
            size: word(4),
            flags: word(8),
        })
    }

    /// O header na arena ainda confere com este bloco?
    pub fn header_intact(&self, arena: &[u8]) -> bool {
        match Self::read_header(arena, self.offset) {
            Some(raw) => {
                raw.guard == GUARD_TOKEN
                    && raw.size as usize == self.size
                    && raw.flags == self.flags.bits()
            }
            None => false,
        }
    }
}
