//! # Process Handle
//!
//! Handle é índice + generation. A geração do slot muda quando o slot é
//! liberado, então um handle antigo nunca alcança o processo novo.

use core::fmt;

/// Referência estável a um slot da tabela de processos
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessHandle(u32);

impl ProcessHandle {
    pub const INVALID: Self = Self(u32::MAX);

    pub const fn new(index: u16, generation: u16) -> Self {
        Self((generation as u32) << 16 | index as u32)
    }

    pub const fn index(&self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    pub const fn generation(&self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    pub const fn from_u32(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}g{}", self.index(), self.generation())
    }
}

/// Identificador único e monotônico de processo
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(u32);

impl Pid {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
