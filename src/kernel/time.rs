//! Fonte de Tempo (Jiffies)
//!
//! O núcleo não lê hardware: consome um contador monotônico de ticks
//! fornecido pelo kernel hospedeiro através de [`TickSource`].
//! "Jiffies" é o termo histórico (do Linux) para ticks de relógio.
//!
//! Detalhes de Implementação:
//! - `Jiffies` usa AtomicU64, lock-free.
//! - Incrementado pelo handler do timer (ou pelo teste que simula o timer).

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

/// Frequência do Tick (Ticks por segundo)
pub const HZ: u64 = 100;

/// Contador monotônico de ticks consumido pelo scheduler.
pub trait TickSource {
    /// Tick atual. Nunca decresce.
    fn current_tick(&self) -> u64;
}

/// Contador de Jiffies (Ticks)
#[derive(Debug, Default)]
pub struct Jiffies {
    ticks: AtomicU64,
}

impl Jiffies {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
        }
    }

    /// Começa em `tick` (útil para reproduzir cenários).
    pub const fn starting_at(tick: u64) -> Self {
        Self {
            ticks: AtomicU64::new(tick),
        }
    }

    /// Retorna o número atual de jiffies.
    #[inline]
    pub fn get(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Incrementa o contador. Retorna o novo valor.
    /// Deve ser chamado APENAS pelo handler de interrupção do timer.
    #[inline]
    pub fn inc(&self) -> u64 {
        self.advance(1)
    }

    /// Avança `n` ticks de uma vez. Retorna o novo valor.
    #[inline]
    pub fn advance(&self, n: u64) -> u64 {
        self.ticks.fetch_add(n, Ordering::Relaxed).wrapping_add(n)
    }
}

impl TickSource for Jiffies {
    #[inline]
    fn current_tick(&self) -> u64 {
        self.get()
    }
}

impl<T: TickSource + ?Sized> TickSource for &T {
    #[inline]
    fn current_tick(&self) -> u64 {
        (**self).current_tick()
    }
}

impl<T: TickSource + ?Sized> TickSource for Arc<T> {
    #[inline]
    fn current_tick(&self) -> u64 {
        (**self).current_tick()
    }
}

/// Converte segundos para jiffies.
#[inline]
pub const fn seconds_to_jiffies(seconds: u64) -> u64 {
    seconds * HZ
}

/// Converte milisegundos para jiffies.
#[inline]
pub const fn millis_to_jiffies(millis: u64) -> u64 {
    (millis * HZ) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jiffies_advance_and_share() {
        let clock = Arc::new(Jiffies::new());
        let view = Arc::clone(&clock);
        assert_eq!(clock.inc(), 1);
        assert_eq!(clock.advance(9), 10);
        assert_eq!(view.current_tick(), 10);
        assert_eq!((&*clock).current_tick(), 10);
    }

    #[test]
    fn conversions_use_hz() {
        assert_eq!(seconds_to_jiffies(2), 200);
        assert_eq!(millis_to_jiffies(250), 25);
        assert_eq!(Jiffies::starting_at(7).get(), 7);
    }
}
