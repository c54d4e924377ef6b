// =============================================================================
// KERNEL LOGGING SYSTEM
// =============================================================================
//
// Sistema de logging do Forge Core.
//
// ARQUITETURA:
// - Os macros k* encaminham para a fachada `log`; o kernel hospedeiro instala
//   o sink (serial, console, buffer em memória) via `log::set_logger`.
// - O núcleo NUNCA imprime diretamente.
// - Filtragem em tempo de compilação pelas features do Cargo, mapeadas para
//   `log/max_level_*`. Com "no_logs" todos os macros viram código morto.
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - CRIT:  Corrupção detectada (emitido como ERROR com prefixo [CRIT])
// - ERROR: Erros graves
// - WARN:  Situações suspeitas mas recuperáveis (double free, handle inválido)
// - INFO:  Fluxo normal de execução
// - DEBUG: Informações de debugging
// - TRACE: Detalhes extremos (cada alocação, cada tick)
//
// COMO USAR:
//   kinfo!("(Heap) Arena criada: max={} bytes", max);
//   kwarn!("(Sched) Handle inválido: {:?}", handle);
//   kcrit!("(Heap) Guard corrompido no bloco {:#x}", offset);
//
// Prefixos por subsistema: (Heap), (Sched), (Proc), (Kernel), (Test).
//
// =============================================================================

/// Prefixo de mensagens críticas (`log` não possui nível CRITICAL).
pub const P_CRIT: &str = "[CRIT] ";
/// Prefixo de sucesso (self-tests, init).
pub const P_OK: &str = "[ OK ] ";
/// Prefixo de falha (self-tests, init).
pub const P_FAIL: &str = "[FAIL] ";

// =============================================================================
// MACROS DE LOG
// =============================================================================

/// Corrupção ou violação de invariante. Sempre ativo (exceto com no_logs).
#[macro_export]
macro_rules! kcrit {
    ($($arg:tt)+) => {
        $crate::__log::error!("{}{}", $crate::kernel::logging::P_CRIT, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! kerror {
    ($($arg:tt)+) => {
        $crate::__log::error!($($arg)+)
    };
}

#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)+) => {
        $crate::__log::warn!($($arg)+)
    };
}

#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)+) => {
        $crate::__log::info!($($arg)+)
    };
}

#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)+) => {
        $crate::__log::debug!($($arg)+)
    };
}

/// Nível mais verboso. Cada alocação e cada decisão do scheduler.
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)+) => {
        $crate::__log::trace!($($arg)+)
    };
}

/// Mensagem de sucesso `[ OK ]` (nível INFO).
#[macro_export]
macro_rules! kok {
    ($($arg:tt)+) => {
        $crate::__log::info!("{}{}", $crate::kernel::logging::P_OK, format_args!($($arg)+))
    };
}

/// Mensagem de falha `[FAIL]` (nível ERROR).
#[macro_export]
macro_rules! kfail {
    ($($arg:tt)+) => {
        $crate::__log::error!("{}{}", $crate::kernel::logging::P_FAIL, format_args!($($arg)+))
    };
}
