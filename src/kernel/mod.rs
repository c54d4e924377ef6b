//! Kernel Core: contexto, logging, tempo, configuração e erros.

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod time;

pub use config::{ConfigError, KernelConfig};
pub use context::{KernelCore, LockedKernel};
pub use error::{ErrorKind, KResult, KernelError};
pub use time::{Jiffies, TickSource};
