//! # Funções de Alinhamento
//!
//! Usadas pelo heap para arredondar tamanhos de payload à unidade de
//! alinhamento. `align` deve ser potência de dois.

/// Alinha um valor para cima ao próximo múltiplo de `align`.
///
/// Retorna `None` se o resultado não cabe em `usize`.
#[inline]
pub const fn align_up(val: usize, align: usize) -> Option<usize> {
    match val.checked_add(align - 1) {
        Some(v) => Some(v & !(align - 1)),
        None => None,
    }
}

/// Verifica se um valor está alinhado a `align`.
#[inline]
pub const fn is_aligned(val: usize, align: usize) -> bool {
    val & (align - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_unit() {
        assert_eq!(align_up(10, 4), Some(12));
        assert_eq!(align_up(16, 4), Some(16));
        assert_eq!(align_up(1, 16), Some(16));
        assert_eq!(align_up(usize::MAX, 4), None);
        assert!(is_aligned(16, 4));
        assert!(!is_aligned(10, 4));
    }
}
