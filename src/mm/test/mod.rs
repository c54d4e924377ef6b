//! # Testes do Subsistema de Memória
//!
//! Self-tests executáveis pelo kernel hospedeiro no boot:
//! - `heap_test.rs` - reuso first-fit, split, coalescência, corrupção


use crate::klib::test_framework::{run_test_suite, SuiteReport};

/// Executa todas as suites de memória.
pub fn run_memory_tests() -> SuiteReport {
    run_test_suite("mm::heap", heap_test::HEAP_TESTS)
}

#[cfg(test)]
mod tests {
    #[test]
    fn memory_self_tests_pass() {
        let report = super::run_memory_tests();
        assert_eq!(report.failed, 0, "{:?}", report);
        assert_eq!(report.passed, super::heap_test::HEAP_TESTS.len());
    }
}
