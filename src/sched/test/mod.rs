//! # Testes do Scheduler
//!
//! Self-tests executáveis pelo kernel hospedeiro no boot:
//! - `sched_test.rs` - prioridade estrita, round-robin, deadlines, término


use crate::klib::test_framework::{run_test_suite, SuiteReport};

/// Executa todas as suites do scheduler.
pub fn run_sched_tests() -> SuiteReport {
    run_test_suite("sched", sched_test::SCHED_TESTS)
}

#[cfg(test)]
mod tests {
    #[test]
    fn sched_self_tests_pass() {
        let report = super::run_sched_tests();
        assert_eq!(report.failed, 0, "{:?}", report);
        assert_eq!(report.passed, super::sched_test::SCHED_TESTS.len());
    }
}
