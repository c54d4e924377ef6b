//! Framework de testes do kernel
//!
//! Suites de self-test (`mm::test`, `sched::test`) executáveis pelo kernel
//! hospedeiro no boot, sob a feature `self_test`.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    Fail,
    Skip,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Totais de uma suite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Soma duas suites (relatório agregado por subsistema).
    pub fn merge(self, other: SuiteReport) -> SuiteReport {
        SuiteReport {
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Executa suite de testes
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> SuiteReport {
    crate::kinfo!("(Test) === Executando suite: {} ({} casos)", name, tests.len());

    let mut report = SuiteReport::default();

    for test in tests {
        match (test.func)() {
            TestResult::Pass => {
                crate::kok!("(Test) {}", test.name);
                report.passed += 1;
            }
            TestResult::Fail => {
                crate::kfail!("(Test) {}", test.name);
                report.failed += 1;
            }
            TestResult::Skip => {
                crate::kwarn!("(Test) [SKIP] {}", test.name);
                report.skipped += 1;
            }
        }
    }

    crate::kinfo!(
        "(Test) Resultados {}: passed={} failed={} skipped={}",
        name,
        report.passed,
        report.failed,
        report.skipped
    );
    report
}
