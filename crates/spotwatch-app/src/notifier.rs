//! 빈 자리 알림: 로그 출력 구현.

use spotwatch_core::error::CoreError;
use spotwatch_core::ports::notifier::{VacancyAlert, VacancyNotifier};
use tracing::{info, warn};

/// `tracing`으로 알림을 남기는 기본 구현
#[derive(Debug, Default, Clone, Copy)]
pub struct LogVacancyNotifier;

impl VacancyNotifier for LogVacancyNotifier {
    fn notify(&self, alert: VacancyAlert) -> Result<(), CoreError> {
        match alert {
            VacancyAlert::Low(summary) => warn!(
                "빈 자리 부족: {} ({:.0}%)",
                summary,
                summary.vacancy_ratio() * 100.0
            ),
            VacancyAlert::Recovered(summary) => info!(
                "빈 자리 회복: {} ({:.0}%)",
                summary,
                summary.vacancy_ratio() * 100.0
            ),
        }
        Ok(())
    }
}
