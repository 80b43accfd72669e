use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Schedule};

/// Aggregates shown alongside a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// The payment of the first period, i.e. the regular monthly payment.
    pub first_payment: Money,
    /// Sum of all payments, including a settling prepayment.
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub period_count: usize,
    pub truncated: bool,
}

impl ScheduleSummary {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let (total_paid, total_interest, total_principal) = schedule.iter().fold(
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            |(paid, interest, principal), row| {
                (
                    paid + row.payment_amount,
                    interest + row.interest_portion,
                    principal + row.principal_portion,
                )
            },
        );

        Self {
            first_payment: schedule
                .rows
                .first()
                .map(|row| row.payment_amount)
                .unwrap_or_default(),
            total_paid,
            total_interest,
            total_principal,
            period_count: schedule.len(),
            truncated: schedule.truncated,
        }
    }
}

impl From<&Schedule> for ScheduleSummary {
    fn from(schedule: &Schedule) -> Self {
        Self::from_schedule(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScheduleRow;
    use rust_decimal_macros::dec;

    fn row(period_index: u32, principal: Money, interest: Money, balance: Money) -> ScheduleRow {
        ScheduleRow {
            period_index,
            payment_amount: principal + interest,
            principal_portion: principal,
            interest_portion: interest,
            ending_balance: balance,
        }
    }

    #[test]
    fn test_summary_totals() {
        let schedule = Schedule {
            rows: vec![
                row(1, dec!(90), dec!(10), dec!(110)),
                row(2, dec!(95), dec!(5), dec!(15)),
                ScheduleRow {
                    period_index: 3,
                    payment_amount: dec!(15),
                    principal_portion: dec!(15),
                    interest_portion: dec!(0),
                    ending_balance: dec!(0),
                },
            ],
            truncated: false,
        };

        let summary = ScheduleSummary::from(&schedule);

        assert_eq!(summary.first_payment, dec!(100));
        assert_eq!(summary.total_paid, dec!(215));
        assert_eq!(summary.total_interest, dec!(15));
        assert_eq!(summary.total_principal, dec!(200));
        assert_eq!(summary.period_count, 3);
        assert!(!summary.truncated);
    }

    #[test]
    fn test_empty_schedule_summary() {
        let summary = ScheduleSummary::from_schedule(&Schedule::default());
        assert_eq!(summary.first_payment, Decimal::ZERO);
        assert_eq!(summary.total_paid, Decimal::ZERO);
        assert_eq!(summary.period_count, 0);
    }
}
