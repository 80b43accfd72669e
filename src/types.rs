use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary amounts. Always a `Decimal`, never `f64`.
pub type Money = Decimal;

/// Loan parameters for a single calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// The amount borrowed.
    pub principal: Money,
    /// The nominal annual rate as a percentage (e.g., 14.0 for 14%).
    pub annual_rate_percent: Decimal,
    /// The number of monthly periods.
    pub term_periods: u32,
}

/// What happens to the loan after a partial prepayment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepaymentStrategy {
    /// Keep the payment, finish the loan earlier.
    #[default]
    ReduceTerm,
    /// Keep the remaining period count, lower the payment.
    ReducePayment,
}

/// A one-off extra principal payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentEvent {
    /// Period at which the prepayment is applied. Zero disables it.
    pub trigger_period: u32,
    pub amount: Money,
    #[serde(default)]
    pub strategy: PrepaymentStrategy,
}

impl PrepaymentEvent {
    /// Whether the event can fire at all for a loan of `term_periods` periods.
    pub fn is_active(&self, term_periods: u32) -> bool {
        self.trigger_period >= 1
            && self.trigger_period <= term_periods
            && self.amount > Decimal::ZERO
    }
}

/// One period of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period_index: u32,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub ending_balance: Money,
}

/// The ordered ledger produced by the generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    /// Set when generation stopped at the period bound with a balance still
    /// outstanding.
    pub truncated: bool,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleRow> {
        self.rows.iter()
    }

    pub fn last(&self) -> Option<&ScheduleRow> {
        self.rows.last()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a ScheduleRow;
    type IntoIter = std::slice::Iter<'a, ScheduleRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// A complete request as read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub terms: LoanTerms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment: Option<PrepaymentEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(0, dec!(1000), false)]
    #[case(1, dec!(1000), true)]
    #[case(36, dec!(1000), true)]
    #[case(37, dec!(1000), false)]
    #[case(12, dec!(0), false)]
    fn test_prepayment_is_active(
        #[case] trigger_period: u32,
        #[case] amount: Money,
        #[case] expected: bool,
    ) {
        let event = PrepaymentEvent {
            trigger_period,
            amount,
            strategy: PrepaymentStrategy::ReduceTerm,
        };
        assert_eq!(event.is_active(36), expected);
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "terms": { "principal": 2000000, "annual_rate_percent": 14.0, "term_periods": 36 },
            "prepayment": { "trigger_period": 12, "amount": "500000", "strategy": "reduce_payment" }
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.terms.principal, dec!(2000000));
        assert_eq!(request.terms.term_periods, 36);
        let prepayment = request.prepayment.unwrap();
        assert_eq!(prepayment.amount, dec!(500000));
        assert_eq!(prepayment.strategy, PrepaymentStrategy::ReducePayment);
    }

    #[test]
    fn test_request_without_prepayment() {
        let json = r#"{ "terms": { "principal": 1000, "annual_rate_percent": 0, "term_periods": 3 } }"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert!(request.prepayment.is_none());
    }
}
