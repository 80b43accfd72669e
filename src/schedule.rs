use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{ScheduleError, ScheduleResult};
use crate::payment::{compute_payment, monthly_rate, round_money};
use crate::types::{LoanTerms, Money, PrepaymentEvent, PrepaymentStrategy, Schedule, ScheduleRow};

/// Hard bound on the number of generated periods.
pub const DEFAULT_MAX_PERIODS: u32 = 500;

/// Balances at or below this amount count as repaid.
pub const DEFAULT_BALANCE_EPSILON: Money = dec!(0.01);

/// Termination policy of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleLimits {
    pub max_periods: u32,
    pub balance_epsilon: Money,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            max_periods: DEFAULT_MAX_PERIODS,
            balance_epsilon: DEFAULT_BALANCE_EPSILON,
        }
    }
}

/// Mutable state carried from one period to the next.
#[derive(Debug, Clone, Copy)]
struct LoanState {
    balance: Money,
    payment: Money,
    /// Periods left on the contract after the current one.
    remaining_term: u32,
}

/// Walks the loan period by period and produces its [`Schedule`].
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    limits: ScheduleLimits,
}

impl ScheduleGenerator {
    pub fn new(limits: ScheduleLimits) -> Self {
        Self { limits }
    }

    /// Generates the payment schedule for `terms`, applying `prepayment` once
    /// if its trigger period falls inside the term.
    ///
    /// Each period accrues interest on the outstanding balance, pays the fixed
    /// payment, and then applies the prepayment if this is its period. A
    /// prepayment that covers the remaining balance replaces the period's row
    /// with a single terminal row and ends the schedule. The contract's last
    /// period pays off whatever balance is left.
    ///
    /// Row `m` records the payment actually made in period `m`; a payment
    /// recalculated by [`PrepaymentStrategy::ReducePayment`] shows from row `m + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidInput`] if the terms are invalid or the
    /// prepayment amount is negative, and [`ScheduleError::Overflow`] if an
    /// amount leaves the `Decimal` range. Hitting the period bound is not an
    /// error: the partial schedule is returned with `truncated` set.
    #[instrument(level = "debug", skip(self))]
    pub fn generate(
        &self,
        terms: &LoanTerms,
        prepayment: Option<&PrepaymentEvent>,
    ) -> ScheduleResult<Schedule> {
        if let Some(event) = prepayment {
            if event.amount < Decimal::ZERO {
                return Err(ScheduleError::invalid("prepayment.amount", "cannot be negative"));
            }
        }

        let rate = monthly_rate(terms.annual_rate_percent);
        let mut state = LoanState {
            balance: terms.principal,
            payment: compute_payment(terms.principal, terms.annual_rate_percent, terms.term_periods)?,
            remaining_term: terms.term_periods,
        };
        let prepayment = prepayment.filter(|event| event.is_active(terms.term_periods));

        let mut rows = Vec::with_capacity(terms.term_periods.min(self.limits.max_periods) as usize);
        let mut period = 1;

        while state.balance > self.limits.balance_epsilon && period <= self.limits.max_periods {
            let interest = state
                .balance
                .checked_mul(rate)
                .map(round_money)
                .ok_or_else(|| ScheduleError::overflow("interest accrual"))?;
            // The last contractual period settles the rounding residual; an earlier
            // period never pays more than is owed.
            let principal_portion = if period == terms.term_periods {
                state.balance
            } else {
                round_money(state.payment - interest).min(state.balance)
            };
            let payment = principal_portion + interest;
            state.balance = round_money(state.balance - principal_portion);
            state.remaining_term = state.remaining_term.saturating_sub(1);

            if let Some(event) = prepayment.filter(|event| event.trigger_period == period) {
                if event.amount >= state.balance {
                    debug!(period, amount = %event.amount, "prepayment settles the loan");
                    rows.push(ScheduleRow {
                        period_index: period,
                        payment_amount: event.amount,
                        principal_portion: event.amount,
                        interest_portion: Decimal::ZERO,
                        ending_balance: Decimal::ZERO,
                    });
                    state.balance = Decimal::ZERO;
                    break;
                }

                state.balance -= event.amount;
                apply_strategy(&mut state, terms, event.strategy)?;
                debug!(
                    period,
                    amount = %event.amount,
                    strategy = ?event.strategy,
                    balance = %state.balance,
                    payment = %state.payment,
                    "prepayment applied"
                );
            }

            rows.push(ScheduleRow {
                period_index: period,
                payment_amount: payment,
                principal_portion,
                interest_portion: interest,
                ending_balance: state.balance.max(Decimal::ZERO),
            });
            period += 1;
        }

        let truncated = state.balance > self.limits.balance_epsilon;
        if truncated {
            warn!(
                periods = rows.len(),
                balance = %state.balance,
                "schedule stopped at the period limit before the loan was repaid"
            );
        }

        Ok(Schedule { rows, truncated })
    }
}

/// Re-derives the loan after a partial prepayment.
fn apply_strategy(
    state: &mut LoanState,
    terms: &LoanTerms,
    strategy: PrepaymentStrategy,
) -> ScheduleResult<()> {
    match strategy {
        // The balance now runs out before the contractual term; the payment stays.
        PrepaymentStrategy::ReduceTerm => {}
        PrepaymentStrategy::ReducePayment => {
            if state.remaining_term > 0 {
                state.payment =
                    compute_payment(state.balance, terms.annual_rate_percent, state.remaining_term)?;
            }
        }
    }
    Ok(())
}

/// Generates a schedule with the default [`ScheduleLimits`].
pub fn generate(terms: &LoanTerms, prepayment: Option<&PrepaymentEvent>) -> ScheduleResult<Schedule> {
    ScheduleGenerator::default().generate(terms, prepayment)
}
