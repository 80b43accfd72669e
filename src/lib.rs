//! `annuity_schedule` is a Rust library for building annuity loan schedules.
//!
//! It computes the fixed monthly payment of an amortizing loan and walks the
//! loan period by period, optionally applying one partial prepayment. After
//! the prepayment the borrower either:
//! - **Reduces the term**: the payment stays the same and the loan finishes earlier.
//! - **Reduces the payment**: the payment is recalculated over the periods that
//!   were left on the contract.
//!
//! All amounts are `rust_decimal::Decimal` values rounded to cents, halves away
//! from zero.
//!
//! ## Usage
//!
//! Add `annuity_schedule` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! annuity_schedule = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! ```
//!
//! Then call [`generate`] and summarise the result:
//!
//! ```rust
//! use annuity_schedule::{
//!     generate, LoanTerms, PrepaymentEvent, PrepaymentStrategy, ScheduleSummary,
//! };
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let terms = LoanTerms {
//!         principal: dec!(2_000_000),
//!         annual_rate_percent: dec!(14),
//!         term_periods: 36,
//!     };
//!     let prepayment = PrepaymentEvent {
//!         trigger_period: 12,
//!         amount: dec!(500_000),
//!         strategy: PrepaymentStrategy::ReducePayment,
//!     };
//!
//!     match generate(&terms, Some(&prepayment)) {
//!         Ok(schedule) => {
//!             let summary = ScheduleSummary::from_schedule(&schedule);
//!             println!("Monthly payment: {:.2}", summary.first_payment);
//!             println!("Total interest:  {:.2}", summary.total_interest);
//!             println!("Months:          {}", summary.period_count);
//!         }
//!         Err(e) => {
//!             eprintln!("Error generating schedule: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod payment;
pub mod schedule;
pub mod summary;
pub mod types;

pub use config::{CalculatorConfig, LogLevel};
pub use error::{ScheduleError, ScheduleResult};
pub use payment::{compute_payment, monthly_rate, round_money};
pub use schedule::{
    DEFAULT_BALANCE_EPSILON, DEFAULT_MAX_PERIODS, ScheduleGenerator, ScheduleLimits, generate,
};
pub use summary::ScheduleSummary;
pub use types::{
    CalculationRequest, LoanTerms, Money, PrepaymentEvent, PrepaymentStrategy, Schedule,
    ScheduleRow,
};
