use std::io;

use anyhow::Result;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{Table, builder::Builder};

use annuity_schedule::{Schedule, ScheduleSummary, round_money};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: &'a ScheduleSummary,
    schedule: &'a Schedule,
}

pub fn write_report(
    format: &OutputFormat,
    summary: &ScheduleSummary,
    schedule: &Schedule,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            print_summary(summary);
            println!();
            print_schedule(schedule);
            Ok(())
        }
        OutputFormat::Json => {
            let report = Report { summary, schedule };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        OutputFormat::Csv => write_csv(schedule, io::stdout()),
    }
}

fn print_summary(summary: &ScheduleSummary) {
    let mut builder = Builder::default();
    builder.push_record(["Monthly payment", &format_money(summary.first_payment)]);
    builder.push_record(["Total interest", &format_money(summary.total_interest)]);
    builder.push_record(["Months", &summary.period_count.to_string()]);
    builder.push_record(["Total paid", &format_money(summary.total_paid)]);
    println!("{}", Table::from(builder));

    if summary.truncated {
        println!("\nWarning: the schedule hit the period limit before the loan was repaid.");
    }
}

fn print_schedule(schedule: &Schedule) {
    if schedule.is_empty() {
        println!("(empty)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["Month", "Payment", "Principal", "Interest", "Balance"]);
    for row in schedule {
        builder.push_record([
            row.period_index.to_string(),
            format_money(row.payment_amount),
            format_money(row.principal_portion),
            format_money(row.interest_portion),
            format_money(row.ending_balance),
        ]);
    }
    println!("{}", Table::from(builder));
}

/// Writes one CSV record per period.
fn write_csv<W: io::Write>(schedule: &Schedule, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in schedule {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Formats an amount with two decimals and comma thousands separators.
pub fn format_money(value: Decimal) -> String {
    let formatted = format!("{:.2}", round_money(value).abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !round_money(value).is_zero() { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
