//! Money helpers shared by the reports and the CLI.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

pub const MILLION: Decimal = dec!(1_000_000);
pub const BILLION: Decimal = dec!(1_000_000_000);

/// Lossy conversion for the wire. Chart payloads carry plain JSON numbers.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

pub fn to_millions(value: Decimal) -> Decimal {
    value / MILLION
}

pub fn to_billions(value: Decimal) -> Decimal {
    value / BILLION
}

/// Sums optional amounts, counting missing ones as zero.
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    amounts.into_iter().flatten().sum()
}

/// Percentage change from `original` to `current`, rounded to one decimal.
/// Returns zero when there is no positive baseline.
///
/// Halfway values round up, toward positive infinity: `12.25` becomes `12.3`
/// and `-12.25` becomes `-12.2`.
pub fn growth_percent(original: Decimal, current: Decimal) -> Decimal {
    if original <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let tenths = (current - original) / original * dec!(1_000);
    (tenths + dec!(0.5)).floor() / dec!(10)
}

/// Compact USD label: `$2.43B`, `$12.5M`, `$3.2K`, `$950`.
pub fn format_compact_usd(value: Decimal) -> String {
    let abs = value.abs();
    if abs >= BILLION {
        format!("${:.2}B", round_to(to_billions(value), 2))
    } else if abs >= MILLION {
        format!("${:.1}M", round_to(to_millions(value), 1))
    } else if abs >= dec!(1_000) {
        format!("${:.1}K", round_to(value / dec!(1_000), 1))
    } else {
        format!("${:.0}", round_to(value, 0))
    }
}

fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
