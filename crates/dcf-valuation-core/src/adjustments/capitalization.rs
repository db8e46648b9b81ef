use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time_value::{average, round_money};
use crate::types::Money;

use super::schedule::ExpenseScheduleEntry;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How a populated amount of exactly zero is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroAmountPolicy {
    /// Zero is dropped like a missing value and does not count as a period.
    #[default]
    TreatAsMissing,
    /// Zero is a real expense and occupies a period in the averaging window.
    Include,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalizationOptions {
    /// Cap on the number of historical periods amortized. `None` (or 0) uses all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amortizable_life: Option<u32>,
    #[serde(default)]
    pub zero_amounts: ZeroAmountPolicy,
}

/// Result of capitalizing an expense stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalizationResult {
    /// Current expense minus amortization: the amount added back to EBIT.
    pub adjusted_operating_income: Money,
    /// Value of the capitalized asset not yet amortized.
    pub unamortized_asset: Money,
    pub amortization: Money,
    pub current_expense: Money,
    /// Number of schedule rows that entered the calculation (0 when skipped).
    pub periods_used: usize,
}

impl CapitalizationResult {
    pub fn is_empty(&self) -> bool {
        self.periods_used == 0
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Capitalize an expense stream into an asset.
///
/// After dropping missing and non-positive amounts, the first remaining
/// amount is the current expense and the rest are historical. Amortization is
/// the historical average; the unamortized asset weights each period
/// `1 - i/(n-1)`, from full weight for the current period down to zero for
/// the oldest. Fewer than two usable amounts yields an all-zero result.
pub fn capitalize(
    expenses: &[ExpenseScheduleEntry],
    options: &CapitalizationOptions,
) -> CapitalizationResult {
    let mut amounts = usable_amounts(expenses, options.zero_amounts);

    if let Some(life) = options.amortizable_life.filter(|l| *l > 0) {
        amounts.truncate(life as usize + 1);
    }

    if amounts.len() < 2 {
        log::debug!(
            "capitalization skipped: {} usable amount(s) of {} rows",
            amounts.len(),
            expenses.len()
        );
        return CapitalizationResult::default();
    }

    let current = amounts[0];
    let historical = &amounts[1..];
    let amortization = average(historical);
    let adjusted_operating_income = current - amortization;

    let fraction = Decimal::ONE / Decimal::from(historical.len() as u64);
    let unamortized: Money = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| amount * (Decimal::ONE - Decimal::from(i as u64) * fraction))
        .sum();

    CapitalizationResult {
        adjusted_operating_income: round_money(adjusted_operating_income),
        unamortized_asset: round_money(unamortized),
        amortization: round_money(amortization),
        current_expense: current,
        periods_used: amounts.len(),
    }
}

fn usable_amounts(expenses: &[ExpenseScheduleEntry], zeros: ZeroAmountPolicy) -> Vec<Money> {
    expenses
        .iter()
        .filter_map(|e| e.amount)
        .filter(|a| match zeros {
            ZeroAmountPolicy::TreatAsMissing => *a > Decimal::ZERO,
            ZeroAmountPolicy::Include => *a >= Decimal::ZERO,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjustments::schedule::rnd_schedule_from_amounts;
    use rust_decimal_macros::dec;

    fn schedule(amounts: &[Option<Money>]) -> Vec<ExpenseScheduleEntry> {
        rnd_schedule_from_amounts(amounts)
    }

    #[test]
    fn test_three_period_stream() {
        let s = schedule(&[Some(dec!(500)), Some(dec!(400)), Some(dec!(300))]);
        let r = capitalize(&s, &CapitalizationOptions::default());
        assert_eq!(r.amortization, dec!(350));
        assert_eq!(r.adjusted_operating_income, dec!(150));
        assert_eq!(r.unamortized_asset, dec!(700.00));
        assert_eq!(r.periods_used, 3);
    }

    #[test]
    fn test_two_periods_oldest_weight_zero() {
        let s = schedule(&[Some(dec!(120)), Some(dec!(100))]);
        let r = capitalize(&s, &CapitalizationOptions::default());
        assert_eq!(r.adjusted_operating_income, dec!(20));
        assert_eq!(r.unamortized_asset, dec!(120));
    }

    #[test]
    fn test_insufficient_data_returns_zeros() {
        let opts = CapitalizationOptions::default();
        assert_eq!(capitalize(&[], &opts), CapitalizationResult::default());
        let one = schedule(&[Some(dec!(500)), None]);
        let r = capitalize(&one, &opts);
        assert_eq!(r.adjusted_operating_income, Decimal::ZERO);
        assert_eq!(r.unamortized_asset, Decimal::ZERO);
        assert!(r.is_empty());
    }

    #[test]
    fn test_missing_current_year_shifts_window() {
        let s = schedule(&[None, Some(dec!(400)), Some(dec!(300))]);
        let r = capitalize(&s, &CapitalizationOptions::default());
        assert_eq!(r.current_expense, dec!(400));
        assert_eq!(r.adjusted_operating_income, dec!(100));
        assert_eq!(r.unamortized_asset, dec!(400));
    }

    #[test]
    fn test_zero_policy() {
        let s = schedule(&[Some(dec!(500)), Some(dec!(0)), Some(dec!(300))]);

        let dropped = capitalize(&s, &CapitalizationOptions::default());
        assert_eq!(dropped.amortization, dec!(300));
        assert_eq!(dropped.periods_used, 2);

        let opts = CapitalizationOptions {
            zero_amounts: ZeroAmountPolicy::Include,
            ..Default::default()
        };
        let kept = capitalize(&s, &opts);
        assert_eq!(kept.amortization, dec!(150));
        assert_eq!(kept.adjusted_operating_income, dec!(350));
        // 500*1 + 0*0.5 + 300*0
        assert_eq!(kept.unamortized_asset, dec!(500));
    }

    #[test]
    fn test_amortizable_life_caps_history() {
        let s = schedule(&[
            Some(dec!(500)),
            Some(dec!(400)),
            Some(dec!(300)),
            Some(dec!(200)),
        ]);
        let opts = CapitalizationOptions {
            amortizable_life: Some(2),
            ..Default::default()
        };
        let r = capitalize(&s, &opts);
        assert_eq!(r.periods_used, 3);
        assert_eq!(r.amortization, dec!(350));
    }

    #[test]
    fn test_rounding_to_cents() {
        let s = schedule(&[Some(dec!(100)), Some(dec!(10)), Some(dec!(10)), Some(dec!(11))]);
        let r = capitalize(&s, &CapitalizationOptions::default());
        // amortization = 31/3 = 10.333..
        assert_eq!(r.amortization, dec!(10.33));
        assert_eq!(r.adjusted_operating_income, dec!(89.67));
    }

    #[test]
    fn test_idempotent() {
        let s = schedule(&[Some(dec!(230)), Some(dec!(45)), Some(dec!(900)), Some(dec!(599))]);
        let opts = CapitalizationOptions::default();
        assert_eq!(capitalize(&s, &opts), capitalize(&s, &opts));
    }
}
