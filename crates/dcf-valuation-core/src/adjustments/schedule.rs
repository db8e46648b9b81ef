use serde::{Deserialize, Serialize};

use crate::types::Money;

/// One row of an R&D or lease expense table. Index 0 is the most recent period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseScheduleEntry {
    pub period: String,
    /// `None` means "not provided", distinct from a real zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
}

impl ExpenseScheduleEntry {
    pub fn new(period: impl Into<String>, amount: Option<Money>) -> Self {
        Self {
            period: period.into(),
            amount,
        }
    }
}

/// Build a schedule from bare amounts using R&D labels.
pub fn rnd_schedule_from_amounts(amounts: &[Option<Money>]) -> Vec<ExpenseScheduleEntry> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, a)| ExpenseScheduleEntry::new(rnd_period_label(i), *a))
        .collect()
}

// ---------------------------------------------------------------------------
// R&D schedule: "Current Year", "1 year(s) before", "2 year(s) before", ...
// ---------------------------------------------------------------------------

pub fn rnd_period_label(index: usize) -> String {
    if index == 0 {
        "Current Year".to_string()
    } else {
        format!("{index} year(s) before")
    }
}

pub fn default_rnd_schedule() -> Vec<ExpenseScheduleEntry> {
    rnd_schedule_from_amounts(&[None, None])
}

pub fn add_rnd_period(schedule: &mut Vec<ExpenseScheduleEntry>) {
    schedule.push(ExpenseScheduleEntry::new(rnd_period_label(schedule.len()), None));
}

/// Remove a row and relabel the rest. The last remaining row is never removed.
pub fn remove_rnd_period(schedule: &mut Vec<ExpenseScheduleEntry>, index: usize) -> bool {
    if schedule.len() <= 1 || index >= schedule.len() {
        return false;
    }
    schedule.remove(index);
    for (i, entry) in schedule.iter_mut().enumerate() {
        entry.period = rnd_period_label(i);
    }
    true
}

// ---------------------------------------------------------------------------
// Lease schedule: "Next year", "Year 2", ..., "Year N & Above"
// ---------------------------------------------------------------------------

fn lease_period_label(index: usize, len: usize) -> String {
    if index == 0 {
        "Next year".to_string()
    } else if index == len - 1 {
        format!("Year {} & Above", index + 1)
    } else {
        format!("Year {}", index + 1)
    }
}

fn relabel_lease(schedule: &mut [ExpenseScheduleEntry]) {
    let len = schedule.len();
    for (i, entry) in schedule.iter_mut().enumerate() {
        entry.period = lease_period_label(i, len);
    }
}

pub fn default_lease_schedule() -> Vec<ExpenseScheduleEntry> {
    let mut schedule = vec![
        ExpenseScheduleEntry::new("", None),
        ExpenseScheduleEntry::new("", None),
    ];
    relabel_lease(&mut schedule);
    schedule
}

/// Insert a new year just before the open-ended final row, which keeps its amount.
pub fn add_lease_period(schedule: &mut Vec<ExpenseScheduleEntry>) {
    let insert_at = schedule.len().saturating_sub(1);
    schedule.insert(insert_at, ExpenseScheduleEntry::new("", None));
    relabel_lease(schedule);
}

/// The first and the open-ended last row are fixed; a two-row table cannot shrink.
pub fn remove_lease_period(schedule: &mut Vec<ExpenseScheduleEntry>, index: usize) -> bool {
    if schedule.len() <= 2 || index == 0 || index >= schedule.len() - 1 {
        return false;
    }
    schedule.remove(index);
    relabel_lease(schedule);
    true
}

/// Build a lease schedule from bare amounts. Short lists are padded to two rows.
pub fn lease_schedule_from_amounts(amounts: &[Option<Money>]) -> Vec<ExpenseScheduleEntry> {
    let mut schedule: Vec<ExpenseScheduleEntry> = amounts
        .iter()
        .map(|a| ExpenseScheduleEntry::new("", *a))
        .collect();
    while schedule.len() < 2 {
        schedule.push(ExpenseScheduleEntry::new("", None));
    }
    relabel_lease(&mut schedule);
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn labels(s: &[ExpenseScheduleEntry]) -> Vec<&str> {
        s.iter().map(|e| e.period.as_str()).collect()
    }

    #[test]
    fn test_rnd_add_and_remove_relabels() {
        let mut s = default_rnd_schedule();
        add_rnd_period(&mut s);
        add_rnd_period(&mut s);
        assert_eq!(
            labels(&s),
            vec!["Current Year", "1 year(s) before", "2 year(s) before", "3 year(s) before"]
        );
        s[2].amount = Some(dec!(300));
        assert!(remove_rnd_period(&mut s, 1));
        assert_eq!(
            labels(&s),
            vec!["Current Year", "1 year(s) before", "2 year(s) before"]
        );
        assert_eq!(s[1].amount, Some(dec!(300)));
    }

    #[test]
    fn test_rnd_keeps_one_row() {
        let mut s = rnd_schedule_from_amounts(&[Some(dec!(1))]);
        assert!(!remove_rnd_period(&mut s, 0));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_lease_insert_before_open_ended_row() {
        let mut s = default_lease_schedule();
        assert_eq!(labels(&s), vec!["Next year", "Year 2 & Above"]);
        s[1].amount = Some(dec!(900));
        add_lease_period(&mut s);
        assert_eq!(labels(&s), vec!["Next year", "Year 2", "Year 3 & Above"]);
        assert_eq!(s[2].amount, Some(dec!(900)));
        assert_eq!(s[1].amount, None);
    }

    #[test]
    fn test_lease_fixed_rows_cannot_be_removed() {
        let mut s = default_lease_schedule();
        add_lease_period(&mut s);
        add_lease_period(&mut s);
        assert!(!remove_lease_period(&mut s, 0));
        assert!(!remove_lease_period(&mut s, 3));
        assert!(remove_lease_period(&mut s, 1));
        assert_eq!(labels(&s), vec!["Next year", "Year 2", "Year 3 & Above"]);
        assert!(remove_lease_period(&mut s, 1));
        assert!(!remove_lease_period(&mut s, 1));
    }

    #[test]
    fn test_lease_schedule_from_amounts() {
        let s = lease_schedule_from_amounts(&[Some(dec!(300)), Some(dec!(250)), Some(dec!(200))]);
        assert_eq!(labels(&s), vec!["Next year", "Year 2", "Year 3 & Above"]);
        assert_eq!(s[2].amount, Some(dec!(200)));

        let padded = lease_schedule_from_amounts(&[Some(dec!(100))]);
        assert_eq!(labels(&padded), vec!["Next year", "Year 2 & Above"]);
        assert_eq!(padded[1].amount, None);
    }
}
