use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{ExpenseRecord, LedgerSnapshot};

const WARNING_THRESHOLD: Decimal = Decimal::from_parts(70, 0, 0, false, 0);
const CRITICAL_THRESHOLD: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

/// Traffic-light reading of how much of the budget has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetHealth {
    /// At or below 70 % of the budget.
    OnTrack,
    /// Above 70 % and at or below 90 %.
    Warning,
    /// Above 90 %, including over budget.
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
}

/// Every derived figure for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingSummary {
    pub total_spent: Decimal,
    pub remaining: Decimal,
    pub spending_percentage: Decimal,
    pub progress_fill: Decimal,
    pub health: BudgetHealth,
    pub categories: Vec<CategoryTotal>,
}

/// Stateless derivations over a [`LedgerSnapshot`].
pub struct SummaryService;

impl SummaryService {
    pub fn total_spent(snapshot: &LedgerSnapshot) -> Decimal {
        sum_amounts(snapshot.records())
    }

    /// Budget minus spending; negative once over budget.
    pub fn remaining_budget(snapshot: &LedgerSnapshot) -> Decimal {
        snapshot
            .budget()
            .saturating_sub(Self::total_spent(snapshot))
    }

    /// Share of the budget spent, in percent. A zero budget always reads as 0.
    pub fn spending_percentage(snapshot: &LedgerSnapshot) -> Decimal {
        let budget = snapshot.budget();
        if budget.is_zero() {
            return Decimal::ZERO;
        }
        let spent = Self::total_spent(snapshot);
        spent
            .checked_div(budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX)
    }

    pub fn expenses_by_category<'a>(
        snapshot: &'a LedgerSnapshot,
        category: &str,
    ) -> Vec<&'a ExpenseRecord> {
        snapshot
            .records()
            .iter()
            .filter(|record| record.category == category)
            .collect()
    }

    pub fn category_total(snapshot: &LedgerSnapshot, category: &str) -> Decimal {
        Self::expenses_by_category(snapshot, category)
            .into_iter()
            .fold(Decimal::ZERO, |acc, record| acc.saturating_add(record.amount))
    }

    /// Totals per category in order of first appearance.
    pub fn category_totals(snapshot: &LedgerSnapshot) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for record in snapshot.records() {
            match totals
                .iter_mut()
                .find(|entry| entry.category == record.category)
            {
                Some(entry) => {
                    entry.total = entry.total.saturating_add(record.amount);
                    entry.count += 1;
                }
                None => totals.push(CategoryTotal {
                    category: record.category.clone(),
                    total: record.amount,
                    count: 1,
                }),
            }
        }
        totals
    }

    /// Records whose description or category contains `query`, ignoring case.
    pub fn search<'a>(snapshot: &'a LedgerSnapshot, query: &str) -> Vec<&'a ExpenseRecord> {
        let needle = query.to_lowercase();
        snapshot
            .records()
            .iter()
            .filter(|record| record.matches(&needle))
            .collect()
    }

    pub fn budget_health(percentage: Decimal) -> BudgetHealth {
        if percentage > CRITICAL_THRESHOLD {
            BudgetHealth::Critical
        } else if percentage > WARNING_THRESHOLD {
            BudgetHealth::Warning
        } else {
            BudgetHealth::OnTrack
        }
    }

    /// Percentage clamped to `0..=100`, for progress indicators.
    pub fn progress_fill(percentage: Decimal) -> Decimal {
        percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    pub fn summarize(snapshot: &LedgerSnapshot) -> SpendingSummary {
        let total_spent = Self::total_spent(snapshot);
        let spending_percentage = Self::spending_percentage(snapshot);
        SpendingSummary {
            total_spent,
            remaining: snapshot.budget().saturating_sub(total_spent),
            spending_percentage,
            progress_fill: Self::progress_fill(spending_percentage),
            health: Self::budget_health(spending_percentage),
            categories: Self::category_totals(snapshot),
        }
    }
}

fn sum_amounts(records: &[ExpenseRecord]) -> Decimal {
    records
        .iter()
        .fold(Decimal::ZERO, |acc, record| acc.saturating_add(record.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RecordId;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(id: &str, description: &str, amount: Decimal, category: &str) -> ExpenseRecord {
        ExpenseRecord::new(
            RecordId::new(id),
            description,
            amount,
            category,
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        )
    }

    fn snapshot(budget: Decimal) -> LedgerSnapshot {
        LedgerSnapshot::new(
            vec![
                record("1", "Jollof rice", dec!(3500), "Food"),
                record("2", "Bus fare", dec!(1500), "Transport"),
                record("3", "Suya", dec!(2000), "Food"),
                record("4", "Data bundle", dec!(0.75), "Utilities"),
            ],
            budget,
        )
    }

    #[test]
    fn empty_snapshot_spends_nothing() {
        let empty = LedgerSnapshot::new(Vec::new(), dec!(500000));
        assert_eq!(SummaryService::total_spent(&empty), Decimal::ZERO);
        assert_eq!(SummaryService::remaining_budget(&empty), dec!(500000));
        assert_eq!(SummaryService::spending_percentage(&empty), Decimal::ZERO);
        assert!(SummaryService::category_totals(&empty).is_empty());
    }

    #[test]
    fn totals_and_remaining() {
        let snap = snapshot(dec!(10000));
        assert_eq!(SummaryService::total_spent(&snap), dec!(7000.75));
        assert_eq!(SummaryService::remaining_budget(&snap), dec!(2999.25));
    }

    #[test]
    fn remaining_goes_negative_when_over_budget() {
        let snap = snapshot(dec!(5000));
        assert_eq!(SummaryService::remaining_budget(&snap), dec!(-2000.75));
    }

    #[test]
    fn percentage_is_zero_for_zero_budget() {
        let snap = snapshot(Decimal::ZERO);
        assert_eq!(SummaryService::spending_percentage(&snap), Decimal::ZERO);
        assert_eq!(snap.summary().health, BudgetHealth::OnTrack);
    }

    #[test]
    fn percentage_of_budget() {
        let snap = LedgerSnapshot::new(vec![record("1", "Rent", dec!(250), "Housing")], dec!(1000));
        assert_eq!(SummaryService::spending_percentage(&snap), dec!(25));
    }

    #[test]
    fn category_filters_keep_ledger_order() {
        let snap = snapshot(dec!(10000));
        let food: Vec<&str> = SummaryService::expenses_by_category(&snap, "Food")
            .iter()
            .map(|record| record.id.as_str())
            .collect();
        assert_eq!(food, ["1", "3"]);
        assert_eq!(SummaryService::category_total(&snap, "Food"), dec!(5500));
        assert_eq!(SummaryService::category_total(&snap, "food"), Decimal::ZERO);
        assert_eq!(SummaryService::category_total(&snap, "Rent"), Decimal::ZERO);
    }

    #[test]
    fn category_totals_follow_first_appearance() {
        let snap = snapshot(dec!(10000));
        let totals = SummaryService::category_totals(&snap);
        let names: Vec<&str> = totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(names, ["Food", "Transport", "Utilities"]);
        assert_eq!(totals[0].total, dec!(5500));
        assert_eq!(totals[0].count, 2);
    }

    #[test]
    fn search_matches_description_or_category() {
        let snap = snapshot(dec!(10000));
        let ids = |query: &str| -> Vec<String> {
            SummaryService::search(&snap, query)
                .iter()
                .map(|record| record.id.to_string())
                .collect()
        };
        assert_eq!(ids("FOOD"), ["1", "3"]);
        assert_eq!(ids("bus"), ["2"]);
        assert_eq!(ids("a"), ["2", "3", "4"]);
        assert_eq!(ids("").len(), 4);
        assert!(ids("rent").is_empty());
    }

    #[test]
    fn health_thresholds() {
        assert_eq!(SummaryService::budget_health(dec!(70)), BudgetHealth::OnTrack);
        assert_eq!(SummaryService::budget_health(dec!(70.01)), BudgetHealth::Warning);
        assert_eq!(SummaryService::budget_health(dec!(90)), BudgetHealth::Warning);
        assert_eq!(SummaryService::budget_health(dec!(90.5)), BudgetHealth::Critical);
        assert_eq!(SummaryService::budget_health(dec!(250)), BudgetHealth::Critical);
    }

    #[test]
    fn progress_fill_is_clamped() {
        assert_eq!(SummaryService::progress_fill(dec!(140)), dec!(100));
        assert_eq!(SummaryService::progress_fill(dec!(42.5)), dec!(42.5));
    }

    #[test]
    fn summarize_bundles_every_figure() {
        let summary = SummaryService::summarize(&snapshot(dec!(8000)));
        assert_eq!(summary.total_spent, dec!(7000.75));
        assert_eq!(summary.remaining, dec!(999.25));
        assert_eq!(summary.health, BudgetHealth::Warning);
        assert_eq!(summary.categories.len(), 3);
    }
}
