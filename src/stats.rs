use crate::models::{CycleStat, CycleStats, PeriodRecord};

/// Per-cycle lengths in chronological order. `history` is newest-first, like
/// everywhere else; the newest cycle has no length yet and an open period
/// has no period length, so neither contributes to the averages.
pub fn cycle_stats(history: &[PeriodRecord]) -> CycleStats {
    let chronological: Vec<&PeriodRecord> = history.iter().rev().collect();

    let mut total_period = 0;
    let mut period_count = 0;
    let mut total_cycle = 0;
    let mut cycle_count = 0;
    let mut stats = Vec::with_capacity(chronological.len());

    for (i, record) in chronological.iter().enumerate() {
        let start = record.start_date.date_naive();

        let period_length = record
            .end_date
            .map(|end| (end.date_naive() - start).num_days() + 1);
        let cycle_length = chronological
            .get(i + 1)
            .map(|next| (next.start_date.date_naive() - start).num_days());

        if let Some(days) = period_length {
            total_period += days;
            period_count += 1;
        }
        if let Some(days) = cycle_length {
            total_cycle += days;
            cycle_count += 1;
        }

        stats.push(CycleStat {
            cycle_number: (i + 1) as i32,
            start_date: record.start_date,
            period_length,
            cycle_length,
        });
    }

    CycleStats {
        average_period_length: mean(total_period, period_count),
        average_cycle_length: mean(total_cycle, cycle_count),
        cycle_stats: stats,
    }
}

fn mean(total: i64, count: i64) -> Option<f64> {
    (count > 0).then(|| total as f64 / count as f64)
}
