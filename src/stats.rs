// ABOUTME: Dashboard aggregation over a user's cases: headline counts and six-month series
// ABOUTME: Also derives the hearing calendar (today and the coming week) from next-hearing dates

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::entities::case::{self, CaseStatus, Priority};
use crate::error::Result;
use crate::storage::Storage;
use crate::types::{CaseSummary, ChartPoint, CountPoint, HearingsResponse, StatsResponse};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const TRAILING_MONTHS: i32 = 6;
const UPCOMING_WINDOW_DAYS: i64 = 7;

/// A calendar month, `month0` counting from 0 = January.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    pub month0: u32,
}

impl MonthBucket {
    pub fn label(&self) -> &'static str {
        MONTH_LABELS[self.month0 as usize]
    }

    fn contains(&self, date: &DateTime<Utc>) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }
}

/// The six months ending with the month of `today`, oldest first.
pub fn trailing_months(today: NaiveDate) -> Vec<MonthBucket> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..TRAILING_MONTHS)
        .rev()
        .map(|back| {
            let index = current - back;
            MonthBucket {
                year: index.div_euclid(12),
                month0: index.rem_euclid(12) as u32,
            }
        })
        .collect()
}

pub fn summarize(cases: &[case::Model], total_clients: u64, today: NaiveDate) -> StatsResponse {
    let active_cases = cases.iter().filter(|c| c.status.is_active()).count() as u64;
    let pending_actions = cases
        .iter()
        .filter(|c| c.priority == Priority::High && c.status != CaseStatus::Closed)
        .count() as u64;
    // Every case counts here, closed ones included; there is no fiscal-year cut.
    let revenue_ytd: f64 = cases.iter().map(|c| c.value).sum();

    let months = trailing_months(today);
    let monthly_data = months
        .iter()
        .map(|m| CountPoint {
            name: m.label().to_string(),
            value: cases.iter().filter(|c| m.contains(&c.start_date)).count() as u64,
        })
        .collect();
    let revenue_data = months
        .iter()
        .map(|m| ChartPoint {
            name: m.label().to_string(),
            value: cases
                .iter()
                .filter(|c| m.contains(&c.start_date))
                .map(|c| c.value)
                .sum(),
        })
        .collect();

    StatsResponse {
        active_cases,
        total_clients,
        pending_actions,
        revenue_ytd,
        monthly_data,
        revenue_data,
    }
}

/// Splits cases with a next hearing into those on `now`'s date and those
/// later within the coming week. Both lists are ordered by hearing time.
pub fn hearings(cases: Vec<case::Model>, now: DateTime<Utc>) -> HearingsResponse {
    let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);
    let mut scheduled: Vec<(DateTime<Utc>, case::Model)> = cases
        .into_iter()
        .filter_map(|c| c.next_hearing.map(|at| (at, c)))
        .collect();
    scheduled.sort_by_key(|(at, _)| *at);

    let mut response = HearingsResponse {
        today: Vec::new(),
        upcoming: Vec::new(),
    };
    for (at, case) in scheduled {
        if at.date_naive() == now.date_naive() {
            response.today.push(CaseSummary::from(case.clone()));
        }
        if at > now && at < horizon {
            response.upcoming.push(CaseSummary::from(case));
        }
    }
    response
}

impl Storage {
    /// Loads the owner's cases once and reduces them in memory.
    pub async fn dashboard_stats(&self, owner: Uuid, today: NaiveDate) -> Result<StatsResponse> {
        let cases = self.list_cases(owner).await?;
        let total_clients = self.count_clients(owner).await?;
        Ok(summarize(&cases, total_clients, today))
    }

    pub async fn hearings(&self, owner: Uuid, now: DateTime<Utc>) -> Result<HearingsResponse> {
        let cases = self.list_cases(owner).await?;
        Ok(hearings(cases, now))
    }
}
