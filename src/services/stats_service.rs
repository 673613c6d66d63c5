//! Statistics rollups.
//!
//! Numbers are recomputed on every call; counting happens in the
//! database and this layer only fans the queries out and arranges the
//! results into the month's buckets.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::domain::{CurrentUser, Permission};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{StatsRepository, StatusCount, TimeRange};

use super::container::parallel;

/// Counts for one entity family.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntityBreakdown {
    pub total: i64,
    pub by_status: Vec<StatusCount>,
    pub buckets: BucketCounts,
}

/// How many rows were created in each slice of the current month.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BucketCounts {
    pub today: i64,
    pub week1: i64,
    pub week2: i64,
    pub week3: i64,
    pub week4: i64,
    pub month: i64,
}

/// The full dashboard payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsOverview {
    pub reports: EntityBreakdown,
    pub service_orders: EntityBreakdown,
    pub customer_orders: EntityBreakdown,
    pub applications: EntityBreakdown,
    pub partnerships: EntityBreakdown,
    pub agent_requests: EntityBreakdown,
    pub users: u64,
    pub feedback: u64,
}

#[async_trait]
pub trait StatsService: Send + Sync {
    /// Dashboard numbers, scoped to the caller's geography.
    async fn overview(&self, actor: &CurrentUser) -> AppResult<StatsOverview>;
}

/// The month's reporting slices as closed time ranges.
#[derive(Debug, Clone, Copy)]
struct MonthBuckets {
    today: TimeRange,
    weeks: [TimeRange; 4],
    month: TimeRange,
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default())
}

fn closed_range(first: NaiveDate, last: NaiveDate) -> TimeRange {
    TimeRange {
        start: day_start(first),
        end: day_end(last),
    }
}

impl MonthBuckets {
    /// Slice the month containing `now`: today, the four week-long
    /// blocks (1-7, 8-14, 15-21, 22-end) and the month as a whole.
    fn containing(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let first = today.with_day(1).unwrap_or(today);
        let next_month = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        };
        let last = next_month
            .map(|d| d - Duration::days(1))
            .unwrap_or(today);

        let week_last = |n: u32| {
            first
                .with_day(n)
                .map(|d| d.min(last))
                .unwrap_or(last)
        };
        let week_first = |n: u32| first.with_day(n).unwrap_or(first);

        Self {
            today: closed_range(today, today),
            weeks: [
                closed_range(first, week_last(7)),
                closed_range(week_first(8), week_last(14)),
                closed_range(week_first(15), week_last(21)),
                closed_range(week_first(22), last),
            ],
            month: closed_range(first, last),
        }
    }
}

fn sum(counts: &[StatusCount]) -> i64 {
    counts.iter().map(|c| c.count).sum()
}

/// Concrete implementation of [`StatsService`].
pub struct StatsRoom {
    stats: Arc<dyn StatsRepository>,
}

impl StatsRoom {
    pub fn new(stats: Arc<dyn StatsRepository>) -> Self {
        Self { stats }
    }

    /// Run the seven count queries for one family and fold the results.
    async fn breakdown<F, Fut>(fetch: F, buckets: MonthBuckets) -> AppResult<EntityBreakdown>
    where
        F: Fn(Option<TimeRange>) -> Fut,
        Fut: Future<Output = AppResult<Vec<StatusCount>>>,
    {
        let (by_status, today, month) = parallel::join3(
            fetch(None),
            fetch(Some(buckets.today)),
            fetch(Some(buckets.month)),
        )
        .await?;

        let weeks =
            parallel::join_all(buckets.weeks.iter().map(|w| fetch(Some(*w))).collect()).await?;

        Ok(EntityBreakdown {
            total: sum(&by_status),
            by_status,
            buckets: BucketCounts {
                today: sum(&today),
                week1: sum(&weeks[0]),
                week2: sum(&weeks[1]),
                week3: sum(&weeks[2]),
                week4: sum(&weeks[3]),
                month: sum(&month),
            },
        })
    }
}

#[async_trait]
impl StatsService for StatsRoom {
    async fn overview(&self, actor: &CurrentUser) -> AppResult<StatsOverview> {
        if !actor.allows(Permission::ViewStatistics) {
            return Err(AppError::forbidden("You may not view statistics"));
        }

        let scope = actor.scope();
        let buckets = MonthBuckets::containing(Utc::now());

        let (reports, service_orders, customer_orders) = parallel::join3(
            Self::breakdown(|r| self.stats.report_counts(scope, r), buckets),
            Self::breakdown(|r| self.stats.service_order_counts(scope, r), buckets),
            Self::breakdown(|r| self.stats.customer_order_counts(scope, r), buckets),
        )
        .await?;

        let (applications, partnerships, agent_requests) = parallel::join3(
            Self::breakdown(|r| self.stats.application_counts(scope, r), buckets),
            Self::breakdown(|r| self.stats.partnership_counts(scope, r), buckets),
            Self::breakdown(|r| self.stats.agent_request_counts(scope, r), buckets),
        )
        .await?;

        let (users, feedback) =
            parallel::join2(self.stats.user_count(None), self.stats.feedback_count(None)).await?;

        Ok(StatsOverview {
            reports,
            service_orders,
            customer_orders,
            applications,
            partnerships,
            agent_requests,
            users,
            feedback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_cover_a_thirty_one_day_month() {
        let now = Utc.with_ymd_and_hms(2024, 3, 18, 10, 30, 0).unwrap();
        let buckets = MonthBuckets::containing(now);

        assert_eq!(buckets.month.start, day_start(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert_eq!(buckets.month.end, day_end(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert_eq!(
            buckets.weeks[3].end,
            day_end(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
        );
        assert_eq!(
            buckets.weeks[0].end,
            day_end(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap())
        );
    }

    #[test]
    fn last_bucket_shrinks_in_february() {
        let now = Utc.with_ymd_and_hms(2023, 2, 10, 0, 0, 0).unwrap();
        let buckets = MonthBuckets::containing(now);

        assert_eq!(
            buckets.weeks[3].start,
            day_start(NaiveDate::from_ymd_opt(2023, 2, 22).unwrap())
        );
        assert_eq!(
            buckets.weeks[3].end,
            day_end(NaiveDate::from_ymd_opt(2023, 2, 28).unwrap())
        );
        assert_eq!(buckets.month.end, buckets.weeks[3].end);
    }

    #[test]
    fn today_is_a_single_day_range() {
        let now = Utc.with_ymd_and_hms(2024, 7, 5, 23, 0, 0).unwrap();
        let buckets = MonthBuckets::containing(now);

        assert_eq!(buckets.today.start, day_start(NaiveDate::from_ymd_opt(2024, 7, 5).unwrap()));
        assert_eq!(buckets.today.end, day_end(NaiveDate::from_ymd_opt(2024, 7, 5).unwrap()));
    }
}
