//! Read-model aggregation over an in-memory snapshot of order records.
//!
//! Every function here is a pure transform of its input: no I/O, no state
//! carried between calls. Callers re-run them on each snapshot replacement.
//! Calendar dates are taken in the caller's timezone `tz`; records without a
//! timestamp never land in a day bucket.

use std::collections::HashMap;

use chrono::{Days, NaiveDate, TimeZone};
use serde::Serialize;

use crate::record::OrderRecord;

/// Short label rendered under each point of the daily charts.
const DATE_LABEL_FORMAT: &str = "%d.%m";

/// Canonical bucket key.
const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date_key: String,
    pub date_label: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub date_key: String,
    pub date_label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_revenue: f64,
    pub order_count: u64,
    /// Exactly 0.0 when `order_count` is 0.
    pub avg_order_value: f64,
    pub today_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Tiles on the orders page, computed over the whole slice passed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderKpis {
    pub count: u64,
    pub revenue: f64,
    pub completed_count: u64,
    pub pending_count: u64,
}

/// A trailing span of calendar days ending at (and including) `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: NaiveDate,
    end: NaiveDate,
    days: u32,
}

impl Window {
    /// `days == 0` yields an empty window. A start before the earliest
    /// representable date also yields an empty window.
    pub fn trailing(days: u32, end: NaiveDate) -> Self {
        let start = days
            .checked_sub(1)
            .and_then(|back| end.checked_sub_days(Days::new(u64::from(back))));
        match start {
            Some(start) => Self { start, end, days },
            None => Self {
                start: end,
                end,
                days: 0,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.days as usize
    }

    pub fn is_empty(&self) -> bool {
        self.days == 0
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        !self.is_empty() && self.start <= date && date <= self.end
    }

    /// Oldest to newest.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len())
    }

    fn bucket_index(&self, date: NaiveDate) -> Option<usize> {
        if !self.contains(date) {
            return None;
        }
        usize::try_from((date - self.start).num_days()).ok()
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_LABEL_FORMAT).to_string()
}

/// Revenue per day over the trailing `window_days` ending at `reference_date`.
///
/// Always returns exactly `window_days` entries, oldest first, zero-filled.
pub fn compute_daily_revenue<'a, I, Tz>(
    records: I,
    window_days: u32,
    reference_date: NaiveDate,
    tz: &Tz,
) -> Vec<DailyRevenue>
where
    I: IntoIterator<Item = &'a OrderRecord>,
    Tz: TimeZone,
{
    revenue_window(records, Window::trailing(window_days, reference_date), tz).0
}

/// Count, revenue and average over the same window as
/// [`compute_daily_revenue`].
pub fn compute_summary<'a, I, Tz>(
    records: I,
    window_days: u32,
    reference_date: NaiveDate,
    tz: &Tz,
) -> OrderSummary
where
    I: IntoIterator<Item = &'a OrderRecord>,
    Tz: TimeZone,
{
    revenue_window(records, Window::trailing(window_days, reference_date), tz).1
}

/// Single pass shared by the daily series and the summary, so both always
/// see the same filtered set.
fn revenue_window<'a, I, Tz>(
    records: I,
    window: Window,
    tz: &Tz,
) -> (Vec<DailyRevenue>, OrderSummary)
where
    I: IntoIterator<Item = &'a OrderRecord>,
    Tz: TimeZone,
{
    let mut series: Vec<DailyRevenue> = window
        .dates()
        .map(|date| DailyRevenue {
            date_key: date_key(date),
            date_label: date_label(date),
            revenue: 0.0,
        })
        .collect();

    let mut order_count = 0u64;
    let mut today_count = 0u64;

    for record in records {
        let Some(date) = record.local_date(tz) else {
            continue;
        };
        let Some(bucket) = window.bucket_index(date).and_then(|i| series.get_mut(i)) else {
            continue;
        };
        bucket.revenue += record.amount_value();
        order_count += 1;
        if date == window.end() {
            today_count += 1;
        }
    }

    // Summed bucket by bucket, oldest first, so the total matches the series.
    let total_revenue: f64 = series.iter().map(|d| d.revenue).sum();
    let avg_order_value = if order_count > 0 {
        total_revenue / order_count as f64
    } else {
        0.0
    };

    let summary = OrderSummary {
        total_revenue,
        order_count,
        avg_order_value,
        today_count,
    };
    (series, summary)
}

/// Orders per day over the trailing window; same shape guarantees as
/// [`compute_daily_revenue`].
pub fn compute_daily_counts<'a, I, Tz>(
    records: I,
    window_days: u32,
    reference_date: NaiveDate,
    tz: &Tz,
) -> Vec<DailyCount>
where
    I: IntoIterator<Item = &'a OrderRecord>,
    Tz: TimeZone,
{
    let window = Window::trailing(window_days, reference_date);
    let mut series: Vec<DailyCount> = window
        .dates()
        .map(|date| DailyCount {
            date_key: date_key(date),
            date_label: date_label(date),
            count: 0,
        })
        .collect();

    for record in records {
        let bucket = record
            .local_date(tz)
            .and_then(|date| window.bucket_index(date))
            .and_then(|i| series.get_mut(i));
        if let Some(bucket) = bucket {
            bucket.count += 1;
        }
    }
    series
}

/// Occurrences per normalized status, in first-seen order.
///
/// Window-agnostic: callers pre-filter (see [`filter_since`]).
pub fn compute_status_distribution<'a, I>(records: I) -> Vec<StatusCount>
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<StatusCount> = Vec::new();

    for record in records {
        let status = record.status_key();
        match index.get(&status) {
            Some(&i) => {
                if let Some(entry) = counts.get_mut(i) {
                    entry.count += 1;
                }
            }
            None => {
                index.insert(status.clone(), counts.len());
                counts.push(StatusCount { status, count: 1 });
            }
        }
    }
    counts
}

/// Most recent first, at most `limit` records.
///
/// Unknown-time records sort after every dated record; ties keep input order.
pub fn rank_recent<'a, I>(records: I, limit: usize) -> Vec<&'a OrderRecord>
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut ranked: Vec<&OrderRecord> = records.into_iter().collect();
    // `None < Some(_)`, so a descending sort puts unknown time last.
    ranked.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ranked.truncate(limit);
    ranked
}

/// Records dated on or after `reference_date - days`. Unknown-time records
/// are dropped, as the upstream time-bounded query would never return them.
pub fn filter_since<'a, I, Tz>(
    records: I,
    days: u32,
    reference_date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a OrderRecord>
where
    I: IntoIterator<Item = &'a OrderRecord>,
    Tz: TimeZone,
{
    let cutoff = reference_date
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    records
        .into_iter()
        .filter(|r| r.local_date(tz).is_some_and(|d| d >= cutoff))
        .collect()
}

pub fn compute_order_kpis<'a, I>(records: I) -> OrderKpis
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut kpis = OrderKpis {
        count: 0,
        revenue: 0.0,
        completed_count: 0,
        pending_count: 0,
    };
    for record in records {
        kpis.count += 1;
        kpis.revenue += record.amount_value();
        match record.status_key().as_str() {
            "completed" => kpis.completed_count += 1,
            "pending" => kpis.pending_count += 1,
            _ => {}
        }
    }
    kpis
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Trailing days for the revenue chart and summary tiles.
    pub window_days: u32,
    /// Trailing days fed to the status breakdown and the recent-orders table.
    pub status_window_days: u32,
    pub recent_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            window_days: 7,
            status_window_days: 30,
            recent_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView<'a> {
    pub daily_revenue: Vec<DailyRevenue>,
    pub summary: OrderSummary,
    pub status_distribution: Vec<StatusCount>,
    pub recent_orders: Vec<&'a OrderRecord>,
}

/// Everything the dashboard page renders, derived from one snapshot.
pub fn build_dashboard<'a, Tz: TimeZone>(
    records: &'a [OrderRecord],
    options: &DashboardOptions,
    reference_date: NaiveDate,
    tz: &Tz,
) -> DashboardView<'a> {
    let (daily_revenue, summary) = revenue_window(
        records,
        Window::trailing(options.window_days, reference_date),
        tz,
    );
    let recent_slice = filter_since(records, options.status_window_days, reference_date, tz);
    let status_distribution = compute_status_distribution(recent_slice.iter().copied());
    let recent_orders = rank_recent(recent_slice, options.recent_limit);

    DashboardView {
        daily_revenue,
        summary,
        status_distribution,
        recent_orders,
    }
}
