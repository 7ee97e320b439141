use crate::models::{
    DashboardResponse, EnergyData, Entry, MonthlyGoal, RecentEntry, ScoreTone, Stats, TimePeriod,
    TrendPoint, Trends,
};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

pub const MONTHLY_GOAL_AVERAGE: f64 = 4.0;
pub const RECENT_ENTRY_COUNT: usize = 3;

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const NAIVE_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses an entry date in local wall-clock time.
///
/// Three dot-separated parts are read as `day.month.year`; anything else
/// goes through a handful of common ISO-ish layouts.
pub fn parse_entry_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split('.').collect();
    if parts.len() == 3 {
        let day = parts[0].trim().parse::<u32>().ok()?;
        let month = parts[1].trim().parse::<u32>().ok()?;
        let year = parts[2].trim().parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day).map(|date| date.and_time(NaiveTime::MIN));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Local).naive_local());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return Some(parsed.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Resolves an entry date to an instant in `tz`. Wall-clock dates that fall
/// into a DST gap move forward by an hour; ambiguous ones take the earlier.
fn entry_instant<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(parsed.with_timezone(tz));
    }
    let naive = parse_entry_date(raw)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

/// Entries dated within `[now - window, now]`, compared as instants so the
/// window is exactly `window` long across DST changes. Unparsable dates are
/// skipped.
pub fn entries_within<'a, Tz: TimeZone>(
    entries: &'a [Entry],
    window: Duration,
    now: &DateTime<Tz>,
) -> Vec<&'a Entry> {
    let start = now.clone() - window;
    let tz = now.timezone();
    entries
        .iter()
        .filter(|entry| {
            entry_instant(&entry.date, &tz)
                .map(|instant| instant >= start && instant <= *now)
                .unwrap_or(false)
        })
        .collect()
}

pub fn summarize<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Stats {
    let mut stats = Stats::default();
    let mut score_sum = 0u64;

    for entry in entries {
        match entry.score {
            4.. => stats.good += 1,
            3 => stats.neutral += 1,
            _ => stats.bad += 1,
        }
        score_sum += u64::from(entry.score);
        stats.total += 1;
    }

    if stats.total > 0 {
        stats.average = score_sum as f64 / stats.total as f64;
    }
    stats
}

pub fn build_stats_at<Tz: TimeZone>(entries: &[Entry], period: TimePeriod, now: &DateTime<Tz>) -> Stats {
    summarize(entries_within(entries, period.window(), now))
}

/// Progress towards the monthly average target. Always a 30-day window over
/// the whole entry list, independent of the selected period.
pub fn monthly_goal_at<Tz: TimeZone>(entries: &[Entry], now: &DateTime<Tz>) -> MonthlyGoal {
    let stats = summarize(entries_within(entries, TimePeriod::Month.window(), now));
    let progress = (stats.average / MONTHLY_GOAL_AVERAGE * 100.0).min(100.0);

    MonthlyGoal {
        average: stats.average,
        total: stats.total,
        target: MONTHLY_GOAL_AVERAGE,
        progress_percent: progress,
        reached: stats.average >= MONTHLY_GOAL_AVERAGE,
        remaining: (MONTHLY_GOAL_AVERAGE - stats.average).max(0.0),
    }
}

/// The last `count` entries, newest first.
pub fn recent_entries(entries: &[Entry], count: usize) -> Vec<RecentEntry> {
    entries
        .iter()
        .rev()
        .take(count)
        .map(|entry| RecentEntry {
            tone: ScoreTone::for_score(entry.score),
            entry: entry.clone(),
        })
        .collect()
}

pub fn trend_by_week(entries: &[Entry]) -> Vec<TrendPoint> {
    trend_by(entries, |entry| entry.week.as_str())
}

pub fn trend_by_month(entries: &[Entry]) -> Vec<TrendPoint> {
    trend_by(entries, |entry| entry.month.as_str())
}

fn trend_by(entries: &[Entry], label: impl Fn(&Entry) -> &str) -> Vec<TrendPoint> {
    let mut groups: Vec<(String, Vec<&Entry>)> = Vec::new();
    for entry in entries {
        let key = label(entry).trim();
        if key.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, members)) => members.push(entry),
            None => groups.push((key.to_string(), vec![entry])),
        }
    }

    groups
        .into_iter()
        .map(|(label, members)| {
            let stats = summarize(members);
            TrendPoint {
                label,
                total: stats.total,
                average: stats.average,
            }
        })
        .collect()
}

pub fn build_dashboard(data: &EnergyData, period: TimePeriod, read_only_hint: bool) -> DashboardResponse {
    build_dashboard_at(data, period, read_only_hint, &Local::now())
}

pub fn build_dashboard_at<Tz: TimeZone>(
    data: &EnergyData,
    period: TimePeriod,
    read_only_hint: bool,
    now: &DateTime<Tz>,
) -> DashboardResponse {
    let stats = build_stats_at(&data.entries, period, now);
    let overall = summarize(&data.entries);
    if overall != data.stats {
        tracing::debug!(
            server_total = data.stats.total,
            derived_total = overall.total,
            "server stats differ from derived stats, showing derived"
        );
    }

    DashboardResponse {
        period,
        stats,
        server_stats: data.stats,
        monthly_goal: monthly_goal_at(&data.entries, now),
        recent: recent_entries(&data.entries, RECENT_ENTRY_COUNT),
        trends: Trends {
            by_week: trend_by_week(&data.entries),
            by_month: trend_by_month(&data.entries),
        },
        read_only_hint,
    }
}
