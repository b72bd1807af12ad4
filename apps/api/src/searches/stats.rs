//! History breakdown and admin dashboard figures, computed in memory from rows.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::analysis::classifier::Category;
use crate::analysis::report::average_viability;
use crate::models::search::SearchRow;

const HIGH_VIABILITY: i64 = 75;
const MEDIUM_VIABILITY: i64 = 50;
const MONTH_DAYS: i64 = 30;
const WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: usize,
    pub percentage: i64,
}

/// Per-category totals for one user's history, largest first (ties by label).
pub fn category_breakdown(rows: &[SearchRow]) -> Vec<CategoryShare> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *totals.entry(row.category.as_str()).or_default() += 1;
    }

    let all = rows.len();
    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, total)| CategoryShare {
            category: category.to_string(),
            total,
            percentage: (total as f64 / all as f64 * 100.0).round_ties_even() as i64,
        })
        .collect();
    shares.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    shares
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub slug: &'static str,
    pub label: &'static str,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCount {
    /// `dd/mm`
    pub date: String,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViabilityDistribution {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_searches: usize,
    pub total_users: i64,
    pub active_users: usize,
    pub searches_last_30_days: usize,
    pub users_last_30_days: usize,
    pub searches_by_category: Vec<CategoryCount>,
    pub daily_counts: Vec<DailyCount>,
    pub average_viability: f64,
    pub viability_distribution: ViabilityDistribution,
    pub conversion_rate: f64,
}

pub fn compute_dashboard(rows: &[SearchRow], total_users: i64, now: DateTime<Utc>) -> Dashboard {
    let month_ago = now - Duration::days(MONTH_DAYS);
    let last_month: Vec<&SearchRow> = rows.iter().filter(|r| r.created_at >= month_ago).collect();

    let searches_by_category = Category::ALL
        .into_iter()
        .map(|category| CategoryCount {
            slug: category.slug(),
            label: category.label(),
            total: rows.iter().filter(|r| r.category == category.label()).count(),
        })
        .collect();

    let with_result = rows.iter().filter(|r| r.result.is_some()).count();
    let scores: Vec<i64> = rows
        .iter()
        .filter_map(|r| r.result.as_ref().and_then(average_viability))
        .collect();

    Dashboard {
        total_searches: rows.len(),
        total_users,
        active_users: distinct_users(rows.iter()),
        searches_last_30_days: last_month.len(),
        users_last_30_days: distinct_users(last_month.iter().copied()),
        searches_by_category,
        daily_counts: daily_counts(rows, now),
        average_viability: if scores.is_empty() {
            0.0
        } else {
            round1(scores.iter().sum::<i64>() as f64 / scores.len() as f64)
        },
        viability_distribution: viability_distribution(&scores),
        conversion_rate: percent(with_result, rows.len()),
    }
}

fn distinct_users<'a>(rows: impl Iterator<Item = &'a SearchRow>) -> usize {
    rows.map(|r| r.user_id).collect::<HashSet<_>>().len()
}

/// One entry per calendar day (UTC), oldest first, today last, zero-filled.
pub fn daily_counts(rows: &[SearchRow], now: DateTime<Utc>) -> Vec<DailyCount> {
    let today = now.date_naive();
    (0..WEEK_DAYS)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            DailyCount {
                date: day.format("%d/%m").to_string(),
                total: rows
                    .iter()
                    .filter(|r| r.created_at.date_naive() == day)
                    .count(),
            }
        })
        .collect()
}

pub fn viability_distribution(scores: &[i64]) -> ViabilityDistribution {
    let high = scores.iter().filter(|&&s| s >= HIGH_VIABILITY).count();
    let medium = scores
        .iter()
        .filter(|&&s| (MEDIUM_VIABILITY..HIGH_VIABILITY).contains(&s))
        .count();
    let low = scores.len() - high - medium;
    ViabilityDistribution {
        high: percent(high, scores.len()),
        medium: percent(medium, scores.len()),
        low: percent(low, scores.len()),
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
