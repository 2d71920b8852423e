// src/render/metrics.rs

//! Per-repository lag metrics and their heat-map colors.

use chrono::{DateTime, Utc};

use crate::models::RepositorySnapshot;

/// Derived numbers shown for each repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoMetrics {
    pub commit_count: usize,
    /// Whole days between the release and the newest unreleased commit
    pub days_behind: i64,
    /// Whole days between the release and `now`
    pub days_since_release: i64,
}

impl RepoMetrics {
    /// Compute metrics; relies on commits being stored newest first.
    pub fn compute(snapshot: &RepositorySnapshot, now: DateTime<Utc>) -> Self {
        let days_behind = snapshot
            .newest_commit()
            .map_or(0, |c| (c.timestamp - snapshot.latest_release_time).num_days());

        Self {
            commit_count: snapshot.commit_count(),
            days_behind,
            days_since_release: (now - snapshot.latest_release_time).num_days(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

const GREEN: Rgb = Rgb(16, 185, 129);
const YELLOW: Rgb = Rgb(251, 191, 36);
const RED: Rgb = Rgb(239, 68, 68);

fn interpolate(from: Rgb, to: Rgb, factor: f64) -> Rgb {
    let channel = |a: u8, b: u8| {
        let value = f64::from(a) + factor * (f64::from(b) - f64::from(a));
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgb(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

/// Background color on a green → yellow → red scale for a value in 0..=1.
pub fn background_color(normalized: f64) -> String {
    let normalized = normalized.clamp(0.0, 1.0);
    let Rgb(r, g, b) = if normalized < 0.5 {
        interpolate(GREEN, YELLOW, normalized * 2.0)
    } else {
        interpolate(YELLOW, RED, (normalized - 0.5) * 2.0)
    };
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Readable text color for [`background_color`] of the same value.
pub fn text_color(normalized: f64) -> &'static str {
    if normalized > 0.6 { "#ffffff" } else { "#000000" }
}

/// Min–max range of one metric across all repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub min: i64,
    pub max: i64,
}

impl Scale {
    /// Range of the given values; `0..0` when there are none.
    pub fn of(values: impl IntoIterator<Item = i64>) -> Self {
        values
            .into_iter()
            .fold(None, |acc: Option<Self>, v| {
                Some(match acc {
                    None => Self { min: v, max: v },
                    Some(s) => Self {
                        min: s.min.min(v),
                        max: s.max.max(v),
                    },
                })
            })
            .unwrap_or(Self { min: 0, max: 0 })
    }

    /// Position of `value` within the range; 0 when the range is empty.
    pub fn normalize(&self, value: i64) -> f64 {
        let range = self.max - self.min;
        if range > 0 {
            (value - self.min) as f64 / range as f64
        } else {
            0.0
        }
    }

    /// Background and text colors for `value`.
    pub fn colors(&self, value: i64) -> (String, &'static str) {
        let normalized = self.normalize(value);
        (background_color(normalized), text_color(normalized))
    }
}
