use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Metrics where a lower value is the favourable one. Only the arrow shown
/// next to a difference changes; the difference itself keeps its sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricOrientation {
    lower_is_better: BTreeSet<String>,
}

impl MetricOrientation {
    pub fn new<I, S>(metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lower_is_better: metrics.into_iter().map(Into::into).collect(),
        }
    }

    pub fn win_pattern_default() -> Self {
        Self::new(["PPDA", "Match tempo", "Average shot distance", "Shots against on target"])
    }

    pub fn key_stats_default() -> Self {
        Self::new(["PPDA", "Match tempo", "Average shot distance"])
    }

    pub fn is_reversed(&self, metric: &str) -> bool {
        self.lower_is_better.contains(metric)
    }

    pub fn arrow(&self, metric: &str, diff: f64) -> Arrow {
        let arrow = Arrow::from_diff(diff);
        if self.is_reversed(metric) {
            arrow.flipped()
        } else {
            arrow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
    Flat,
}

impl Arrow {
    pub fn from_diff(diff: f64) -> Self {
        if diff > 0.0 {
            Arrow::Up
        } else if diff < 0.0 {
            Arrow::Down
        } else {
            Arrow::Flat
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Arrow::Up => Arrow::Down,
            Arrow::Down => Arrow::Up,
            Arrow::Flat => Arrow::Flat,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Arrow::Up => "🔼",
            Arrow::Down => "🔽",
            Arrow::Flat => "→",
        }
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

pub fn signed_diff(arrow: Arrow, diff: f64) -> String {
    format!("{arrow} {diff:+.2}")
}
