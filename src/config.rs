use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::compare::MetricOrientation;
use crate::headers::HeaderVocabulary;

pub const CONFIG_ENV: &str = "MATCH_REPORT_CONFIG";
pub const TEAM_ENV: &str = "MATCH_REPORT_TEAM";
pub const DATE_ENV: &str = "MATCH_REPORT_DATE";

pub const ANALYSIS_COLUMNS: &[&str] = &[
    "xG", "Shots", "Shots on target", "Shots on target%", "Passes", "Passes accurate",
    "Passes accurate%", "Possession, %", "Losses", "Losses Low", "Losses Medium", "Losses High",
    "Recoveries", "Recoveries Low", "Recoveries Medium", "Recoveries High", "Duels", "Duels won",
    "Duels won%", "Shots from outside penalty area", "Shots from outside penalty area on target",
    "Shots from outside penalty area on target%", "Positional attacks",
    "Positional attacks with shots", "Positional attacks with shots%", "Counterattacks",
    "Counterattacks with shots", "Counterattacks with shots%", "Set pieces",
    "Set pieces with shots", "Set pieces with shots%", "Corners", "Corners with shots",
    "Corners with shots%", "Free kicks", "Free kicks with shots", "Free kicks with shots%",
    "Penalties", "Penalties converted", "Penalties converted%", "Crosses", "Crosses accurate",
    "Crosses accurate%", "Deep completed crosses", "Deep completed passes",
    "Penalty area entries (runs", "Penalty area entries runs", "Penalty area entries crosses",
    "Touches in penalty area", "Offensive duels", "Offensive duels won", "Offensive duels won%",
    "Offsides", "Conceded goals", "Shots against", "Shots against on target",
    "Shots against on target%", "Defensive duels", "Defensive duels won", "Defensive duels won%",
    "Aerial duels", "Aerial duels won", "Aerial duels won%", "Sliding tackles",
    "Sliding tackles successful", "Sliding tackles successful%", "Interceptions", "Clearances",
    "Fouls", "Yellow cards", "Red cards", "Forward passes", "Forward passes accurate",
    "Forward passes accurate%", "Back passes", "Back passes accurate", "Back passes accurate%",
    "Lateral passes", "Lateral passes accurate", "Lateral passes accurate%", "Long passes",
    "Long passes accurate", "Long passes accurate%", "Passes to final third",
    "Passes to final third accurate", "Passes to final third accurate%", "Progressive passes",
    "Progressive passes accurate", "Progressive passes accurate%", "Smart passes",
    "Smart passes accurate", "Smart passes accurate%", "Throw ins", "Throw ins accurate",
    "Throw ins accurate%", "Goal kicks", "Match tempo", "Average passes per possession",
    "Long pass %", "Average shot distance", "Average pass length", "PPDA",
];

const KEY_COMPARISON_METRICS: &[&str] = &[
    "xG", "Goals", "Shots on target", "Average shot distance", "Conceded goals",
    "Shots against on target", "Possession, %", "Passes accurate%", "PPDA", "Duels won%",
    "Long passes", "Long passes accurate%", "Long pass %",
];

const KEY_STAT_METRICS: &[&str] = &[
    "xG", "PPDA", "Possession, %", "Match tempo", "Average pass length", "Average shot distance",
    "Goals", "Shots on target", "Long passes", "Long passes accurate%", "Long pass %",
];

const ATTACK_METRICS: &[&str] = &["xG", "Shots on target", "Possession, %", "Match tempo", "Long passes"];

const DEFENSE_METRICS: &[&str] = &[
    "Conceded goals", "Shots against", "Shots against on target", "PPDA", "Defensive duels won%",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub team_name: String,
    pub match_date: NaiveDate,
    pub comparison_dates: Vec<NaiveDate>,
    pub round_label: String,
    /// Arranged history of the team's matches, season averages in rows 0-1.
    pub history_csv: PathBuf,
    /// Raw round exports, one per match, used for cross-team rankings.
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    pub workbook_path: Option<PathBuf>,
    pub analysis_columns: Vec<String>,
    pub key_comparison_metrics: Vec<String>,
    pub key_stat_metrics: Vec<String>,
    pub attack_metrics: Vec<String>,
    pub defense_metrics: Vec<String>,
    pub top_n: usize,
    pub z_threshold: f64,
    pub vocabulary: HeaderVocabulary,
    pub win_orientation: MetricOrientation,
    pub key_stat_orientation: MetricOrientation,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            team_name: "Yokohama F. Marinos".to_string(),
            match_date: NaiveDate::from_ymd_opt(2025, 5, 21).unwrap_or(NaiveDate::MIN),
            comparison_dates: [(2025, 5, 24), (2025, 5, 25)]
                .iter()
                .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
                .collect(),
            round_label: "Round X".to_string(),
            history_csv: PathBuf::from("input/Team-Stats-Yokohama-F.-Marinos_arranged.csv"),
            input_dir: PathBuf::from("input/rounds"),
            output_path: PathBuf::from("output/Yokohama-F_gpt_prompt.md"),
            workbook_path: None,
            analysis_columns: strings(ANALYSIS_COLUMNS),
            key_comparison_metrics: strings(KEY_COMPARISON_METRICS),
            key_stat_metrics: strings(KEY_STAT_METRICS),
            attack_metrics: strings(ATTACK_METRICS),
            defense_metrics: strings(DEFENSE_METRICS),
            top_n: 5,
            z_threshold: 1.5,
            vocabulary: HeaderVocabulary::default(),
            win_orientation: MetricOrientation::win_pattern_default(),
            key_stat_orientation: MetricOrientation::key_stats_default(),
        }
    }
}

impl ReportConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid report config json")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read report config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("load report config {}", path.display()))
    }

    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let mut cfg = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(team) = std::env::var(TEAM_ENV)
            && !team.trim().is_empty()
        {
            self.team_name = team.trim().to_string();
        }
        if let Ok(raw) = std::env::var(DATE_ENV)
            && !raw.trim().is_empty()
        {
            self.match_date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|err| anyhow!("{DATE_ENV}={raw}: {err}"))?;
        }
        Ok(())
    }
}
