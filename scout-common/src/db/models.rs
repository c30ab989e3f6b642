//! Database models

use crate::benchmarks::MetricKind;
use crate::growth::Sex;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    pub guid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub position: Option<String>,
    pub grad_year: Option<i64>,
    pub school: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One combine testing session. Immutable once recorded; a new snapshot is
/// created per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineMetric {
    pub guid: Uuid,
    pub athlete_id: Uuid,
    pub recorded_at: NaiveDate,
    pub forty_yard: Option<f64>,
    pub ten_yard_split: Option<f64>,
    pub shuttle: Option<f64>,
    pub three_cone: Option<f64>,
    pub vertical_jump: Option<f64>,
    pub broad_jump: Option<f64>,
    pub bench_press: Option<f64>,
    pub bench_press_reps: Option<i64>,
    pub squat_max: Option<f64>,
    pub power_clean: Option<f64>,
    pub deadlift: Option<f64>,
    pub pull_ups: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl CombineMetric {
    /// Value recorded for a metric kind in this session, if any
    pub fn value(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::FortyYard => self.forty_yard,
            MetricKind::TenYardSplit => self.ten_yard_split,
            MetricKind::Shuttle => self.shuttle,
            MetricKind::ThreeCone => self.three_cone,
            MetricKind::VerticalJump => self.vertical_jump,
            MetricKind::BroadJump => self.broad_jump,
            MetricKind::BenchPress => self.bench_press,
            MetricKind::BenchPressReps => self.bench_press_reps.map(|v| v as f64),
            MetricKind::SquatMax => self.squat_max,
            MetricKind::PowerClean => self.power_clean,
            MetricKind::Deadlift => self.deadlift,
            MetricKind::PullUps => self.pull_ups.map(|v| v as f64),
        }
    }
}

/// Saved height prediction snapshot, attached to an athlete profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightPrediction {
    pub guid: Uuid,
    pub athlete_id: Uuid,
    pub sex: Sex,
    pub age_years: f64,
    pub height_in: f64,
    pub weight_lb: f64,
    pub mother_height_in: f64,
    pub father_height_in: f64,
    pub predicted_height_in: f64,
    pub predicted_height_cm: f64,
    pub margin_in: f64,
    pub percent_complete: f64,
    pub remaining_in: f64,
    pub remaining_cm: f64,
    pub interpretation: String,
    pub recommended_positions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct College {
    pub guid: Uuid,
    pub name: String,
    pub division: String,
    pub conference: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub enrollment: Option<i64>,
}

/// Opaque upstream match scores for one (athlete, college) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollegeMatch {
    pub athlete_id: Uuid,
    pub college_id: Uuid,
    pub academic_fit: i64,
    pub athletic_fit: i64,
    pub financial_fit: i64,
    pub overall: i64,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPost {
    pub guid: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub media_url: Option<String>,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub guid: Uuid,
    pub athlete_id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjuryStatus {
    Active,
    Recovering,
    Cleared,
}

impl InjuryStatus {
    pub fn parse(s: &str) -> Option<InjuryStatus> {
        match s {
            "active" => Some(InjuryStatus::Active),
            "recovering" => Some(InjuryStatus::Recovering),
            "cleared" => Some(InjuryStatus::Cleared),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InjuryStatus::Active => "active",
            InjuryStatus::Recovering => "recovering",
            InjuryStatus::Cleared => "cleared",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Injury {
    pub guid: Uuid,
    pub athlete_id: Uuid,
    pub injury_type: String,
    pub body_part: Option<String>,
    pub occurred_on: Option<NaiveDate>,
    pub status: InjuryStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parent {
    pub guid: Uuid,
    pub name: String,
    pub email: String,
}
