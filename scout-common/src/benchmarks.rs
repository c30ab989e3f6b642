//! Position benchmark reference tables
//!
//! Static (position group, division) -> expected combine values, embedded as
//! constant data and never mutated at runtime. Position strings that don't
//! resolve to a known group fall back to [`PositionGroup::Athlete`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// NCAA/NAIA/JUCO competition tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Division {
    D1,
    D2,
    D3,
    Naia,
    Juco,
}

impl Division {
    pub const ALL: [Division; 5] = [
        Division::D1,
        Division::D2,
        Division::D3,
        Division::Naia,
        Division::Juco,
    ];

    /// Parse the division strings used by the API and stored college rows
    pub fn parse(s: &str) -> Option<Division> {
        match s.to_ascii_lowercase().as_str() {
            "d1" | "di" | "ncaa d1" => Some(Division::D1),
            "d2" | "dii" | "ncaa d2" => Some(Division::D2),
            "d3" | "diii" | "ncaa d3" => Some(Division::D3),
            "naia" => Some(Division::Naia),
            "juco" | "njcaa" => Some(Division::Juco),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Division::D1 => "d1",
            Division::D2 => "d2",
            Division::D3 => "d3",
            Division::Naia => "naia",
            Division::Juco => "juco",
        }
    }

    /// Display badge rendered next to college and match rows
    pub fn badge(&self) -> DivisionBadge {
        match self {
            Division::D1 => DivisionBadge { label: "NCAA D1", color: "purple" },
            Division::D2 => DivisionBadge { label: "NCAA D2", color: "blue" },
            Division::D3 => DivisionBadge { label: "NCAA D3", color: "green" },
            Division::Naia => DivisionBadge { label: "NAIA", color: "orange" },
            Division::Juco => DivisionBadge { label: "JUCO", color: "slate" },
        }
    }
}

/// Static label/color pair for a division badge
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DivisionBadge {
    pub label: &'static str,
    pub color: &'static str,
}

/// Position groups with distinct benchmark expectations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionGroup {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    OffensiveLine,
    DefensiveLine,
    Linebacker,
    DefensiveBack,
    /// Default group for unrecognized or unset positions
    Athlete,
}

impl PositionGroup {
    /// Map a free-form position string to its benchmark group.
    ///
    /// Unrecognized strings fall back to `Athlete` rather than erroring.
    pub fn from_position(position: &str) -> PositionGroup {
        match position.trim().to_ascii_lowercase().as_str() {
            "qb" | "quarterback" => PositionGroup::Quarterback,
            "rb" | "fb" | "hb" | "running back" | "fullback" | "halfback" => {
                PositionGroup::RunningBack
            }
            "wr" | "wide receiver" | "slot receiver" | "receiver" => PositionGroup::WideReceiver,
            "te" | "tight end" => PositionGroup::TightEnd,
            "ol" | "ot" | "og" | "c" | "offensive line" | "offensive tackle" | "offensive guard"
            | "center" => PositionGroup::OffensiveLine,
            "dl" | "de" | "dt" | "defensive line" | "defensive end" | "defensive tackle"
            | "edge" => PositionGroup::DefensiveLine,
            "lb" | "ilb" | "olb" | "mlb" | "linebacker" => PositionGroup::Linebacker,
            "db" | "cb" | "s" | "fs" | "ss" | "defensive back" | "cornerback" | "safety" => {
                PositionGroup::DefensiveBack
            }
            _ => PositionGroup::Athlete,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PositionGroup::Quarterback => "Quarterback",
            PositionGroup::RunningBack => "Running Back",
            PositionGroup::WideReceiver => "Wide Receiver",
            PositionGroup::TightEnd => "Tight End",
            PositionGroup::OffensiveLine => "Offensive Line",
            PositionGroup::DefensiveLine => "Defensive Line",
            PositionGroup::Linebacker => "Linebacker",
            PositionGroup::DefensiveBack => "Defensive Back",
            PositionGroup::Athlete => "Athlete",
        }
    }

    const ALL: [PositionGroup; 9] = [
        PositionGroup::Quarterback,
        PositionGroup::RunningBack,
        PositionGroup::WideReceiver,
        PositionGroup::TightEnd,
        PositionGroup::OffensiveLine,
        PositionGroup::DefensiveLine,
        PositionGroup::Linebacker,
        PositionGroup::DefensiveBack,
        PositionGroup::Athlete,
    ];
}

/// Combine metrics carried on a testing-session snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    FortyYard,
    TenYardSplit,
    Shuttle,
    ThreeCone,
    VerticalJump,
    BroadJump,
    BenchPress,
    BenchPressReps,
    SquatMax,
    PowerClean,
    Deadlift,
    PullUps,
}

impl MetricKind {
    /// Timed drills improve downward; everything else improves upward
    pub fn lower_is_better(&self) -> bool {
        matches!(
            self,
            MetricKind::FortyYard
                | MetricKind::TenYardSplit
                | MetricKind::Shuttle
                | MetricKind::ThreeCone
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::FortyYard => "40-Yard Dash",
            MetricKind::TenYardSplit => "10-Yard Split",
            MetricKind::Shuttle => "5-10-5 Shuttle",
            MetricKind::ThreeCone => "Three-Cone Drill",
            MetricKind::VerticalJump => "Vertical Jump",
            MetricKind::BroadJump => "Broad Jump",
            MetricKind::BenchPress => "Bench Press",
            MetricKind::BenchPressReps => "Bench Press Reps",
            MetricKind::SquatMax => "Squat Max",
            MetricKind::PowerClean => "Power Clean",
            MetricKind::Deadlift => "Deadlift",
            MetricKind::PullUps => "Pull-Ups",
        }
    }

    pub const ALL: [MetricKind; 12] = [
        MetricKind::FortyYard,
        MetricKind::TenYardSplit,
        MetricKind::Shuttle,
        MetricKind::ThreeCone,
        MetricKind::VerticalJump,
        MetricKind::BroadJump,
        MetricKind::BenchPress,
        MetricKind::BenchPressReps,
        MetricKind::SquatMax,
        MetricKind::PowerClean,
        MetricKind::Deadlift,
        MetricKind::PullUps,
    ];
}

/// Benchmarked metric kinds, in display order. Split times, pull-ups, reps,
/// and power clean are tracked for progress but carry no division benchmark.
const BENCHMARKED: [MetricKind; 8] = [
    MetricKind::FortyYard,
    MetricKind::Shuttle,
    MetricKind::ThreeCone,
    MetricKind::VerticalJump,
    MetricKind::BroadJump,
    MetricKind::BenchPress,
    MetricKind::SquatMax,
    MetricKind::Deadlift,
];

/// D1 expectations per group, in BENCHMARKED order:
/// forty, shuttle, three-cone, vertical, broad, bench, squat, deadlift
const D1_BASE: [(PositionGroup, [f64; 8]); 9] = [
    (PositionGroup::Quarterback, [4.75, 4.25, 7.00, 31.0, 110.0, 255.0, 405.0, 455.0]),
    (PositionGroup::RunningBack, [4.50, 4.20, 6.95, 34.0, 118.0, 315.0, 455.0, 500.0]),
    (PositionGroup::WideReceiver, [4.48, 4.20, 6.90, 35.0, 120.0, 275.0, 405.0, 455.0]),
    (PositionGroup::TightEnd, [4.70, 4.35, 7.10, 32.0, 114.0, 315.0, 455.0, 500.0]),
    (PositionGroup::OffensiveLine, [5.20, 4.70, 7.70, 26.0, 100.0, 365.0, 500.0, 550.0]),
    (PositionGroup::DefensiveLine, [4.95, 4.55, 7.45, 29.0, 106.0, 350.0, 500.0, 545.0]),
    (PositionGroup::Linebacker, [4.65, 4.30, 7.05, 33.0, 115.0, 325.0, 465.0, 510.0]),
    (PositionGroup::DefensiveBack, [4.50, 4.15, 6.85, 35.0, 120.0, 275.0, 405.0, 450.0]),
    (PositionGroup::Athlete, [4.70, 4.35, 7.10, 31.0, 112.0, 300.0, 440.0, 480.0]),
];

/// Per-division adjustment: timed drills allow slower marks down-tier while
/// jump/strength expectations scale down. (timed multiplier, power multiplier)
const DIVISION_SCALE: [(Division, f64, f64); 5] = [
    (Division::D1, 1.00, 1.00),
    (Division::D2, 1.04, 0.92),
    (Division::D3, 1.08, 0.84),
    (Division::Naia, 1.06, 0.88),
    (Division::Juco, 1.05, 0.90),
];

static BENCHMARK_TABLE: Lazy<HashMap<(PositionGroup, Division), Vec<(MetricKind, f64)>>> =
    Lazy::new(|| {
        let mut table = HashMap::new();
        for (group, base) in D1_BASE {
            for (division, timed, power) in DIVISION_SCALE {
                let values = BENCHMARKED
                    .iter()
                    .zip(base.iter())
                    .map(|(kind, value)| {
                        let scale = if kind.lower_is_better() { timed } else { power };
                        (*kind, round2(value * scale))
                    })
                    .collect();
                table.insert((group, division), values);
            }
        }
        table
    });

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Expected values for a position group at a division, in display order.
///
/// Every (group, division) pair is present in the embedded table, so this
/// never fails for valid enum inputs.
pub fn benchmarks_for(group: PositionGroup, division: Division) -> &'static [(MetricKind, f64)] {
    BENCHMARK_TABLE
        .get(&(group, division))
        .map(|v| v.as_slice())
        .unwrap_or(&[])
}
