//! Simulation report generation.

use crate::combat::types::Outcome;
use crate::gate::types::GateOutcome;
use crate::items::types::ItemGrade;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from multiple simulated gates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimReport {
    pub runs: u32,
    pub wins: u32,
    pub losses: u32,
    pub aborts: u32,
    pub win_rate: f64,
    pub avg_rounds: f64,
    pub avg_duration_seconds: f64,

    // Per-member averages across all runs, losses included
    pub avg_currency_per_member: f64,
    pub avg_experience_per_member: f64,
    pub avg_damage_taken_per_member: f64,
    pub survival_rate: f64,

    // Loot
    pub drops_by_grade: BTreeMap<ItemGrade, u64>,

    // Wear
    pub avg_durability_lost: f64,
    pub broken_items: u64,
}

impl SimReport {
    pub fn from_outcomes(outcomes: &[GateOutcome], party_size: usize) -> Self {
        let runs = outcomes.len() as u32;
        if runs == 0 {
            return Self::default();
        }
        let count = |o: Outcome| outcomes.iter().filter(|g| g.outcome == o).count() as u32;
        let wins = count(Outcome::Win);

        let results: Vec<_> = outcomes
            .iter()
            .flat_map(|o| o.per_entrant_result.iter())
            .collect();
        let members = (runs as usize * party_size).max(1) as f64;

        let mut drops_by_grade = BTreeMap::new();
        for result in &results {
            for drop in &result.reward.items {
                *drops_by_grade.entry(drop.grade).or_insert(0) += 1;
            }
        }

        let changes: Vec<_> = results
            .iter()
            .flat_map(|r| r.equipment_durability_delta.iter())
            .collect();
        let avg_durability_lost = if changes.is_empty() {
            0.0
        } else {
            changes.iter().map(|c| c.before - c.after).sum::<f64>() / changes.len() as f64
        };

        Self {
            runs,
            wins,
            losses: count(Outcome::Loss),
            aborts: count(Outcome::Aborted),
            win_rate: wins as f64 / runs as f64,
            avg_rounds: outcomes.iter().map(|o| o.rounds_elapsed as f64).sum::<f64>() / runs as f64,
            avg_duration_seconds: outcomes.iter().map(|o| o.duration_seconds).sum::<f64>()
                / runs as f64,
            avg_currency_per_member: results.iter().map(|r| r.reward.currency as f64).sum::<f64>()
                / members,
            avg_experience_per_member: results
                .iter()
                .map(|r| r.reward.experience as f64)
                .sum::<f64>()
                / members,
            avg_damage_taken_per_member: results.iter().map(|r| r.damage_taken).sum::<f64>()
                / members,
            survival_rate: results.iter().filter(|r| r.survived).count() as f64 / members,
            drops_by_grade,
            avg_durability_lost,
            broken_items: changes.iter().filter(|c| c.broken).count() as u64,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                  GATE SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} won, {} lost, {} aborted\n\n",
            self.runs, self.wins, self.losses, self.aborts
        ));

        report.push_str("── COMBAT ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Win Rate:            {:.1}%\n", self.win_rate * 100.0));
        report.push_str(&format!("  Survival Rate:       {:.1}%\n", self.survival_rate * 100.0));
        report.push_str(&format!("  Avg Rounds:          {:.1}\n", self.avg_rounds));
        report.push_str(&format!("  Avg Duration:        {:.0}s\n", self.avg_duration_seconds));
        report.push_str(&format!(
            "  Avg Damage Taken:    {:.0}\n\n",
            self.avg_damage_taken_per_member
        ));

        report.push_str("── REWARDS (per member) ─────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Currency:        {:.1}\n", self.avg_currency_per_member));
        report.push_str(&format!(
            "  Avg Experience:      {:.1}\n\n",
            self.avg_experience_per_member
        ));

        report.push_str("── DROPS ────────────────────────────────────────────────────────\n");
        if self.drops_by_grade.is_empty() {
            report.push_str("  (none)\n");
        }
        for (grade, count) in &self.drops_by_grade {
            let per_run = *count as f64 / self.runs.max(1) as f64;
            report.push_str(&format!("  {:<10} {:>6}  ({:.2}/gate)\n", grade.name(), count, per_run));
        }

        report.push_str("\n── EQUIPMENT ────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Durability Lost: {:.2}\n", self.avg_durability_lost));
        report.push_str(&format!("  Items Broken:        {}\n", self.broken_items));

        report
    }

    /// One-line summary for quiet output.
    pub fn summary_line(&self) -> String {
        format!(
            "runs={} win_rate={:.3} avg_rounds={:.1} currency/member={:.1} xp/member={:.1} drops={}",
            self.runs,
            self.win_rate,
            self.avg_rounds,
            self.avg_currency_per_member,
            self.avg_experience_per_member,
            self.drops_by_grade.values().sum::<u64>()
        )
    }
}
