//! Utilization analysis.

use std::collections::HashMap;

use super::report::{
    BlockUtilization, DefenseLevel, TemplateUtilizationPoint, TemplateUtilizationSeries,
    UtilizationReport,
};
use crate::domain::RunIndex;

/// Queueing-theory stress threshold: blocks above it get flagged.
pub const FLAG_THRESHOLD: f64 = 0.8;

/// Computes per-block and per-template utilization.
///
/// Block utilization is assigned headcount over available staffing
/// capacity (people neither absent nor out of the roster that day);
/// the defense level bins the mean. Per-template series measure filled
/// coverage against required coverage per date.
pub fn analyze(index: &RunIndex<'_>) -> UtilizationReport {
    let mut report = UtilizationReport::default();
    let mut total = 0.0;
    let mut counted = 0u32;

    for block in index.blocks_in_order() {
        let assigned = index.assignments_on_block(block.id()).count() as u32;
        let capacity = index
            .people()
            .iter()
            .filter(|p| !index.is_absent(p.id(), block.date()))
            .count() as u32;
        let utilization = if capacity == 0 {
            0.0
        } else {
            f64::from(assigned) / f64::from(capacity)
        };
        if utilization > FLAG_THRESHOLD {
            report.flagged_blocks.push(block.id().to_owned());
        }
        report.per_block.push(BlockUtilization {
            block_id: block.id().to_owned(),
            date: block.date(),
            half: block.half(),
            assigned,
            capacity,
            utilization,
        });
        total += utilization;
        counted += 1;
    }

    report.mean = if counted == 0 {
        0.0
    } else {
        total / f64::from(counted)
    };
    report.defense_level = Some(DefenseLevel::from_utilization(report.mean));
    report.per_template = template_series(index);
    report
}

/// Filled-over-required coverage per template per date.
fn template_series(index: &RunIndex<'_>) -> Vec<TemplateUtilizationSeries> {
    let mut templates: Vec<_> = index
        .templates()
        .iter()
        .filter(|t| t.is_solver_managed())
        .collect();
    templates.sort_by_key(|t| t.id().to_owned());

    templates
        .into_iter()
        .map(|template| {
            // assigned per date on this template
            let mut assigned_by_date: HashMap<chrono::NaiveDate, u32> = HashMap::new();
            for assignment in index.assignments_on_template(template.id()) {
                if let Some(block) = index.block(assignment.block_id()) {
                    *assigned_by_date.entry(block.date()).or_default() += 1;
                }
            }
            // required per date: min_residents per active block
            let mut required_by_date: HashMap<chrono::NaiveDate, u32> = HashMap::new();
            for block in index.blocks_in_order() {
                if template.is_active_on(block.date()) {
                    *required_by_date.entry(block.date()).or_default() += template.min_residents();
                }
            }

            let mut dates: Vec<chrono::NaiveDate> = required_by_date.keys().copied().collect();
            dates.sort_unstable();
            let points = dates
                .into_iter()
                .map(|date| {
                    let required = required_by_date[&date];
                    let assigned = assigned_by_date.get(&date).copied().unwrap_or(0);
                    TemplateUtilizationPoint {
                        date,
                        utilization: if required == 0 {
                            0.0
                        } else {
                            f64::from(assigned) / f64::from(required)
                        },
                    }
                })
                .collect();
            TemplateUtilizationSeries {
                template_id: template.id().to_owned(),
                points,
            }
        })
        .collect()
}
