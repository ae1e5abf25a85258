//! N-1 contingency and burnout analysis over a thin roster.
//!
//! Run with: cargo run --example resilience_report

use chrono::NaiveDate;
use rotacore::domain::{
    ActivityType, Assignment, Block, DateWindow, HalfDay, Person, Role, RotationTemplate,
};
use rotacore::resilience::AnalysisDepth;
use rotacore::sink::CancelToken;
use rotacore::ScheduleEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2025, 6, 2).ok_or("bad date")?;
    let end = NaiveDate::from_ymd_opt(2025, 6, 8).ok_or("bad date")?;
    let window = DateWindow::new(start, end)?;

    // Only Dr. Acosta holds the sports medicine credential.
    let people = vec![
        Person::faculty("f1", "Dr. Acosta").with_credential("sports_medicine"),
        Person::faculty("f2", "Dr. Banner"),
    ];
    let templates = vec![
        RotationTemplate::new("sports", "Sports Medicine", ActivityType::Outpatient)
            .requiring_credential("sports_medicine"),
    ];

    let mut blocks = Vec::new();
    let mut assignments = Vec::new();
    for (i, date) in window.days().enumerate() {
        let block = Block::new(format!("{date}-am"), date, HalfDay::Am, 10);
        assignments.push(
            Assignment::new(format!("a{i}"), "f1", block.id(), "sports", Role::Primary)
                .preserved(),
        );
        blocks.push(block);
        blocks.push(Block::new(format!("{date}-pm"), date, HalfDay::Pm, 10));
    }

    let engine = ScheduleEngine::new();
    let report = engine.analyze_resilience(
        &people,
        &blocks,
        &templates,
        &assignments,
        &[],
        AnalysisDepth::N2 { pair_cap: 10 },
        CancelToken::new(),
    )?;

    println!("mean utilization: {:.2}", report.utilization.mean);
    if let Some(level) = report.utilization.defense_level {
        println!("defense level:    {}", level.as_str());
    }
    println!("SPOFs:            {:?}", report.single_points_of_failure);
    if let Some(n1) = &report.n1 {
        for person in n1 {
            println!(
                "  {}: score {:.2}, {} uncoverable of {}",
                person.person_id,
                person.score,
                person.uncoverable_blocks.len(),
                person.covered_blocks
            );
        }
    }

    let burnout = engine.burnout_cascade(&people, &blocks, &templates, &assignments)?;
    println!("burnout Rt:       {:.2}", burnout.r_t);
    println!("overloaded:       {:?}", burnout.overloaded);
    Ok(())
}
