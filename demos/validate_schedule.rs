//! Compliance validation over a hand-built week.
//!
//! Run with: cargo run --example validate_schedule

use chrono::NaiveDate;
use rotacore::domain::{
    ActivityType, Assignment, Block, DateWindow, HalfDay, Person, PgyLevel, Role,
    RotationTemplate,
};
use rotacore::sink::CancelToken;
use rotacore::ScheduleEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2025, 6, 2).ok_or("bad date")?;
    let end = NaiveDate::from_ymd_opt(2025, 6, 15).ok_or("bad date")?;
    let window = DateWindow::new(start, end)?;

    let people = vec![
        Person::resident("r1", "Resident One", PgyLevel::Pgy1),
        Person::faculty("f1", "Dr. Acosta"),
    ];
    let templates = vec![
        RotationTemplate::new("clinic", "Continuity Clinic", ActivityType::Outpatient)
            .supervised(4),
    ];

    let mut blocks = Vec::new();
    let mut assignments = Vec::new();
    for date in window.days() {
        for half in [HalfDay::Am, HalfDay::Pm] {
            let suffix = match half {
                HalfDay::Am => "am",
                HalfDay::Pm => "pm",
            };
            let block = Block::new(format!("{date}-{suffix}"), date, half, 10);
            // r1 works every half-day, unsupervised: both rest rules
            // and the supervision ratio will fire.
            assignments.push(Assignment::new(
                format!("a-{date}-{suffix}"),
                "r1",
                block.id(),
                "clinic",
                Role::Primary,
            ));
            blocks.push(block);
        }
    }

    let report = ScheduleEngine::new().validate_schedule(
        &people,
        &blocks,
        &templates,
        &assignments,
        window,
        CancelToken::new(),
    );

    println!("violations:    {}", report.violations.len());
    println!("coverage rate: {:.2}", report.stats.coverage_rate);
    for (kind, count) in &report.stats.counts {
        println!("  {kind}: {count}");
    }
    for violation in report.violations.iter().take(6) {
        println!(
            "  [{:?}] {} — {}",
            violation.severity,
            violation.kind.as_str(),
            violation.message
        );
    }
    Ok(())
}
