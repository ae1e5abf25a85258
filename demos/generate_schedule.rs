//! End-to-end schedule generation over an in-memory roster.
//!
//! Run with: cargo run --example generate_schedule

use chrono::NaiveDate;
use rotacore::domain::{ActivityType, DateWindow, PgyLevel, Person, RotationTemplate};
use rotacore::repository::InMemoryRepository;
use rotacore::sink::CancelToken;
use rotacore::solver::SolveConfig;
use rotacore::ScheduleEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2025, 6, 2).ok_or("bad date")?;
    let end = NaiveDate::from_ymd_opt(2025, 6, 15).ok_or("bad date")?;
    let window = DateWindow::new(start, end)?;

    let mut repo = InMemoryRepository::default();
    for i in 1..=6u32 {
        let pgy = match i % 3 {
            0 => PgyLevel::Pgy3,
            1 => PgyLevel::Pgy1,
            _ => PgyLevel::Pgy2,
        };
        repo.people
            .push(Person::resident(format!("r{i}"), format!("Resident {i}"), pgy));
    }
    repo.people.push(Person::faculty("f1", "Dr. Acosta"));
    repo.people.push(Person::faculty("f2", "Dr. Banner"));

    for date in window.days() {
        repo.blocks.push(rotacore::domain::Block::new(
            format!("{date}-am"),
            date,
            rotacore::domain::HalfDay::Am,
            10,
        ));
        repo.blocks.push(rotacore::domain::Block::new(
            format!("{date}-pm"),
            date,
            rotacore::domain::HalfDay::Pm,
            10,
        ));
    }
    repo.templates.push(
        RotationTemplate::new("clinic", "Continuity Clinic", ActivityType::Outpatient)
            .with_min_residents(2)
            .supervised(4),
    );

    let engine = ScheduleEngine::new();
    let ctx = engine.load_context(&repo, window, SolveConfig::default())?;
    let result = engine.generate_schedule(&ctx, CancelToken::new())?;

    println!("status:       {}", result.status.as_str());
    println!("backend:      {}", result.stats.backend_used);
    println!("assignments:  {}", result.assignments.len());
    println!("supervising:  {}", result.stats.supervision_added);
    println!("uncovered:    {}", result.stats.uncovered_slots);
    println!("dropped:      {}", result.dropped.len());

    for assignment in result.assignments.iter().take(8) {
        println!(
            "  {} -> {} on {} ({:?})",
            assignment.person_id(),
            assignment.template_id(),
            assignment.block_id(),
            assignment.role()
        );
    }
    Ok(())
}
