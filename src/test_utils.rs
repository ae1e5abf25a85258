//! Shared fixture builders for unit tests.

use chrono::NaiveDate;

use crate::domain::{ActivityType, Block, DateWindow, HalfDay, Person, PgyLevel, RotationTemplate};

pub fn resident(id: &str, pgy: PgyLevel) -> Person {
    Person::resident(id, format!("Resident {id}"), pgy)
}

pub fn faculty(id: &str) -> Person {
    Person::faculty(id, format!("Faculty {id}"))
}

/// A template named after its id, active every day.
pub fn template(id: &str, activity: ActivityType) -> RotationTemplate {
    RotationTemplate::new(id, id.to_owned(), activity)
}

/// Outpatient clinic with no supervision or credential requirements.
pub fn clinic_template(id: &str) -> RotationTemplate {
    template(id, ActivityType::Outpatient)
}

/// Inpatient FMIT-tagged template.
pub fn fmit_template(id: &str) -> RotationTemplate {
    template(id, ActivityType::Inpatient).tagged("fmit")
}

/// AM and PM blocks for every day of the inclusive range, ids like
/// `2025-06-02-am`, all in academic block 10.
pub fn half_day_blocks(start: NaiveDate, end: NaiveDate) -> Vec<Block> {
    let window = DateWindow::new(start, end).expect("fixture window");
    let mut blocks = Vec::new();
    for date in window.days() {
        blocks.push(Block::new(format!("{date}-am"), date, HalfDay::Am, 10));
        blocks.push(Block::new(format!("{date}-pm"), date, HalfDay::Pm, 10));
    }
    blocks
}

pub fn window(start: NaiveDate, end: NaiveDate) -> DateWindow {
    DateWindow::new(start, end).expect("fixture window")
}
