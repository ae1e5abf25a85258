//! Per-run lookup indices over borrowed entity snapshots.
//!
//! A [`RunIndex`] is built once at the start of a run and discarded with
//! it. All cross-entity navigation goes through id lookups here; entities
//! themselves hold no pointers to each other.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::absence::Absence;
use super::assignment::Assignment;
use super::block::{Block, HalfDay};
use super::error::DomainError;
use super::person::Person;
use super::template::{ActivityType, RotationTemplate};

/// Lookup tables for one scheduling run.
///
/// Construction validates the §-level input invariants: block (date,
/// half) uniqueness, referential integrity of assignments, and (person,
/// block) occupancy uniqueness. A failed build leaves nothing behind.
///
/// # Complexity
///
/// - `build`: O(P + B log B + T + A)
/// - id lookups and occupancy checks: O(1) hash lookups
#[derive(Debug)]
pub struct RunIndex<'a> {
    people: &'a [Person],
    blocks: &'a [Block],
    templates: &'a [RotationTemplate],
    assignments: &'a [Assignment],
    absences: &'a [Absence],
    person_by_id: HashMap<&'a str, usize>,
    block_by_id: HashMap<&'a str, usize>,
    template_by_id: HashMap<&'a str, usize>,
    blocks_in_order: Vec<usize>,
    block_by_key: HashMap<(NaiveDate, HalfDay), usize>,
    occupancy: HashMap<(&'a str, &'a str), usize>,
    by_person: HashMap<&'a str, Vec<usize>>,
    by_block: HashMap<&'a str, Vec<usize>>,
    by_template: HashMap<&'a str, Vec<usize>>,
    absences_by_person: HashMap<&'a str, Vec<usize>>,
}

impl<'a> RunIndex<'a> {
    pub fn build(
        people: &'a [Person],
        blocks: &'a [Block],
        templates: &'a [RotationTemplate],
        assignments: &'a [Assignment],
        absences: &'a [Absence],
    ) -> Result<Self, DomainError> {
        let mut person_by_id = HashMap::with_capacity(people.len());
        for (i, p) in people.iter().enumerate() {
            person_by_id.insert(p.id(), i);
        }

        let mut block_by_id = HashMap::with_capacity(blocks.len());
        let mut block_by_key: HashMap<(NaiveDate, HalfDay), usize> =
            HashMap::with_capacity(blocks.len());
        for (i, b) in blocks.iter().enumerate() {
            if block_by_key.insert(b.key(), i).is_some() {
                return Err(DomainError::DuplicateBlock {
                    date: b.date(),
                    half: b.half(),
                });
            }
            block_by_id.insert(b.id(), i);
        }

        let mut blocks_in_order: Vec<usize> = (0..blocks.len()).collect();
        blocks_in_order.sort_by_key(|&i| blocks[i].key());

        let mut template_by_id = HashMap::with_capacity(templates.len());
        for (i, t) in templates.iter().enumerate() {
            template_by_id.insert(t.id(), i);
        }

        let mut occupancy = HashMap::with_capacity(assignments.len());
        let mut by_person: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut by_block: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut by_template: HashMap<&str, Vec<usize>> = HashMap::new();

        for (i, a) in assignments.iter().enumerate() {
            if !person_by_id.contains_key(a.person_id()) {
                return Err(DomainError::UnknownPerson(a.person_id().to_owned()));
            }
            if !block_by_id.contains_key(a.block_id()) {
                return Err(DomainError::UnknownBlock(a.block_id().to_owned()));
            }
            if !template_by_id.contains_key(a.template_id()) {
                return Err(DomainError::UnknownTemplate(a.template_id().to_owned()));
            }
            if occupancy.insert((a.person_id(), a.block_id()), i).is_some() {
                return Err(DomainError::DuplicateAssignment {
                    person: a.person_id().to_owned(),
                    block: a.block_id().to_owned(),
                });
            }
            by_person.entry(a.person_id()).or_default().push(i);
            by_block.entry(a.block_id()).or_default().push(i);
            by_template.entry(a.template_id()).or_default().push(i);
        }

        let mut absences_by_person: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, ab) in absences.iter().enumerate() {
            absences_by_person.entry(ab.person_id()).or_default().push(i);
        }

        Ok(Self {
            people,
            blocks,
            templates,
            assignments,
            absences,
            person_by_id,
            block_by_id,
            template_by_id,
            blocks_in_order,
            block_by_key,
            occupancy,
            by_person,
            by_block,
            by_template,
            absences_by_person,
        })
    }

    pub fn people(&self) -> &'a [Person] {
        self.people
    }

    pub fn templates(&self) -> &'a [RotationTemplate] {
        self.templates
    }

    pub fn assignments(&self) -> &'a [Assignment] {
        self.assignments
    }

    pub fn person(&self, id: &str) -> Option<&'a Person> {
        self.person_by_id.get(id).map(|&i| &self.people[i])
    }

    pub fn block(&self, id: &str) -> Option<&'a Block> {
        self.block_by_id.get(id).map(|&i| &self.blocks[i])
    }

    pub fn template(&self, id: &str) -> Option<&'a RotationTemplate> {
        self.template_by_id.get(id).map(|&i| &self.templates[i])
    }

    /// Blocks in (date, half) order.
    pub fn blocks_in_order(&self) -> impl Iterator<Item = &'a Block> + '_ {
        self.blocks_in_order.iter().map(|&i| &self.blocks[i])
    }

    /// The block at a (date, half) key, if one exists in the window.
    pub fn block_at(&self, date: NaiveDate, half: HalfDay) -> Option<&'a Block> {
        self.block_by_key.get(&(date, half)).map(|&i| &self.blocks[i])
    }

    /// The assignment occupying (person, block), if any.
    pub fn assignment_at(&self, person_id: &str, block_id: &str) -> Option<&'a Assignment> {
        self.occupancy
            .get(&(person_id, block_id))
            .map(|&i| &self.assignments[i])
    }

    pub fn is_occupied(&self, person_id: &str, block_id: &str) -> bool {
        self.occupancy.contains_key(&(person_id, block_id))
    }

    pub fn assignments_for_person(
        &self,
        person_id: &str,
    ) -> impl Iterator<Item = &'a Assignment> + '_ {
        self.by_person
            .get(person_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.assignments[i])
    }

    pub fn assignments_on_block(
        &self,
        block_id: &str,
    ) -> impl Iterator<Item = &'a Assignment> + '_ {
        self.by_block
            .get(block_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.assignments[i])
    }

    pub fn assignments_on_template(
        &self,
        template_id: &str,
    ) -> impl Iterator<Item = &'a Assignment> + '_ {
        self.by_template
            .get(template_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.assignments[i])
    }

    /// Activity class of the template behind an assignment.
    pub fn activity_of(&self, assignment: &Assignment) -> Option<ActivityType> {
        self.template(assignment.template_id()).map(|t| t.activity())
    }

    /// Activity occupying (person, block), if any. Used to classify a
    /// person's rotation on a block from the preserved map.
    pub fn occupied_activity(&self, person_id: &str, block_id: &str) -> Option<ActivityType> {
        self.assignment_at(person_id, block_id)
            .and_then(|a| self.activity_of(a))
    }

    pub fn is_absent(&self, person_id: &str, date: NaiveDate) -> bool {
        self.absences_by_person
            .get(person_id)
            .into_iter()
            .flatten()
            .any(|&i| self.absences[i].covers(date))
    }
}
