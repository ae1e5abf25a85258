//! Mutable view of a schedule under construction.
//!
//! [`ScheduleState`] overlays tentative placements on the preserved
//! assignment universe of a [`RunIndex`]. Rules read it during
//! propagation and scoring; backends mutate it through [`place`] /
//! [`unplace`] only. All derived tables are maintained incrementally so
//! rule evaluation stays O(1)-ish per candidate.
//!
//! [`place`]: ScheduleState::place
//! [`unplace`]: ScheduleState::unplace

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate};
use petgraph::graph::UnGraph;

use super::CandidateSlot;
use crate::domain::{
    Block, HalfDay, Person, PersonKind, PgyLevel, RotationTemplate, RunIndex,
};
use crate::Id;

/// Preserved universe plus tentative placements for one solve.
#[derive(Debug)]
pub struct ScheduleState<'a> {
    index: &'a RunIndex<'a>,

    // Immutable per-run tables derived from the preserved universe.
    preserved_residents_bt: HashMap<(Id, Id), u32>,
    preserved_supervisors_bt: HashMap<(Id, Id), u32>,
    preserved_on_block: HashMap<Id, u32>,
    required_on_block: HashMap<Id, u32>,
    inpatient_dates: HashMap<Id, BTreeSet<NaiveDate>>,
    fmit_weeks: HashMap<Id, BTreeSet<NaiveDate>>,
    eligible_residents: HashMap<Id, u32>,
    centrality: HashMap<Id, f64>,
    pgy_head_count: HashMap<PgyLevel, u32>,

    // Tentative overlay, maintained incrementally.
    tentative: BTreeMap<(Id, Id), Id>,
    tentative_residents_bt: HashMap<(Id, Id), u32>,
    tentative_supervisors_bt: HashMap<(Id, Id), u32>,
    tentative_on_block: HashMap<Id, u32>,
    productive_days: HashMap<Id, BTreeMap<NaiveDate, u32>>,
    call_slots: HashMap<Id, BTreeSet<(NaiveDate, HalfDay)>>,
    template_dates: HashMap<(Id, Id), BTreeMap<NaiveDate, u32>>,
    load: HashMap<Id, u32>,
    pgy_load: HashMap<PgyLevel, u32>,
}

impl<'a> ScheduleState<'a> {
    pub fn new(index: &'a RunIndex<'a>) -> Self {
        let mut preserved_residents_bt: HashMap<(Id, Id), u32> = HashMap::new();
        let mut preserved_supervisors_bt: HashMap<(Id, Id), u32> = HashMap::new();
        let mut preserved_on_block: HashMap<Id, u32> = HashMap::new();
        let mut inpatient_dates: HashMap<Id, BTreeSet<NaiveDate>> = HashMap::new();
        let mut fmit_weeks: HashMap<Id, BTreeSet<NaiveDate>> = HashMap::new();
        let mut productive_days: HashMap<Id, BTreeMap<NaiveDate, u32>> = HashMap::new();
        let mut call_slots: HashMap<Id, BTreeSet<(NaiveDate, HalfDay)>> = HashMap::new();
        let mut template_dates: HashMap<(Id, Id), BTreeMap<NaiveDate, u32>> = HashMap::new();
        let mut load: HashMap<Id, u32> = HashMap::new();
        let mut pgy_load: HashMap<PgyLevel, u32> = HashMap::new();

        for assignment in index.assignments() {
            let (Some(person), Some(block), Some(template)) = (
                index.person(assignment.person_id()),
                index.block(assignment.block_id()),
                index.template(assignment.template_id()),
            ) else {
                continue;
            };
            let person_id: Id = person.id().to_owned();
            let block_id: Id = block.id().to_owned();
            let template_id: Id = template.id().to_owned();

            *preserved_on_block.entry(block_id.clone()).or_default() += 1;
            match person.kind() {
                PersonKind::Resident => {
                    *preserved_residents_bt
                        .entry((block_id.clone(), template_id.clone()))
                        .or_default() += 1;
                }
                PersonKind::Faculty => {
                    *preserved_supervisors_bt
                        .entry((block_id.clone(), template_id.clone()))
                        .or_default() += 1;
                }
            }

            if template.activity().is_productive() {
                *productive_days
                    .entry(person_id.clone())
                    .or_default()
                    .entry(block.date())
                    .or_default() += 1;
                *load.entry(person_id.clone()).or_default() += 1;
                if let Some(pgy) = person.pgy() {
                    *pgy_load.entry(pgy).or_default() += 1;
                }
            }
            if template.activity() == crate::domain::ActivityType::Inpatient {
                inpatient_dates
                    .entry(person_id.clone())
                    .or_default()
                    .insert(block.date());
            }
            if template.has_tag("fmit") {
                fmit_weeks
                    .entry(person_id.clone())
                    .or_default()
                    .insert(monday_of(block.date()));
            }
            if template.has_tag("call") {
                call_slots
                    .entry(person_id.clone())
                    .or_default()
                    .insert((block.date(), block.half()));
            }
            *template_dates
                .entry((person_id, template_id))
                .or_default()
                .entry(block.date())
                .or_default() += 1;
        }

        let mut required_on_block: HashMap<Id, u32> = HashMap::new();
        for block in index.blocks_in_order() {
            let mut required: u32 = preserved_on_block.get(block.id()).copied().unwrap_or(0);
            for template in index.templates() {
                if template.is_solver_managed() && template.is_active_on(block.date()) {
                    required += template.min_residents();
                }
            }
            required_on_block.insert(block.id().to_owned(), required);
        }

        let mut eligible_residents: HashMap<Id, u32> = HashMap::new();
        for template in index.templates() {
            let count = index
                .people()
                .iter()
                .filter(|p| p.is_resident() && template.accepts(p))
                .count() as u32;
            eligible_residents.insert(template.id().to_owned(), count);
        }

        let mut pgy_head_count: HashMap<PgyLevel, u32> = HashMap::new();
        for person in index.people() {
            if let Some(pgy) = person.pgy() {
                *pgy_head_count.entry(pgy).or_default() += 1;
            }
        }

        let centrality = coverage_centrality(index);

        Self {
            index,
            preserved_residents_bt,
            preserved_supervisors_bt,
            preserved_on_block,
            required_on_block,
            inpatient_dates,
            fmit_weeks,
            eligible_residents,
            centrality,
            pgy_head_count,
            tentative: BTreeMap::new(),
            tentative_residents_bt: HashMap::new(),
            tentative_supervisors_bt: HashMap::new(),
            tentative_on_block: HashMap::new(),
            productive_days,
            call_slots,
            template_dates,
            load,
            pgy_load,
        }
    }

    pub fn index(&self) -> &'a RunIndex<'a> {
        self.index
    }

    pub fn person(&self, id: &str) -> Option<&'a Person> {
        self.index.person(id)
    }

    pub fn block(&self, id: &str) -> Option<&'a Block> {
        self.index.block(id)
    }

    pub fn template(&self, id: &str) -> Option<&'a RotationTemplate> {
        self.index.template(id)
    }

    // ── tentative overlay ─────────────────────────────────────────────

    /// Commits a candidate into the tentative overlay.
    ///
    /// The caller is responsible for having propagated the candidate
    /// first; `place` maintains tables, it does not re-validate.
    pub fn place(&mut self, slot: &CandidateSlot) {
        let (Some(person), Some(block), Some(template)) = (
            self.index.person(&slot.person_id),
            self.index.block(&slot.block_id),
            self.index.template(&slot.template_id),
        ) else {
            return;
        };

        self.tentative.insert(
            (slot.person_id.clone(), slot.block_id.clone()),
            slot.template_id.clone(),
        );
        let bt_key = (slot.block_id.clone(), slot.template_id.clone());
        match person.kind() {
            PersonKind::Resident => {
                *self.tentative_residents_bt.entry(bt_key).or_default() += 1;
            }
            PersonKind::Faculty => {
                *self.tentative_supervisors_bt.entry(bt_key).or_default() += 1;
            }
        }
        *self
            .tentative_on_block
            .entry(slot.block_id.clone())
            .or_default() += 1;
        *self
            .productive_days
            .entry(slot.person_id.clone())
            .or_default()
            .entry(block.date())
            .or_default() += 1;
        if template.has_tag("call") {
            self.call_slots
                .entry(slot.person_id.clone())
                .or_default()
                .insert((block.date(), block.half()));
        }
        *self
            .template_dates
            .entry((slot.person_id.clone(), slot.template_id.clone()))
            .or_default()
            .entry(block.date())
            .or_default() += 1;
        *self.load.entry(slot.person_id.clone()).or_default() += 1;
        if let Some(pgy) = person.pgy() {
            *self.pgy_load.entry(pgy).or_default() += 1;
        }
    }

    /// Removes a previously placed candidate from the overlay.
    pub fn unplace(&mut self, slot: &CandidateSlot) {
        let key = (slot.person_id.clone(), slot.block_id.clone());
        if self.tentative.remove(&key).is_none() {
            return;
        }
        let (Some(person), Some(block), Some(template)) = (
            self.index.person(&slot.person_id),
            self.index.block(&slot.block_id),
            self.index.template(&slot.template_id),
        ) else {
            return;
        };

        let bt_key = (slot.block_id.clone(), slot.template_id.clone());
        let counter = match person.kind() {
            PersonKind::Resident => self.tentative_residents_bt.entry(bt_key).or_default(),
            PersonKind::Faculty => self.tentative_supervisors_bt.entry(bt_key).or_default(),
        };
        *counter = counter.saturating_sub(1);

        if let Some(count) = self.tentative_on_block.get_mut(&slot.block_id) {
            *count = count.saturating_sub(1);
        }
        if let Some(days) = self.productive_days.get_mut(&slot.person_id) {
            if let Some(count) = days.get_mut(&block.date()) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    days.remove(&block.date());
                }
            }
        }
        if template.has_tag("call") {
            if let Some(slots) = self.call_slots.get_mut(&slot.person_id) {
                slots.remove(&(block.date(), block.half()));
            }
        }
        if let Some(dates) = self
            .template_dates
            .get_mut(&(slot.person_id.clone(), slot.template_id.clone()))
        {
            if let Some(count) = dates.get_mut(&block.date()) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    dates.remove(&block.date());
                }
            }
        }
        if let Some(count) = self.load.get_mut(&slot.person_id) {
            *count = count.saturating_sub(1);
        }
        if let Some(pgy) = person.pgy() {
            if let Some(count) = self.pgy_load.get_mut(&pgy) {
                *count = count.saturating_sub(1);
            }
        }
    }

    /// Tentative placements in deterministic (person, block) order.
    pub fn placements(&self) -> impl Iterator<Item = CandidateSlot> + '_ {
        self.tentative.iter().map(|((person, block), template)| {
            CandidateSlot::new(person.clone(), block.clone(), template.clone())
        })
    }

    pub fn placement_count(&self) -> usize {
        self.tentative.len()
    }

    // ── occupancy queries ─────────────────────────────────────────────

    /// True if (person, block) is taken by a preserved assignment or a
    /// tentative placement.
    pub fn is_occupied(&self, person_id: &str, block_id: &str) -> bool {
        self.index.is_occupied(person_id, block_id)
            || self
                .tentative
                .contains_key(&(person_id.to_owned(), block_id.to_owned()))
    }

    pub fn is_absent(&self, person_id: &str, date: NaiveDate) -> bool {
        self.index.is_absent(person_id, date)
    }

    /// Resident count on (block, template), preserved plus tentative.
    pub fn resident_count_on(&self, block_id: &str, template_id: &str) -> u32 {
        let key = (block_id.to_owned(), template_id.to_owned());
        self.preserved_residents_bt.get(&key).copied().unwrap_or(0)
            + self.tentative_residents_bt.get(&key).copied().unwrap_or(0)
    }

    /// Supervising faculty count on (block, template), preserved plus
    /// tentative.
    pub fn supervisor_count_on(&self, block_id: &str, template_id: &str) -> u32 {
        let key = (block_id.to_owned(), template_id.to_owned());
        self.preserved_supervisors_bt
            .get(&key)
            .copied()
            .unwrap_or(0)
            + self
                .tentative_supervisors_bt
                .get(&key)
                .copied()
                .unwrap_or(0)
    }

    /// Faculty free to supervise the template on the block right now, in
    /// person-id order.
    pub fn available_supervisors(
        &self,
        block: &Block,
        template: &RotationTemplate,
    ) -> Vec<&'a Person> {
        let mut eligible: Vec<&'a Person> = self
            .index
            .people()
            .iter()
            .filter(|p| {
                p.is_faculty()
                    && p.supervises()
                    && template.accepts(p)
                    && !self.is_occupied(p.id(), block.id())
                    && !self.is_absent(p.id(), block.date())
            })
            .collect();
        eligible.sort_by_key(|p| p.id().to_owned());
        eligible
    }

    /// True if the person has any productive half-day on the date.
    pub fn has_productive_work(&self, person_id: &str, date: NaiveDate) -> bool {
        self.productive_days
            .get(person_id)
            .is_some_and(|days| days.contains_key(&date))
    }

    /// Length of the consecutive call run through (date, half) if the
    /// person were assigned a call half-day there.
    pub fn call_run_if_added(&self, person_id: &str, date: NaiveDate, half: HalfDay) -> u32 {
        let slots = self.call_slots.get(person_id);
        let mut run = 1u32;

        let mut cursor = previous_half_day(date, half);
        while let Some(key) = cursor {
            if slots.is_some_and(|s| s.contains(&key)) {
                run += 1;
                cursor = previous_half_day(key.0, key.1);
            } else {
                break;
            }
        }
        let mut cursor = Some(next_half_day(date, half));
        while let Some(key) = cursor {
            if slots.is_some_and(|s| s.contains(&key)) {
                run += 1;
                cursor = Some(next_half_day(key.0, key.1));
            } else {
                break;
            }
        }
        run
    }

    /// Mondays of weeks during which the person serves on an
    /// FMIT-tagged template.
    pub fn fmit_weeks(&self, person_id: &str) -> Option<&BTreeSet<NaiveDate>> {
        self.fmit_weeks.get(person_id)
    }

    /// Dates with preserved inpatient duty for the person.
    pub fn has_inpatient_on(&self, person_id: &str, date: NaiveDate) -> bool {
        self.inpatient_dates
            .get(person_id)
            .is_some_and(|dates| dates.contains(&date))
    }

    /// Degree centrality of the person in the coverage graph, in [0, 1].
    pub fn centrality(&self, person_id: &str) -> f64 {
        self.centrality.get(person_id).copied().unwrap_or(0.0)
    }

    /// Residents eligible for the template, irrespective of occupancy.
    pub fn eligible_residents(&self, template_id: &str) -> u32 {
        self.eligible_residents
            .get(template_id)
            .copied()
            .unwrap_or(0)
    }

    /// Block utilization if one more assignment were placed on it.
    pub fn utilization_after_adding(&self, block_id: &str) -> f64 {
        let required = self.required_on_block.get(block_id).copied().unwrap_or(0);
        if required == 0 {
            return 0.0;
        }
        let assigned = self.preserved_on_block.get(block_id).copied().unwrap_or(0)
            + self.tentative_on_block.get(block_id).copied().unwrap_or(0)
            + 1;
        f64::from(assigned) / f64::from(required)
    }

    /// The template occupying the person's other half of the same day,
    /// tentative or preserved.
    pub fn other_half_template(
        &self,
        person_id: &str,
        date: NaiveDate,
        half: HalfDay,
    ) -> Option<&'a RotationTemplate> {
        let other = match half {
            HalfDay::Am => HalfDay::Pm,
            HalfDay::Pm => HalfDay::Am,
        };
        let block = self.index.block_at(date, other)?;
        if let Some(template_id) = self
            .tentative
            .get(&(person_id.to_owned(), block.id().to_owned()))
        {
            return self.index.template(template_id);
        }
        self.index
            .assignment_at(person_id, block.id())
            .and_then(|a| self.index.template(a.template_id()))
    }

    /// True if the person worked the template within `lookback` days
    /// before (or on) the date.
    pub fn recent_same_template(
        &self,
        person_id: &str,
        template_id: &str,
        date: NaiveDate,
        lookback: u64,
    ) -> bool {
        let Some(dates) = self
            .template_dates
            .get(&(person_id.to_owned(), template_id.to_owned()))
        else {
            return false;
        };
        let floor = date
            .checked_sub_days(Days::new(lookback))
            .unwrap_or(NaiveDate::MIN);
        dates.range(floor..=date).next().is_some()
    }

    /// Productive half-day load of the person (preserved + tentative).
    pub fn load_of(&self, person_id: &str) -> u32 {
        self.load.get(person_id).copied().unwrap_or(0)
    }

    /// Mean productive load across residents of the PGY cohort.
    pub fn pgy_peer_mean(&self, pgy: PgyLevel) -> f64 {
        let people = self.pgy_head_count.get(&pgy).copied().unwrap_or(0);
        if people == 0 {
            return 0.0;
        }
        let total = self.pgy_load.get(&pgy).copied().unwrap_or(0);
        f64::from(total) / f64::from(people)
    }
}

/// Monday of the ISO week containing `date`.
pub(crate) fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

fn previous_half_day(date: NaiveDate, half: HalfDay) -> Option<(NaiveDate, HalfDay)> {
    match half {
        HalfDay::Pm => Some((date, HalfDay::Am)),
        HalfDay::Am => date.checked_sub_days(Days::new(1)).map(|d| (d, HalfDay::Pm)),
    }
}

fn next_half_day(date: NaiveDate, half: HalfDay) -> (NaiveDate, HalfDay) {
    match half {
        HalfDay::Am => (date, HalfDay::Pm),
        HalfDay::Pm => (date + Days::new(1), HalfDay::Am),
    }
}

/// Degree centrality over the coverage graph: people are nodes, an edge
/// joins two people eligible for the same solver-managed template.
fn coverage_centrality(index: &RunIndex<'_>) -> HashMap<Id, f64> {
    let mut graph: UnGraph<Id, ()> = UnGraph::new_undirected();
    let mut nodes = HashMap::new();
    for person in index.people() {
        nodes.insert(person.id().to_owned(), graph.add_node(person.id().to_owned()));
    }

    let mut seen_edges = HashSet::new();
    for template in index.templates() {
        if !template.is_solver_managed() {
            continue;
        }
        let eligible: Vec<&Person> = index
            .people()
            .iter()
            .filter(|p| template.accepts(p))
            .collect();
        for (i, a) in eligible.iter().enumerate() {
            for b in eligible.iter().skip(i + 1) {
                let key = if a.id() < b.id() {
                    (a.id().to_owned(), b.id().to_owned())
                } else {
                    (b.id().to_owned(), a.id().to_owned())
                };
                if seen_edges.insert(key) {
                    graph.add_edge(nodes[a.id()], nodes[b.id()], ());
                }
            }
        }
    }

    let n = index.people().len();
    let denominator = if n > 1 { (n - 1) as f64 } else { 1.0 };
    index
        .people()
        .iter()
        .map(|p| {
            let degree = graph.neighbors(nodes[p.id()]).count() as f64;
            (p.id().to_owned(), degree / denominator)
        })
        .collect()
}
