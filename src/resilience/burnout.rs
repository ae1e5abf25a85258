//! SIR-style burnout cascade estimation.
//!
//! Treats overload as a contagion over the contact graph: people
//! sharing blocks are in contact, people past the overload threshold
//! are infectious, and colleagues in the warning band are susceptible.
//! The estimator reports Rₜ — the mean number of susceptible contacts
//! an overloaded person exposes, damped by the transmission factor. It
//! never mutates schedule state.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};

use super::report::BurnoutReport;
use crate::domain::RunIndex;
use crate::Id;

/// Personal utilization above this marks a person overloaded.
const OVERLOAD_THRESHOLD: f64 = 0.8;

/// Personal utilization above this (and below overload) marks a person
/// susceptible to cascade.
const SUSCEPTIBLE_THRESHOLD: f64 = 0.6;

/// Fraction of an overloaded person's exposure that converts.
const TRANSMISSION_FACTOR: f64 = 0.5;

/// Estimates the burnout reproduction number for the schedule.
pub fn estimate(index: &RunIndex<'_>) -> BurnoutReport {
    let total_half_days = index.blocks_in_order().count() as f64;
    if total_half_days == 0.0 || index.people().is_empty() {
        return BurnoutReport::default();
    }

    // Personal utilization: productive half-days over window half-days.
    let mut utilization: HashMap<&str, f64> = HashMap::new();
    for person in index.people() {
        let worked = index
            .assignments_for_person(person.id())
            .filter(|a| {
                index
                    .template(a.template_id())
                    .is_some_and(|t| t.activity().is_productive())
            })
            .count() as f64;
        utilization.insert(person.id(), worked / total_half_days);
    }

    // Contact graph: an edge per pair sharing at least one block.
    let mut graph: UnGraph<Id, ()> = UnGraph::new_undirected();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for person in index.people() {
        nodes.insert(person.id(), graph.add_node(person.id().to_owned()));
    }
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for block in index.blocks_in_order() {
        let on_block: Vec<&str> = index
            .assignments_on_block(block.id())
            .map(|a| a.person_id())
            .collect();
        for (i, a) in on_block.iter().enumerate() {
            for b in on_block.iter().skip(i + 1) {
                let key = if a < b { (*a, *b) } else { (*b, *a) };
                if seen.insert(key) {
                    if let (Some(&na), Some(&nb)) = (nodes.get(*a), nodes.get(*b)) {
                        graph.add_edge(na, nb, ());
                    }
                }
            }
        }
    }

    let mut overloaded: Vec<Id> = Vec::new();
    let mut at_risk: HashSet<Id> = HashSet::new();
    let mut exposure_total = 0.0;

    let mut ids: Vec<&str> = index.people().iter().map(|p| p.id()).collect();
    ids.sort_unstable();
    for id in ids {
        let u = utilization.get(id).copied().unwrap_or(0.0);
        if u <= OVERLOAD_THRESHOLD {
            continue;
        }
        overloaded.push(id.to_owned());
        let mut exposed = 0u32;
        for neighbor in graph.neighbors(nodes[id]) {
            let neighbor_id = graph[neighbor].clone();
            let nu = utilization.get(neighbor_id.as_str()).copied().unwrap_or(0.0);
            if nu > SUSCEPTIBLE_THRESHOLD && nu <= OVERLOAD_THRESHOLD {
                exposed += 1;
                at_risk.insert(neighbor_id);
            }
        }
        exposure_total += f64::from(exposed) * TRANSMISSION_FACTOR;
    }

    let r_t = if overloaded.is_empty() {
        0.0
    } else {
        exposure_total / overloaded.len() as f64
    };

    let mut at_risk: Vec<Id> = at_risk.into_iter().collect();
    at_risk.sort_unstable();

    BurnoutReport {
        r_t,
        overloaded,
        at_risk,
    }
}
