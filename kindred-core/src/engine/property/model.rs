//! Flat reference model: every key carries the label of its classification.
//!
//! Relabelling is linear in the number of keys, which is irrelevant at the
//! sizes the property suites use and keeps each rule obviously correct.

use std::collections::{BTreeMap, BTreeSet};

use super::types::Operation;

#[derive(Clone, Debug, Default)]
pub(super) struct LabelModel {
    labels: BTreeMap<u8, u32>,
    next_label: u32,
}

impl LabelModel {
    pub(super) fn len(&self) -> usize {
        self.labels.len()
    }

    pub(super) fn classification(&self) -> usize {
        self.labels.values().collect::<BTreeSet<_>>().len()
    }

    pub(super) fn contains(&self, key: u8) -> bool {
        self.labels.contains_key(&key)
    }

    pub(super) fn sibling_count(&self, key: u8) -> usize {
        self.labels.get(&key).map_or(0, |&label| {
            self.labels.values().filter(|&&other| other == label).count()
        })
    }

    /// Sorted groups of sorted keys.
    pub(super) fn groups(&self) -> Vec<Vec<u8>> {
        let mut by_label: BTreeMap<u32, Vec<u8>> = BTreeMap::new();
        for (&key, &label) in &self.labels {
            by_label.entry(label).or_default().push(key);
        }
        let mut groups: Vec<Vec<u8>> = by_label.into_values().collect();
        groups.sort();
        groups
    }

    /// Applies `operation` and returns what the engine should report.
    pub(super) fn apply(&mut self, operation: Operation) -> bool {
        match operation {
            Operation::Add { key } => {
                if self.contains(key) {
                    return false;
                }
                let label = self.fresh_label();
                self.labels.insert(key, label);
                true
            }
            Operation::AddTo { key, target } => {
                if self.contains(key) {
                    return false;
                }
                let Some(&label) = self.labels.get(&target) else {
                    return false;
                };
                self.labels.insert(key, label);
                true
            }
            Operation::Del { key } => self.labels.remove(&key).is_some(),
            Operation::DelAll { key } => {
                let Some(&label) = self.labels.get(&key) else {
                    return false;
                };
                self.labels.retain(|_, &mut other| other != label);
                true
            }
            Operation::DelExcept { key } => {
                let Some(&label) = self.labels.get(&key) else {
                    return false;
                };
                self.labels
                    .retain(|&member, &mut other| member == key || other != label);
                self.relabel_fresh(key);
                true
            }
            Operation::Join { key } => {
                if !self.contains(key) {
                    return false;
                }
                self.relabel_fresh(key);
                true
            }
            Operation::JoinTo { key, target } => {
                let (true, Some(&label)) = (self.contains(key), self.labels.get(&target)) else {
                    return false;
                };
                self.labels.insert(key, label);
                true
            }
            Operation::Merge { x, y } => {
                let (Some(&keep), Some(&absorb)) = (self.labels.get(&x), self.labels.get(&y))
                else {
                    return false;
                };
                for label in self.labels.values_mut() {
                    if *label == absorb {
                        *label = keep;
                    }
                }
                true
            }
            Operation::Find { key } => self.contains(key),
        }
    }

    fn relabel_fresh(&mut self, key: u8) {
        let label = self.fresh_label();
        self.labels.insert(key, label);
    }

    fn fresh_label(&mut self) -> u32 {
        let label = self.next_label;
        self.next_label += 1;
        label
    }
}
