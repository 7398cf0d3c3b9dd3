//! Flattened, globally indexed view of a script.

use crate::script::{Script, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub global_index: usize,
    pub phase_index: usize,
    /// Global index of the first step of the owning phase.
    pub phase_start: usize,
    pub step_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn build(script: &Script) -> Self {
        let mut entries = Vec::with_capacity(script.step_count());
        for (phase_index, phase) in script.phases.iter().enumerate() {
            let phase_start = entries.len();
            for step_index in 0..phase.steps.len() {
                entries.push(TimelineEntry {
                    global_index: entries.len(),
                    phase_index,
                    phase_start,
                    step_index,
                });
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<TimelineEntry> {
        self.entries.get(index).copied()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn last_index(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    /// Global index of the first step of `phase_index`, `None` for phases
    /// without steps.
    pub fn phase_start(&self, phase_index: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.phase_index == phase_index)
            .map(|entry| entry.phase_start)
    }

    /// Resolve an entry back to the step it was built from.
    pub fn step<'s>(&self, script: &'s Script, entry: TimelineEntry) -> Option<&'s Step> {
        script
            .phases
            .get(entry.phase_index)
            .and_then(|phase| phase.steps.get(entry.step_index))
    }
}
