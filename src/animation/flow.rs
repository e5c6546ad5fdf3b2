use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, trace};

use crate::animation::Easing;
use crate::core::accessor::{Accessor, FieldAccessor, Record, TextAccessor};
use crate::core::array;
use crate::error::{ChartError, ChartResult, DomainError};

/// Turns outcome percentages into cumulative probabilities in `(0, 1]`.
///
/// The last stop is forced to exactly 1 so rounding in the source
/// percentages can never leave a gap a random draw falls through.
pub fn stacked_probabilities(percentages: &[f64]) -> ChartResult<Vec<f64>> {
    if percentages.is_empty() {
        return Err(DomainError::empty("outcome percentages").into());
    }
    if percentages.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(ChartError::InvalidData(
            "outcome percentages must be finite and >= 0".to_owned(),
        ));
    }
    let last = percentages.len() - 1;
    let mut running = 0.0;
    Ok(percentages
        .iter()
        .enumerate()
        .map(|(i, percentage)| {
            running += percentage / 100.0;
            if i == last { 1.0 } else { running }
        })
        .collect())
}

/// A starting population and the cumulative odds of each outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowGroup {
    pub key: String,
    pub stacked: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowConfig {
    /// Hard cap on people in flight; spawns beyond it are refused.
    pub max_people: usize,
    /// Time one person takes to cross from start to end.
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_people: 10_000,
            duration_ms: 5_000.0,
            easing: Easing::CubicInOut,
        }
    }
}

/// One simulated individual moving from its group to its outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Person {
    pub id: u64,
    pub group: usize,
    pub outcome: usize,
    /// Fraction of the trip done, in `[0, 1]`.
    pub progress: f64,
}

impl Person {
    /// Position with x linear in progress and y eased from the start lane to
    /// the end lane.
    #[must_use]
    pub fn position(&self, width: f64, start_y: f64, end_y: f64, easing: Easing) -> (f64, f64) {
        let t = easing.apply(self.progress);
        (self.progress * width, start_y + (end_y - start_y) * t)
    }
}

/// Flow of people from starting groups to outcomes, sankey style.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSimulation {
    groups: Vec<FlowGroup>,
    outcome_count: usize,
    config: FlowConfig,
    people: VecDeque<Person>,
    next_id: u64,
    /// Completed trips per `[group][outcome]`.
    tallies: Vec<Vec<usize>>,
}

impl FlowSimulation {
    pub fn new(groups: Vec<FlowGroup>, config: FlowConfig) -> ChartResult<Self> {
        let outcome_count = groups
            .first()
            .map(|group| group.stacked.len())
            .ok_or_else(|| DomainError::empty("flow groups"))?;
        if outcome_count == 0 || groups.iter().any(|group| group.stacked.len() != outcome_count) {
            return Err(ChartError::InvalidData(
                "every flow group needs the same non-zero number of outcomes".to_owned(),
            ));
        }
        if config.max_people == 0 || !config.duration_ms.is_finite() || config.duration_ms <= 0.0 {
            return Err(ChartError::InvalidData(
                "flow config needs max_people > 0 and a positive duration".to_owned(),
            ));
        }
        let tallies = vec![vec![0; outcome_count]; groups.len()];
        Ok(Self {
            groups,
            outcome_count,
            config,
            people: VecDeque::new(),
            next_id: 0,
            tallies,
        })
    }

    /// Builds groups from records: the group key joins `key_fields` with
    /// `--`, and `outcome_fields` hold the percentage for each outcome.
    pub fn from_records(
        records: &[Record],
        key_fields: &[&str],
        outcome_fields: &[&str],
        config: FlowConfig,
    ) -> ChartResult<Self> {
        let keys: Vec<TextAccessor> = key_fields.iter().map(|f| TextAccessor::new(*f)).collect();
        let outcomes: Vec<FieldAccessor> =
            outcome_fields.iter().map(|f| FieldAccessor::new(*f)).collect();

        let groups = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let key = keys
                    .iter()
                    .map(|accessor| read(accessor, record, index))
                    .collect::<ChartResult<Vec<_>>>()?
                    .join("--");
                let percentages = outcomes
                    .iter()
                    .map(|accessor| read(accessor, record, index))
                    .collect::<ChartResult<Vec<_>>>()?;
                Ok(FlowGroup {
                    key,
                    stacked: stacked_probabilities(&percentages)?,
                })
            })
            .collect::<ChartResult<Vec<_>>>()?;
        debug!(groups = groups.len(), outcomes = outcome_fields.len(), "flow groups built");
        Self::new(groups, config)
    }

    #[must_use]
    pub fn groups(&self) -> &[FlowGroup] {
        &self.groups
    }

    #[must_use]
    pub fn group_index(&self, key: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.key == key)
    }

    #[must_use]
    pub fn outcome_count(&self) -> usize {
        self.outcome_count
    }

    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.people.len()
    }

    #[must_use]
    pub fn tally(&self, group: usize, outcome: usize) -> usize {
        self.tallies
            .get(group)
            .and_then(|row| row.get(outcome))
            .copied()
            .unwrap_or(0)
    }

    /// Total completed trips ending in `outcome`, across groups.
    #[must_use]
    pub fn outcome_total(&self, outcome: usize) -> usize {
        self.tallies
            .iter()
            .filter_map(|row| row.get(outcome))
            .sum()
    }

    /// Outcome index for a draw `u` in `[0, 1)` within `group`.
    #[must_use]
    pub fn outcome_for(&self, group: usize, u: f64) -> Option<usize> {
        let stacked = &self.groups.get(group)?.stacked;
        Some(array::bisect_right(stacked, u).min(self.outcome_count - 1))
    }

    /// Draws a uniformly random group, then an outcome from its odds.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        let group = rng.random_range(0..self.groups.len());
        let outcome = self
            .outcome_for(group, rng.random::<f64>())
            .unwrap_or(self.outcome_count - 1);
        (group, outcome)
    }

    /// Adds a person unless the cap is reached.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Person> {
        if self.people.len() >= self.config.max_people {
            trace!(cap = self.config.max_people, "flow at capacity; spawn refused");
            return None;
        }
        let (group, outcome) = self.sample(rng);
        let person = Person {
            id: self.next_id,
            group,
            outcome,
            progress: 0.0,
        };
        self.next_id += 1;
        self.people.push_back(person);
        Some(person)
    }

    /// Moves everyone forward by `delta_ms`; people who arrive are removed,
    /// tallied and returned.
    pub fn advance(&mut self, delta_ms: f64) -> Vec<Person> {
        let step = if delta_ms.is_finite() {
            delta_ms.max(0.0) / self.config.duration_ms
        } else {
            0.0
        };
        let mut arrived = Vec::new();
        self.people.retain_mut(|person| {
            person.progress = (person.progress + step).min(1.0);
            if person.progress >= 1.0 {
                arrived.push(*person);
                false
            } else {
                true
            }
        });
        for person in &arrived {
            self.tallies[person.group][person.outcome] += 1;
        }
        if !arrived.is_empty() {
            trace!(arrived = arrived.len(), in_flight = self.people.len(), "flow advanced");
        }
        arrived
    }
}

fn read<A>(accessor: &A, record: &Record, index: usize) -> ChartResult<A::Output>
where
    A: Accessor<Record>,
{
    accessor.get(record).ok_or_else(|| ChartError::MissingField {
        field: accessor.name().to_owned(),
        index,
    })
}
