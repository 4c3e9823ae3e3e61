//! Stateless reductions over a [`FilteredView`](crate::filter::FilteredView).
//!
//! Every aggregator accepts an empty view and returns empty or zero-valued
//! output. None depend on the order of events in the view.

pub mod duration;
pub mod ranking;
pub mod ratios;
pub mod temporal;

pub use duration::*;
pub use ranking::*;
pub use ratios::*;
pub use temporal::*;

use crate::model::{PlayEvent, MS_PER_MINUTE};
use std::collections::BTreeMap;

/// Play count and summed duration of one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub plays: usize,
    pub ms: u128,
}

impl Tally {
    pub(crate) fn add(&mut self, event: &PlayEvent) {
        self.plays += 1;
        self.ms += u128::from(event.ms_played);
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn minutes(self) -> f64 {
        self.ms as f64 / MS_PER_MINUTE
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn mean_minutes(self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            self.minutes() / self.plays as f64
        }
    }
}

/// Groups events by `key`, in key order.
pub(crate) fn tally_by<'a, K, I, F>(events: I, key: F) -> BTreeMap<K, Tally>
where
    K: Ord,
    I: IntoIterator<Item = &'a PlayEvent>,
    F: Fn(&PlayEvent) -> K,
{
    let mut groups: BTreeMap<K, Tally> = BTreeMap::new();
    for event in events {
        groups.entry(key(event)).or_default().add(event);
    }
    groups
}
