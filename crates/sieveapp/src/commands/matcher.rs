use crate::model::{Collection, ItemId};
use crate::query::Predicate;

/// Partition of a collection's direct children. Together `found` and `hidden` cover
/// every child exactly once, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub found: Vec<ItemId>,
    pub hidden: Vec<ItemId>,
}

pub fn match_target(collection: &Collection, predicate: &Predicate) -> MatchOutcome {
    let (found, hidden): (Vec<_>, Vec<_>) = collection
        .items
        .iter()
        .partition(|item| predicate.matches(*item));

    MatchOutcome {
        found: found.into_iter().map(|i| i.id).collect(),
        hidden: hidden.into_iter().map(|i| i.id).collect(),
    }
}
