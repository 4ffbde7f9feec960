use crate::model::{Collection, ItemId};
use std::collections::HashSet;

/// Reconciles the hidden state of every direct child with `found` and returns how many
/// children changed. Children are hidden exactly when absent from `found`.
pub fn apply(collection: &mut Collection, found: &HashSet<ItemId>) -> usize {
    let mut changed = 0;
    for item in &mut collection.items {
        let hidden = !found.contains(&item.id);
        if item.hidden != hidden {
            item.hidden = hidden;
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;

    #[test]
    fn test_hides_everything_not_found() {
        let mut list = Collection::new("list")
            .with_item(Item::new("a"))
            .with_item(Item::new("b"));
        let found: HashSet<_> = [list.items[0].id].into_iter().collect();

        assert_eq!(apply(&mut list, &found), 1);
        assert!(!list.items[0].hidden);
        assert!(list.items[1].hidden);
    }

    #[test]
    fn test_reveals_previously_hidden() {
        let mut hidden = Item::new("a");
        hidden.hidden = true;
        let mut list = Collection::new("list").with_item(hidden);
        let found: HashSet<_> = [list.items[0].id].into_iter().collect();

        assert_eq!(apply(&mut list, &found), 1);
        assert!(!list.items[0].hidden);
        assert_eq!(apply(&mut list, &found), 0);
    }

    #[test]
    fn test_grandchildren_untouched() {
        let mut child = Item::new("nested");
        child.hidden = true;
        let mut list = Collection::new("list").with_item(Item::new("a").with_child(child));

        apply(&mut list, &HashSet::new());

        assert!(list.items[0].hidden);
        assert!(list.items[0].children[0].hidden);

        let found: HashSet<_> = [list.items[0].id].into_iter().collect();
        apply(&mut list, &found);
        assert!(list.items[0].children[0].hidden);
    }
}
