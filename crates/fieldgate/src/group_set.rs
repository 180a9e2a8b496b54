//! Reference-counted multiset of group names.
//!
//! The same group can be pushed at several nesting depths during a single
//! walk (two sibling subtrees inheriting it independently, for instance).
//! Counting instead of storing a plain set keeps `pop` correct when one
//! scope finishes while another still holds the group.

use std::collections::HashMap;

/// A multiset of group names. A group is active iff its count is above zero.
///
/// `push` and `pop` must be called in matching pairs with the same names;
/// this is not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSet {
    counts: HashMap<String, usize>,
}

impl GroupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count of every name in `names`.
    pub fn push<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            *self.counts.entry(name.as_ref().to_owned()).or_insert(0) += 1;
        }
    }

    /// Decrement the count of every name in `names`. Names that drop to zero
    /// are removed so `len` only reports active groups.
    pub fn pop<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            if let Some(count) = self.counts.get_mut(name) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.counts.remove(name);
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    /// True iff any name in `names` is active.
    pub fn contains_any<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().any(|name| self.contains(name.as_ref()))
    }

    /// Number of open scopes currently holding `name`.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Number of distinct active groups.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for GroupSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let names: Vec<S> = iter.into_iter().collect();
        let mut set = GroupSet::new();
        set.push(&names);
        set
    }
}
