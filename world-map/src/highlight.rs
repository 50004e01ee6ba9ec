use std::collections::HashSet;

use crate::core::MapRead;

/// Country names to paint as highlighted. Matching is exact.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightSet<'a> {
    names: HashSet<&'a str>,
    ordered: Vec<&'a str>,
}

impl<'a> HighlightSet<'a> {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a S>,
        S: AsRef<str> + ?Sized + 'a,
    {
        let mut set = Self::default();
        for name in names {
            let name = name.as_ref();
            if set.names.insert(name) {
                set.ordered.push(name);
            }
        }
        set
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.ordered.iter().copied()
    }

    /// Names with no region on `map`, in insertion order.
    pub fn unmatched<M: MapRead + ?Sized>(&self, map: &M) -> Vec<&'a str> {
        self.ordered
            .iter()
            .copied()
            .filter(|name| map.region_by_name(name).is_none())
            .collect()
    }
}
