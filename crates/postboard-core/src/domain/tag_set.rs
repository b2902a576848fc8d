//! Set algebra behind the post/tag association.

use std::collections::BTreeSet;

/// An unordered, duplicate-free set of tag ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<i32>);

/// Changes needed to turn one tag set into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    pub additions: Vec<i32>,
    pub removals: Vec<i32>,
}

impl TagDiff {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: i32) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.iter().collect()
    }

    /// Ids in `self` that are missing from `current`.
    pub fn missing_from(&self, current: &TagSet) -> Vec<i32> {
        self.0.difference(&current.0).copied().collect()
    }

    /// additions = target - current, removals = current - target.
    pub fn diff(current: &TagSet, target: &TagSet) -> TagDiff {
        TagDiff {
            additions: target.missing_from(current),
            removals: current.missing_from(target),
        }
    }
}

impl FromIterator<i32> for TagSet {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<i32>> for TagSet {
    fn from(ids: Vec<i32>) -> Self {
        ids.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[i32]) -> TagSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_duplicates_collapse() {
        let tags = set(&[3, 1, 3, 2, 1]);
        assert_eq!(tags.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_diff_overlapping_sets() {
        let diff = TagSet::diff(&set(&[1, 2, 3]), &set(&[2, 3, 4]));
        assert_eq!(diff.additions, vec![4]);
        assert_eq!(diff.removals, vec![1]);
    }

    #[test]
    fn test_diff_disjoint_and_empty() {
        let diff = TagSet::diff(&set(&[1, 2]), &set(&[]));
        assert!(diff.additions.is_empty());
        assert_eq!(diff.removals, vec![1, 2]);

        let diff = TagSet::diff(&set(&[]), &set(&[5, 6]));
        assert_eq!(diff.additions, vec![5, 6]);
        assert!(diff.removals.is_empty());
    }

    #[test]
    fn test_diff_of_equal_sets_is_empty() {
        assert!(TagSet::diff(&set(&[7, 8]), &set(&[8, 7])).is_empty());
    }
}
