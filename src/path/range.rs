//! Path range enumeration.
//!
//! A range `start..=end` is walked most-significant component first. At each
//! level the component runs from a lower to an upper bound:
//!
//! ```text
//! lower = start[k]  while every earlier component equals start[..k], else 0
//! upper = end[k]    while every earlier component equals end[..k],   else 255
//! ```
//!
//! So `[0,0]..=[1,1]` yields `[0,0]..=[0,255]` followed by `[1,0]`, `[1,1]`
//! (258 paths). A branch whose lower bound exceeds its upper bound is empty.

use crate::path::types::{HdPath, PathError, PathResult};

/// Upper bound of a component once it is no longer pinned to the end path.
pub const MAX_ROAMING_COMPONENT: u32 = 255;

/// Inclusive range of hardened paths of equal depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRange {
    start: HdPath,
    end: HdPath,
}

impl PathRange {
    /// Create a range, rejecting endpoints of different depth.
    pub fn new(start: HdPath, end: HdPath) -> PathResult<Self> {
        if start.len() != end.len() {
            return Err(PathError::LengthMismatch {
                start: start.len(),
                end: end.len(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse both endpoints from their text form.
    pub fn parse(start: &str, end: &str) -> PathResult<Self> {
        Self::new(start.parse()?, end.parse()?)
    }

    pub fn start(&self) -> &HdPath {
        &self.start
    }

    pub fn end(&self) -> &HdPath {
        &self.end
    }

    /// Depth shared by both endpoints.
    pub fn depth(&self) -> usize {
        self.start.len()
    }

    /// Lazily walk the range in ascending order.
    ///
    /// Every call starts a fresh walk.
    pub fn iter(&self) -> PathRangeIter<'_> {
        PathRangeIter {
            start: self.start.components(),
            end: self.end.components(),
            frames: Vec::with_capacity(self.depth()),
            started: false,
        }
    }

    /// Exact number of paths the range yields, saturating at `u128::MAX`.
    pub fn count_paths(&self) -> u128 {
        count_level(self.start.components(), self.end.components(), 0, true, true)
    }
}

impl<'a> IntoIterator for &'a PathRange {
    type Item = HdPath;
    type IntoIter = PathRangeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collect every path between `start` and `end`.
pub fn enumerate(start: &HdPath, end: &HdPath) -> PathResult<Vec<HdPath>> {
    let range = PathRange::new(start.clone(), end.clone())?;
    Ok(range.iter().collect())
}

/// One level of the depth-first walk.
#[derive(Debug, Clone, Copy)]
struct Frame {
    value: u32,
    upper: u32,
    on_start: bool,
    on_end: bool,
}

/// Iterator over the paths of a [`PathRange`].
#[derive(Debug, Clone)]
pub struct PathRangeIter<'a> {
    start: &'a [u32],
    end: &'a [u32],
    frames: Vec<Frame>,
    started: bool,
}

impl PathRangeIter<'_> {
    /// Push the first value of the next level. Returns false if that level is
    /// empty under the current prefix.
    fn push_level(&mut self) -> bool {
        let level = self.frames.len();
        let (parent_on_start, parent_on_end) = self
            .frames
            .last()
            .map_or((true, true), |f| (f.on_start, f.on_end));

        let lower = if parent_on_start { self.start[level] } else { 0 };
        let upper = if parent_on_end {
            self.end[level]
        } else {
            MAX_ROAMING_COMPONENT
        };
        if lower > upper {
            return false;
        }

        self.frames.push(Frame {
            value: lower,
            upper,
            on_start: parent_on_start,
            on_end: parent_on_end && lower == self.end[level],
        });
        true
    }

    /// Move to the next sibling, popping exhausted levels. Returns false when
    /// the walk is finished.
    fn advance(&mut self) -> bool {
        while let Some(frame) = self.frames.last_mut() {
            if frame.value < frame.upper {
                frame.value += 1;
                let level = self.frames.len() - 1;
                let end_digit = self.end[level];
                let parent_on_end = level == 0 || self.frames[level - 1].on_end;
                let frame = &mut self.frames[level];
                frame.on_start = false;
                frame.on_end = parent_on_end && frame.value == end_digit;
                return true;
            }
            self.frames.pop();
        }
        false
    }
}

impl Iterator for PathRangeIter<'_> {
    type Item = HdPath;

    fn next(&mut self) -> Option<Self::Item> {
        let depth = self.start.len();
        loop {
            if self.started {
                if !self.advance() {
                    return None;
                }
            } else {
                self.started = true;
            }

            while self.frames.len() < depth && self.push_level() {}

            if self.frames.len() == depth {
                let components = self.frames.iter().map(|f| f.value).collect();
                return Some(HdPath::from_validated(components));
            }
            if self.frames.is_empty() {
                return None;
            }
        }
    }
}

fn count_level(start: &[u32], end: &[u32], level: usize, on_start: bool, on_end: bool) -> u128 {
    let lower = if on_start { start[level] } else { 0 };
    let upper = if on_end { end[level] } else { MAX_ROAMING_COMPONENT };
    if lower > upper {
        return 0;
    }

    let width = (upper - lower) as u128 + 1;
    if level + 1 == start.len() {
        return width;
    }

    // Each unconstrained value contributes a full subtree.
    let remaining = (start.len() - level - 1) as u32;
    let full = (MAX_ROAMING_COMPONENT as u128 + 1)
        .checked_pow(remaining)
        .unwrap_or(u128::MAX);

    let mut total: u128 = 0;
    let mut free = width;
    if on_start {
        total = total.saturating_add(count_level(start, end, level + 1, true, on_end && lower == upper));
        free -= 1;
    }
    if on_end && !(on_start && lower == upper) {
        total = total.saturating_add(count_level(start, end, level + 1, false, true));
        free -= 1;
    }
    total.saturating_add(free.saturating_mul(full))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(components: &[u32]) -> HdPath {
        HdPath::new(components.to_vec()).unwrap()
    }

    #[test]
    fn test_single_component_range() {
        assert_eq!(enumerate(&p(&[3]), &p(&[3])).unwrap(), vec![p(&[3])]);
        assert_eq!(enumerate(&p(&[1]), &p(&[4])).unwrap().len(), 4);
    }

    #[test]
    fn test_boundary_branch_rule() {
        let paths = enumerate(&p(&[0, 0]), &p(&[1, 1])).unwrap();
        assert_eq!(paths.len(), 258);

        let mut expected: Vec<HdPath> = (0..=255).map(|k| p(&[0, k])).collect();
        expected.push(p(&[1, 0]));
        expected.push(p(&[1, 1]));
        assert_eq!(paths, expected);
    }

    #[test]
    fn test_ascending_unique_and_inclusive() {
        let start = p(&[2, 250, 7]);
        let end = p(&[3, 1, 4]);
        let paths = enumerate(&start, &end).unwrap();

        assert_eq!(paths.first(), Some(&start));
        assert_eq!(paths.last(), Some(&end));
        for pair in paths.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_shared_prefix_with_large_coin_type() {
        let range = PathRange::parse("44'/397'/0'/0'/1'", "44'/397'/0'/0'/3'").unwrap();
        let paths: Vec<String> = range.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            paths,
            vec!["44'/397'/0'/0'/1'", "44'/397'/0'/0'/2'", "44'/397'/0'/0'/3'"]
        );
    }

    #[test]
    fn test_inverted_ranges_are_empty() {
        assert!(enumerate(&p(&[5]), &p(&[4])).unwrap().is_empty());
        assert!(enumerate(&p(&[1, 5]), &p(&[1, 4])).unwrap().is_empty());
        assert!(enumerate(&p(&[2, 0]), &p(&[1, 9])).unwrap().is_empty());
    }

    #[test]
    fn test_deeper_inversion_only_empties_boundary_branch() {
        // start[1] > end[1], but the leading digits differ
        let paths = enumerate(&p(&[0, 200]), &p(&[1, 3])).unwrap();
        assert_eq!(paths.len(), 56 + 4);
        assert_eq!(paths[0], p(&[0, 200]));
        assert_eq!(paths[56], p(&[1, 0]));
    }

    #[test]
    fn test_count_matches_iteration() {
        let cases = [
            (vec![3], vec![3]),
            (vec![0, 0], vec![1, 1]),
            (vec![0, 200], vec![1, 3]),
            (vec![1, 2, 3], vec![1, 2, 9]),
            (vec![1, 254, 250], vec![2, 0, 3]),
            (vec![1, 5], vec![1, 4]),
            (vec![44, 397, 0], vec![44, 397, 2]),
        ];
        for (start, end) in cases {
            let range = PathRange::new(p(&start), p(&end)).unwrap();
            assert_eq!(
                range.count_paths(),
                range.iter().count() as u128,
                "{:?}..={:?}",
                start,
                end
            );
        }
    }

    #[test]
    fn test_restartable() {
        let range = PathRange::parse("0'/254'", "1'/1'").unwrap();
        let first: Vec<HdPath> = range.iter().collect();
        let second: Vec<HdPath> = (&range).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_length_mismatch() {
        let err = PathRange::new(p(&[1]), p(&[1, 2])).unwrap_err();
        assert_eq!(err, PathError::LengthMismatch { start: 1, end: 2 });
    }

    #[test]
    fn test_wide_count_saturates_without_enumerating() {
        let range = PathRange::new(p(&[0; 20]), p(&[255; 20])).unwrap();
        assert_eq!(range.count_paths(), u128::MAX);
    }
}
