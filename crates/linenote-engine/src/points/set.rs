use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use super::InsertionPoint;

/// The insertion points of one file, indexed two ways.
///
/// By origin line: at most one point per line, used to fold repeated
/// recordings into the same point. By emission line: the points that write
/// after a given line, in ascending origin order, so two calls that both
/// emit before one closing brace come out in source order.
#[derive(Debug, Default)]
pub struct InsertionPointSet {
    by_origin: BTreeMap<usize, InsertionPoint>,
    by_emission: BTreeMap<usize, Vec<usize>>,
}

impl InsertionPointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `point` into both indexes.
    ///
    /// Returns false, dropping the new point, when its origin line already
    /// has one; the caller should append to the existing point instead.
    pub fn add(&mut self, point: InsertionPoint) -> bool {
        if self.by_origin.contains_key(&point.origin_line) {
            return false;
        }
        let bucket = self.by_emission.entry(point.emission_line).or_default();
        bucket.push(point.origin_line);
        bucket.sort_unstable();
        self.by_origin.insert(point.origin_line, point);
        true
    }

    pub fn by_origin(&self, line: usize) -> Option<&InsertionPoint> {
        self.by_origin.get(&line)
    }

    pub fn by_origin_mut(&mut self, line: usize) -> Option<&mut InsertionPoint> {
        self.by_origin.get_mut(&line)
    }

    /// Points emitting after `line`, ascending by origin line.
    pub fn by_emission_line(&self, line: usize) -> Vec<&InsertionPoint> {
        self.by_emission
            .get(&line)
            .map(|origins| {
                origins
                    .iter()
                    .filter_map(|origin| self.by_origin.get(origin))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All points in origin-line order.
    pub fn iter(&self) -> impl Iterator<Item = &InsertionPoint> {
        self.by_origin.values()
    }

    pub fn len(&self) -> usize {
        self.by_origin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_origin.is_empty()
    }

    /// Line ranges kept in compact output, one per point.
    pub fn compact_ranges(&self) -> Vec<RangeInclusive<usize>> {
        self.iter().map(InsertionPoint::coverage).collect()
    }
}
