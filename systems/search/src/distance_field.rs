//! Grassfire distance field flooded outward from the goal.

use std::collections::VecDeque;

use pathguess_core::{CellCoord, Direction, GridSize};

/// Marker stored for cells the flood never reached.
pub(crate) const UNREACHED: u32 = u32::MAX;

/// Dense Manhattan-distance grid seeded from a single source cell.
///
/// Distances default to [`UNREACHED`] for blocked or disconnected cells so
/// callers can tell walls apart from traversable cells.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    size: Option<GridSize>,
    distances: Vec<u32>,
    flood_order: Vec<CellCoord>,
}

impl DistanceField {
    /// Rebuilds the distances using a breadth-first flood from `source`.
    pub(crate) fn rebuild_with<F>(&mut self, size: GridSize, source: CellCoord, mut is_blocked: F)
    where
        F: FnMut(CellCoord) -> bool,
    {
        let cell_count = size.cell_count();
        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHED; cell_count];
        } else {
            self.distances.fill(UNREACHED);
        }
        self.size = Some(size);
        self.flood_order.clear();

        let Some(source_index) = size.index(source) else {
            return;
        };
        if is_blocked(source) {
            return;
        }

        self.distances[source_index] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(cell) = queue.pop_front() {
            self.flood_order.push(cell);
            let Some(current_index) = size.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for direction in Direction::EXPANSION_ORDER {
                let neighbor = cell.neighbor(direction);
                let Some(neighbor_index) = size.index(neighbor) else {
                    continue;
                };
                if is_blocked(neighbor) {
                    continue;
                }
                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, if it lies within the field.
    #[must_use]
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u32> {
        let index = self.size?.index(cell)?;
        self.distances.get(index).copied()
    }

    /// Cells in the order the flood settled them.
    #[must_use]
    pub(crate) fn flood_order(&self) -> &[CellCoord] {
        &self.flood_order
    }

    /// Walks downhill from `from` until the source is reached.
    ///
    /// Returns the visited cells excluding `from`, or an empty vector when
    /// `from` was never reached by the flood.
    pub(crate) fn descend(&self, from: CellCoord) -> Vec<CellCoord> {
        let mut steps = Vec::new();
        let Some(mut current_distance) = self.distance(from).filter(|d| *d != UNREACHED) else {
            return steps;
        };

        let mut current = from;
        while current_distance > 0 {
            let mut best: Option<(CellCoord, u32)> = None;
            for direction in Direction::EXPANSION_ORDER {
                let neighbor = current.neighbor(direction);
                let Some(distance) = self.distance(neighbor) else {
                    continue;
                };
                if distance >= current_distance {
                    continue;
                }
                if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                    best = Some((neighbor, distance));
                }
            }

            // A settled cell always has a neighbour one step closer to the source.
            let Some((next, distance)) = best else {
                steps.clear();
                return steps;
            };
            steps.push(next);
            current = next;
            current_distance = distance;
        }

        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(columns: u32, rows: u32) -> GridSize {
        GridSize::new(columns, rows).expect("valid size")
    }

    #[test]
    fn rebuild_with_sets_source_cell_to_zero() {
        let mut field = DistanceField::default();

        field.rebuild_with(size(3, 4), CellCoord::new(1, 2), |_| false);

        assert_eq!(field.distance(CellCoord::new(1, 2)), Some(0));
        assert_eq!(field.distance(CellCoord::new(1, 1)), Some(1));
        assert_eq!(field.distance(CellCoord::new(1, 0)), Some(2));
        assert_eq!(field.distance(CellCoord::new(0, 0)), Some(3));
        assert_eq!(field.distance(CellCoord::new(3, 0)), None);
        assert_eq!(field.flood_order().first(), Some(&CellCoord::new(1, 2)));
        assert_eq!(field.flood_order().len(), 12);
    }

    #[test]
    fn rebuild_with_respects_walls() {
        let mut field = DistanceField::default();
        let wall = CellCoord::new(1, 1);

        field.rebuild_with(size(3, 4), CellCoord::new(1, 2), |cell| cell == wall);

        assert_eq!(field.distance(wall), Some(UNREACHED));
        assert_eq!(field.distance(CellCoord::new(1, 0)), Some(4));
        assert_eq!(field.distance(CellCoord::new(0, 1)), Some(2));
    }

    #[test]
    fn blocked_source_leaves_field_unreached() {
        let mut field = DistanceField::default();
        let source = CellCoord::new(0, 0);

        field.rebuild_with(size(2, 2), source, |cell| cell == source);

        assert_eq!(field.distance(source), Some(UNREACHED));
        assert!(field.flood_order().is_empty());
        assert!(field.descend(CellCoord::new(1, 1)).is_empty());
    }

    #[test]
    fn descend_walks_to_the_source() {
        let mut field = DistanceField::default();
        let source = CellCoord::new(2, 2);

        field.rebuild_with(size(3, 3), source, |_| false);
        let steps = field.descend(CellCoord::new(0, 0));

        assert_eq!(steps.len(), 4);
        assert_eq!(steps.last(), Some(&source));
        assert!(field.descend(source).is_empty());
    }
}
