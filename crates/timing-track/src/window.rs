//! Two-sample movement window.

use std::collections::VecDeque;

use crate::geometry::{Point, Segment};

const WINDOW_SIZE: usize = 2;

/// The two most recent position samples.
///
/// Once full, the window describes the segment actually travelled between
/// two discrete samples.
#[derive(Debug, Clone, Default)]
pub struct MovementWindow {
    points: VecDeque<Point>,
}

impl MovementWindow {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(WINDOW_SIZE),
        }
    }

    /// Push a sample, discarding the oldest once full. Returns the travelled
    /// segment when two samples are available.
    pub fn push(&mut self, point: Point) -> Option<Segment> {
        if self.points.len() >= WINDOW_SIZE {
            self.points.pop_front();
        }
        self.points.push_back(point);
        self.movement()
    }

    /// Travelled segment from the older to the newer sample.
    pub fn movement(&self) -> Option<Segment> {
        match (self.points.front(), self.points.back()) {
            (Some(from), Some(to)) if self.points.len() == WINDOW_SIZE => {
                Some(Segment::new(*from, *to))
            }
            _ => None,
        }
    }

    pub fn latest(&self) -> Option<Point> {
        self.points.back().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sample_has_no_movement() {
        let mut window = MovementWindow::new();
        assert!(window.push(Point::new(1.0, 1.0)).is_none());
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_window_slides() {
        let mut window = MovementWindow::new();
        window.push(Point::new(1.0, 1.0));
        let first = window.push(Point::new(2.0, 2.0));
        assert_eq!(
            first,
            Some(Segment::new(Point::new(1.0, 1.0), Point::new(2.0, 2.0)))
        );

        let second = window.push(Point::new(3.0, 3.0));
        assert_eq!(
            second,
            Some(Segment::new(Point::new(2.0, 2.0), Point::new(3.0, 3.0)))
        );
        assert_eq!(window.len(), 2);
        assert_eq!(window.latest(), Some(Point::new(3.0, 3.0)));
    }

    #[test]
    fn test_clear() {
        let mut window = MovementWindow::new();
        window.push(Point::new(1.0, 1.0));
        window.push(Point::new(2.0, 2.0));
        window.clear();
        assert!(window.is_empty());
        assert!(window.movement().is_none());
    }
}
