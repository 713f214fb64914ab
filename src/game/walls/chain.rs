//! Wall Chain
//!
//! The polyline being drawn: an ordered list of snapped points, never
//! empty. Consecutive pairs are the runs that get committed.

use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct WallChain {
    points: Vec<Vec3>,
    closed: bool,
}

impl WallChain {
    /// Seed a chain with its first point.
    pub fn start(point: Vec3) -> Self {
        Self {
            points: vec![point],
            closed: false,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Vec3 {
        self.points[0]
    }

    pub fn last(&self) -> Vec3 {
        self.points[self.points.len() - 1]
    }

    pub fn push(&mut self, point: Vec3) {
        self.points.push(point);
    }

    /// Needs at least two points to describe a run
    pub fn is_committable(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Append the first point as the final vertex.
    pub fn close_loop(&mut self) {
        if !self.closed {
            let first = self.first();
            self.points.push(first);
            self.closed = true;
        }
    }

    /// Consecutive point pairs, in drawing order.
    pub fn runs(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_follow_drawing_order() {
        let mut chain = WallChain::start(Vec3::ZERO);
        assert!(!chain.is_committable());
        chain.push(Vec3::new(4.0, 0.0, 0.0));
        chain.push(Vec3::new(4.0, 0.0, 2.0));

        let runs: Vec<_> = chain.runs().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1], (Vec3::new(4.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 2.0)));
    }

    #[test]
    fn test_close_loop_once() {
        let mut chain = WallChain::start(Vec3::ZERO);
        chain.push(Vec3::new(2.0, 0.0, 0.0));
        chain.push(Vec3::new(2.0, 0.0, 2.0));
        chain.close_loop();
        chain.close_loop();
        assert!(chain.is_closed());
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.last(), chain.first());
    }
}
