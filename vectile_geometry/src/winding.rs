//! Ring orientation.
//!
//! Orientation is always derived from the vertices and never stored on a ring. In tile space
//! (Y axis pointing down) exterior rings are [`WindingOrder::Clockwise`] and holes
//! [`WindingOrder::CounterClockwise`].

use crate::{Coordinates, RingGeometry};
use std::fmt::{self, Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindingOrder {
	Clockwise,
	CounterClockwise,
}

impl WindingOrder {
	/// Orientation of a point sequence in a Y-down plane.
	///
	/// Sums `x_i * y_(i+1) - x_(i+1) * y_i` over consecutive pairs. The last vertex is not paired
	/// with the first, so rings should be passed explicitly closed. A zero sum gives `Clockwise`.
	#[must_use]
	pub fn of_points(points: &[Coordinates]) -> WindingOrder {
		let sum: f64 = points
			.windows(2)
			.map(|pair| pair[0].x() * pair[1].y() - pair[1].x() * pair[0].y())
			.sum();
		if sum < 0.0 {
			WindingOrder::CounterClockwise
		} else {
			WindingOrder::Clockwise
		}
	}

	/// Orientation of `ring`, measured on its explicitly closed form.
	#[must_use]
	pub fn of_ring(ring: &RingGeometry) -> WindingOrder {
		if ring.is_closed() {
			WindingOrder::of_points(&ring.0)
		} else {
			let mut closed = ring.clone();
			closed.close();
			WindingOrder::of_points(&closed.0)
		}
	}

	/// Required orientation of the ring at `index` within a polygon.
	#[must_use]
	pub fn for_ring_index(index: usize) -> WindingOrder {
		if index == 0 {
			WindingOrder::Clockwise
		} else {
			WindingOrder::CounterClockwise
		}
	}

	#[must_use]
	pub fn not(self) -> WindingOrder {
		match self {
			WindingOrder::Clockwise => WindingOrder::CounterClockwise,
			WindingOrder::CounterClockwise => WindingOrder::Clockwise,
		}
	}

	#[must_use]
	pub fn is_clockwise(self) -> bool {
		self == WindingOrder::Clockwise
	}

	#[must_use]
	pub fn is_counter_clockwise(self) -> bool {
		self == WindingOrder::CounterClockwise
	}
}

impl Display for WindingOrder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			WindingOrder::Clockwise => "clockwise",
			WindingOrder::CounterClockwise => "counter clockwise",
		})
	}
}

/// Reverses `ring` in place when its orientation differs from `want`.
pub fn orient_ring(ring: &mut RingGeometry, want: WindingOrder) {
	if WindingOrder::of_ring(ring) != want {
		ring.0.reverse();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn coords(points: &[[i32; 2]]) -> Vec<Coordinates> {
		points.iter().map(Coordinates::from).collect()
	}

	#[test]
	fn square_is_clockwise_in_tile_space() {
		let square = coords(&[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]);
		assert_eq!(WindingOrder::of_points(&square), WindingOrder::Clockwise);

		let reversed: Vec<Coordinates> = square.into_iter().rev().collect();
		assert_eq!(WindingOrder::of_points(&reversed), WindingOrder::CounterClockwise);
	}

	#[rstest]
	#[case(&[])]
	#[case(&[[3, 4]])]
	#[case(&[[0, 0], [5, 5], [10, 10], [0, 0]])]
	fn zero_area_is_clockwise(#[case] points: &[[i32; 2]]) {
		assert_eq!(WindingOrder::of_points(&coords(points)), WindingOrder::Clockwise);
	}

	#[test]
	fn open_sequence_is_not_wrapped() {
		// Without the closing pair the sum over (0,10)->(10,10)->(10,0) is -200.
		let open = coords(&[[0, 10], [10, 10], [10, 0]]);
		assert_eq!(WindingOrder::of_points(&open), WindingOrder::CounterClockwise);
		// Closed, the same ring is counter clockwise as well.
		let ring = RingGeometry::from(vec![[0, 10], [10, 10], [10, 0]]);
		assert_eq!(WindingOrder::of_ring(&ring), WindingOrder::CounterClockwise);
	}

	#[test]
	fn projections_and_display() {
		let cw = WindingOrder::Clockwise;
		assert!(cw.is_clockwise());
		assert!(!cw.is_counter_clockwise());
		assert_eq!(cw.not(), WindingOrder::CounterClockwise);
		assert_eq!(cw.not().not(), cw);
		assert_eq!(cw.to_string(), "clockwise");
		assert_eq!(cw.not().to_string(), "counter clockwise");
	}

	#[test]
	fn ring_index() {
		assert_eq!(WindingOrder::for_ring_index(0), WindingOrder::Clockwise);
		assert_eq!(WindingOrder::for_ring_index(1), WindingOrder::CounterClockwise);
		assert_eq!(WindingOrder::for_ring_index(7), WindingOrder::CounterClockwise);
	}

	#[test]
	fn orient_ring_reverses_only_when_needed() {
		let mut ring = RingGeometry::from(vec![[0, 0], [0, 10], [10, 10], [10, 0], [0, 0]]);
		orient_ring(&mut ring, WindingOrder::Clockwise);
		assert_eq!(ring, RingGeometry::from(vec![[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]));

		let before = ring.clone();
		orient_ring(&mut ring, WindingOrder::Clockwise);
		assert_eq!(ring, before);

		orient_ring(&mut ring, WindingOrder::CounterClockwise);
		assert_eq!(WindingOrder::of_ring(&ring), WindingOrder::CounterClockwise);
		assert!(ring.signed_area() < 0.0);
	}
}
