use anyhow::{Result, ensure};
use std::fmt::Debug;

/// Axis-aligned envelope `[min, max]` of a point set.
///
/// A box folded from zero points is the zero box (all four values `0.0`). It marks "no extent" and
/// must not be used as a clip rectangle; check [`BoundingBox::is_zero`] first.
///
/// ```
/// use vectile_core::BoundingBox;
///
/// let bbox = BoundingBox::from_points([[3.0, 1.0], [-2.0, 4.0], [0.0, -1.0]]);
/// assert_eq!(bbox.as_array(), [-2.0, -1.0, 3.0, 4.0]);
/// assert!(BoundingBox::from_points(Vec::<[f64; 2]>::new()).is_zero());
/// ```
#[derive(Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
	pub min: [f64; 2],
	pub max: [f64; 2],
}

impl BoundingBox {
	/// Creates a box from its edges.
	///
	/// # Errors
	/// Fails when a value is not finite or when a minimum exceeds its maximum.
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<BoundingBox> {
		ensure!(
			x_min.is_finite() && y_min.is_finite() && x_max.is_finite() && y_max.is_finite(),
			"bounding box values must be finite"
		);
		ensure!(x_min <= x_max, "x_min ({x_min}) must be <= x_max ({x_max})");
		ensure!(y_min <= y_max, "y_min ({y_min}) must be <= y_max ({y_max})");
		Ok(BoundingBox {
			min: [x_min, y_min],
			max: [x_max, y_max],
		})
	}

	#[must_use]
	pub fn zero() -> BoundingBox {
		BoundingBox::default()
	}

	/// Single-pass min/max fold over `points`.
	///
	/// The result does not depend on the order of the points.
	pub fn from_points<I, P>(points: I) -> BoundingBox
	where
		I: IntoIterator<Item = P>,
		P: Into<[f64; 2]>,
	{
		let mut iter = points.into_iter().map(Into::into);
		let Some(first) = iter.next() else {
			return BoundingBox::zero();
		};
		iter.fold(
			BoundingBox {
				min: first,
				max: first,
			},
			|mut bbox, [x, y]| {
				bbox.min[0] = bbox.min[0].min(x);
				bbox.min[1] = bbox.min[1].min(y);
				bbox.max[0] = bbox.max[0].max(x);
				bbox.max[1] = bbox.max[1].max(y);
				bbox
			},
		)
	}

	#[must_use]
	pub fn is_zero(&self) -> bool {
		*self == BoundingBox::zero()
	}

	#[must_use]
	pub fn x_min(&self) -> f64 {
		self.min[0]
	}

	#[must_use]
	pub fn y_min(&self) -> f64 {
		self.min[1]
	}

	#[must_use]
	pub fn x_max(&self) -> f64 {
		self.max[0]
	}

	#[must_use]
	pub fn y_max(&self) -> f64 {
		self.max[1]
	}

	#[must_use]
	pub fn width(&self) -> f64 {
		self.max[0] - self.min[0]
	}

	#[must_use]
	pub fn height(&self) -> f64 {
		self.max[1] - self.min[1]
	}

	/// Inclusive point test.
	#[must_use]
	pub fn contains_point(&self, x: f64, y: f64) -> bool {
		x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
	}

	/// Grows `self` to also cover `other`.
	pub fn extend(&mut self, other: &BoundingBox) {
		self.min[0] = self.min[0].min(other.min[0]);
		self.min[1] = self.min[1].min(other.min[1]);
		self.max[0] = self.max[0].max(other.max[0]);
		self.max[1] = self.max[1].max(other.max[1]);
	}

	/// Corners in clockwise order for a Y-down plane, starting at `min`.
	#[must_use]
	pub fn vertices(&self) -> [[f64; 2]; 4] {
		[
			self.min,
			[self.max[0], self.min[1]],
			self.max,
			[self.min[0], self.max[1]],
		]
	}

	/// `[x_min, y_min, x_max, y_max]`
	#[must_use]
	pub fn as_array(&self) -> [f64; 4] {
		[self.min[0], self.min[1], self.max[0], self.max[1]]
	}
}

impl Debug for BoundingBox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "BoundingBox {:?}", self.as_array())
	}
}
