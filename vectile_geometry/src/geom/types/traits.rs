use super::Coordinates;
use anyhow::Result;
use std::fmt::Debug;
use vectile_core::BoundingBox;

/// Common interface of all primitive geometry types.
pub trait GeometryTrait: Debug + Clone + Sized {
	/// Unsigned area; zero for points and lines.
	fn area(&self) -> f64;

	/// Checks structural validity, e.g. that a line has at least two points or a ring is closed.
	fn verify(&self) -> Result<()>;

	/// Iterates over every vertex, parts in order.
	fn iter_coords(&self) -> impl Iterator<Item = &Coordinates>;

	/// Returns a copy with `f` applied to every vertex. The structure is left untouched.
	fn map_coords(&self, f: &impl Fn(&Coordinates) -> Coordinates) -> Self;

	/// The parenthesised coordinate text of the WKT representation, without the type keyword.
	fn wkt_body(&self) -> String;

	fn vertex_count(&self) -> usize {
		self.iter_coords().count()
	}

	/// Envelope of all vertices; the zero box when there are none.
	fn bbox(&self) -> BoundingBox {
		BoundingBox::from_points(self.iter_coords().copied())
	}
}

/// A geometry that can be wrapped into its multi counterpart, e.g. a point into a multi point.
pub trait SingleGeometryTrait<Multi>: Debug + Clone {
	fn into_multi(self) -> Multi;
}

/// A geometry made of an ordered list of parts: a polygon of rings, a line of coordinates, ...
pub trait CompositeGeometryTrait<Item>: Debug + Clone {
	fn new() -> Self;

	fn as_vec(&self) -> &Vec<Item>;

	fn as_mut_vec(&mut self) -> &mut Vec<Item>;

	fn into_inner(self) -> Vec<Item>;

	fn into_iter(self) -> impl Iterator<Item = Item> {
		self.into_inner().into_iter()
	}

	/// Splits into the first part and the rest, or `None` if there are no parts.
	fn into_first_and_rest(self) -> Option<(Item, Vec<Item>)> {
		let mut iter = self.into_iter();
		iter.next().map(|first| (first, iter.collect()))
	}

	fn is_empty(&self) -> bool {
		self.as_vec().is_empty()
	}

	fn len(&self) -> usize {
		self.as_vec().len()
	}

	fn push(&mut self, item: Item) {
		self.as_mut_vec().push(item);
	}

	fn first(&self) -> Option<&Item> {
		self.as_vec().first()
	}

	fn last(&self) -> Option<&Item> {
		self.as_vec().last()
	}
}

/// Joins already rendered parts into `(a, b, c)`, or `EMPTY` when there are none.
pub(crate) fn wkt_list(parts: impl Iterator<Item = String>) -> String {
	let parts: Vec<String> = parts.collect();
	if parts.is_empty() {
		String::from("EMPTY")
	} else {
		format!("({})", parts.join(", "))
	}
}
