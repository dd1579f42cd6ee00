use super::Cursor;
use crate::{
	Coordinates, Geometry, GeometryCollection, LineStringGeometry, MultiLineStringGeometry, MultiPointGeometry,
	MultiPolygonGeometry, PointGeometry, PolygonGeometry, RingGeometry, TileError,
	winding::{WindingOrder, orient_ring},
};
use anyhow::Result;
use itertools::Itertools;

/// One side of the clip rectangle. Y grows downwards, so `Top` is the minimum row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
	Left,
	Right,
	Top,
	Bottom,
}

const EDGES: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

/// Inclusive clip rectangle in tile-local units.
#[derive(Clone, Copy, Debug)]
struct ClipRect {
	min: [f64; 2],
	max: [f64; 2],
}

impl ClipRect {
	fn contains(&self, c: &Coordinates) -> bool {
		EDGES.iter().all(|edge| edge.inside(c, self))
	}
}

impl Edge {
	fn inside(self, c: &Coordinates, rect: &ClipRect) -> bool {
		match self {
			Edge::Left => c.x() >= rect.min[0],
			Edge::Right => c.x() <= rect.max[0],
			Edge::Top => c.y() >= rect.min[1],
			Edge::Bottom => c.y() <= rect.max[1],
		}
	}

	/// Crossing of segment `a`-`b` with this edge, snapped to the integer grid.
	///
	/// Only called for segments with one end on each side, so the divisor is never zero.
	fn intersect(self, a: &Coordinates, b: &Coordinates, rect: &ClipRect) -> Coordinates {
		match self {
			Edge::Left | Edge::Right => {
				let x = if self == Edge::Left { rect.min[0] } else { rect.max[0] };
				let t = (x - a.x()) / (b.x() - a.x());
				Coordinates::new(x, (a.y() + t * (b.y() - a.y())).round())
			}
			Edge::Top | Edge::Bottom => {
				let y = if self == Edge::Top { rect.min[1] } else { rect.max[1] };
				let t = (y - a.y()) / (b.y() - a.y());
				Coordinates::new((a.x() + t * (b.x() - a.x())).round(), y)
			}
		}
	}

	/// Sutherland–Hodgman step for a closed ring given as an open vertex list.
	fn clip_ring(self, points: Vec<Coordinates>, rect: &ClipRect) -> Vec<Coordinates> {
		let Some(mut previous) = points.last().copied() else {
			return points;
		};
		let mut result = Vec::with_capacity(points.len() + 4);
		for current in points {
			let current_inside = self.inside(&current, rect);
			if current_inside != self.inside(&previous, rect) {
				result.push(self.intersect(&previous, &current, rect));
			}
			if current_inside {
				result.push(current);
			}
			previous = current;
		}
		result
	}

	/// Splits a polyline into the runs that lie inside this edge's half-plane.
	fn clip_line(self, points: &[Coordinates], rect: &ClipRect) -> Vec<Vec<Coordinates>> {
		let mut runs = Vec::new();
		let mut run = Vec::new();
		let mut previous: Option<&Coordinates> = None;
		for current in points {
			let current_inside = self.inside(current, rect);
			if let Some(previous) = previous {
				match (self.inside(previous, rect), current_inside) {
					(true, true) => run.push(*current),
					(true, false) => {
						run.push(self.intersect(previous, current, rect));
						runs.push(std::mem::take(&mut run));
					}
					(false, true) => {
						run.push(self.intersect(previous, current, rect));
						run.push(*current);
					}
					(false, false) => {}
				}
			} else if current_inside {
				run.push(*current);
			}
			previous = Some(current);
		}
		if !run.is_empty() {
			runs.push(run);
		}
		runs
	}
}

fn ensure_finite<'a>(coords: impl IntoIterator<Item = &'a Coordinates>) -> Result<()> {
	match coords.into_iter().find(|c| !c.is_finite()) {
		Some(c) => Err(TileError::clip(format!("non-finite coordinate {c:?}"))),
		None => Ok(()),
	}
}

impl Cursor {
	fn clip_rect(&self) -> ClipRect {
		let (min, max) = self.min_max();
		ClipRect { min, max }
	}

	/// Clips tile-local `geometry` to [`Cursor::min_max`].
	///
	/// Returns `Ok(None)` when nothing survives. Surviving polygon rings are closed and oriented:
	/// exteriors clockwise, holes counter clockwise. Multi geometries stay multi geometries even
	/// with a single survivor.
	///
	/// # Errors
	/// A [`TileError::Clip`] for a line string or polygon ring without vertices, or for a
	/// non-finite coordinate.
	pub fn clip_geo(&self, geometry: &Geometry) -> Result<Option<Geometry>> {
		let rect = self.clip_rect();
		Ok(match geometry {
			Geometry::Point(point) => {
				ensure_finite([&point.0])?;
				rect.contains(&point.0).then(|| geometry.clone())
			}
			Geometry::MultiPoint(multi) => {
				ensure_finite(multi.0.iter().map(PointGeometry::as_coord))?;
				let points: Vec<PointGeometry> = multi
					.0
					.iter()
					.filter(|p| rect.contains(&p.0))
					.unique_by(|p| [(p.x() + 0.0).to_bits(), (p.y() + 0.0).to_bits()])
					.cloned()
					.collect();
				if points.is_empty() {
					log::trace!("dropping MultiPoint outside of the clip rectangle");
					None
				} else {
					Some(Geometry::MultiPoint(MultiPointGeometry(points)))
				}
			}
			Geometry::LineString(line) => {
				let mut lines = clip_line(&line.0, &rect)?;
				match lines.len() {
					0 => None,
					1 => lines.pop().map(Geometry::LineString),
					_ => Some(Geometry::MultiLineString(MultiLineStringGeometry(lines))),
				}
			}
			Geometry::MultiLineString(multi) => {
				let mut lines = Vec::new();
				for line in &multi.0 {
					lines.extend(clip_line(&line.0, &rect)?);
				}
				(!lines.is_empty()).then(|| Geometry::MultiLineString(MultiLineStringGeometry(lines)))
			}
			Geometry::Polygon(polygon) => clip_polygon(polygon, &rect)?.map(Geometry::Polygon),
			Geometry::MultiPolygon(multi) => {
				let mut polygons = Vec::new();
				for polygon in &multi.0 {
					polygons.extend(clip_polygon(polygon, &rect)?);
				}
				(!polygons.is_empty()).then(|| Geometry::MultiPolygon(MultiPolygonGeometry(polygons)))
			}
			Geometry::Collection(collection) => {
				let mut members = Vec::new();
				for member in collection.iter() {
					members.extend(self.clip_geo(member)?);
				}
				(!members.is_empty()).then(|| Geometry::Collection(GeometryCollection(members)))
			}
		})
	}
}

/// Runs of `points` inside `rect`, each with at least two distinct vertices.
fn clip_line(points: &[Coordinates], rect: &ClipRect) -> Result<Vec<LineStringGeometry>> {
	if points.is_empty() {
		return Err(TileError::clip("line string has no vertices"));
	}
	ensure_finite(points)?;

	let mut runs: Vec<Vec<Coordinates>> = vec![points.iter().copied().dedup().collect()];
	for edge in EDGES {
		runs = runs.iter().flat_map(|run| edge.clip_line(run, rect)).collect();
	}

	let lines: Vec<LineStringGeometry> = runs
		.into_iter()
		.map(|run| run.into_iter().dedup().collect::<Vec<_>>())
		.filter(|run| run.len() >= 2)
		.map(LineStringGeometry)
		.collect();
	if lines.is_empty() {
		log::trace!("dropping line string outside of the clip rectangle");
	}
	Ok(lines)
}

fn clip_polygon(polygon: &PolygonGeometry, rect: &ClipRect) -> Result<Option<PolygonGeometry>> {
	let mut rings: Vec<RingGeometry> = Vec::with_capacity(polygon.0.len());
	for (index, ring) in polygon.0.iter().enumerate() {
		match clip_ring(ring, rect)? {
			Some(mut ring) => {
				orient_ring(&mut ring, WindingOrder::for_ring_index(rings.len()));
				rings.push(ring);
			}
			None if index == 0 => {
				log::trace!("dropping polygon whose exterior ring does not survive clipping");
				return Ok(None);
			}
			None => log::trace!("dropping hole {index} of polygon"),
		}
	}
	Ok((!rings.is_empty()).then_some(PolygonGeometry(rings)))
}

/// Clips one ring as a closed polygon. Degenerate results (fewer than three distinct vertices
/// or zero area) give `None`; survivors are explicitly closed.
fn clip_ring(ring: &RingGeometry, rect: &ClipRect) -> Result<Option<RingGeometry>> {
	if ring.0.is_empty() {
		return Err(TileError::clip("polygon ring has no vertices"));
	}
	ensure_finite(&ring.0)?;

	let mut points = ring.0.clone();
	if ring.is_closed() {
		points.pop();
	}
	for edge in EDGES {
		points = edge.clip_ring(points, rect);
	}

	points.dedup();
	while points.len() > 1 && points.first() == points.last() {
		points.pop();
	}

	let mut ring = RingGeometry(points);
	if ring.distinct_vertex_count() < 3 || ring.signed_area() == 0.0 {
		return Ok(None);
	}
	ring.close();
	Ok(Some(ring))
}
