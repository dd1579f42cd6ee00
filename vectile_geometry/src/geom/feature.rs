use super::*;

/// A geometry with an optional id and tags, ready to be added to a layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
	pub id: Option<u64>,
	pub geometry: Geometry,
	pub properties: GeoProperties,
}

impl Feature {
	#[must_use]
	pub fn new(geometry: Geometry) -> Self {
		Self {
			id: None,
			geometry,
			properties: GeoProperties::new(),
		}
	}

	/// One feature per non-collection member of `geometry`, each carrying a copy of `properties`
	/// and no id. Nested collections are flattened depth-first.
	#[must_use]
	pub fn split(geometry: Geometry, properties: GeoProperties) -> Vec<Feature> {
		let mut parts = Vec::new();
		flatten(geometry, &mut parts);
		parts
			.into_iter()
			.map(|geometry| Feature {
				id: None,
				geometry,
				properties: properties.clone(),
			})
			.collect()
	}

	pub fn set_id(&mut self, id: u64) {
		self.id = Some(id);
	}

	pub fn set_properties(&mut self, properties: GeoProperties) {
		self.properties = properties;
	}

	pub fn set_property<T>(&mut self, key: String, value: T)
	where
		GeoValue: From<T>,
	{
		self.properties.insert(key, GeoValue::from(value));
	}

	#[cfg(test)]
	pub fn new_example() -> Self {
		Self {
			id: Some(13),
			geometry: Geometry::new_example(),
			properties: GeoProperties::from(vec![
				("name", GeoValue::from("Nice")),
				("population", GeoValue::from(348085)),
				("is_nice", GeoValue::from(true)),
			]),
		}
	}
}

fn flatten(geometry: Geometry, parts: &mut Vec<Geometry>) {
	match geometry {
		Geometry::Collection(collection) => {
			for member in collection.0 {
				flatten(member, parts);
			}
		}
		other => parts.push(other),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn setters() {
		let mut feature = Feature::new(Geometry::new_point([1, 2]));
		feature.set_id(7);
		feature.set_property("name".into(), "A");
		feature.set_property("rank".into(), 3u32);
		assert_eq!(feature.id, Some(7));
		assert_eq!(feature.properties.get("rank"), Some(&GeoValue::UInt(3)));
	}

	#[test]
	fn split_flattens_nested_collections() {
		let geometry = Geometry::new_collection(vec![
			Geometry::new_point([1, 1]),
			Geometry::new_collection(vec![
				Geometry::new_line_string(vec![[0, 0], [1, 1]]),
				Geometry::new_collection(vec![]),
			]),
			Geometry::new_example(),
		]);
		let properties = GeoProperties::from(vec![("kind", "mixed")]);
		let features = Feature::split(geometry, properties.clone());

		assert_eq!(features.len(), 3);
		assert_eq!(
			features.iter().map(|f| f.geometry.type_name()).collect::<Vec<_>>(),
			["Point", "LineString", "MultiPolygon"]
		);
		assert!(features.iter().all(|f| f.id.is_none() && f.properties == properties));
	}

	#[test]
	fn split_of_plain_geometry_is_single_feature() {
		let features = Feature::split(Geometry::new_point([3, 4]), GeoProperties::new());
		assert_eq!(features, vec![Feature::new(Geometry::new_point([3, 4]))]);
	}
}
