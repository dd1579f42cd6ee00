use super::GeoValue;
use std::{
	collections::{BTreeMap, btree_map},
	fmt::Debug,
};

/// String-keyed tags of a feature, iterated in key order.
#[derive(Clone, PartialEq, Default)]
pub struct GeoProperties {
	properties: BTreeMap<String, GeoValue>,
}

impl GeoProperties {
	#[must_use]
	pub fn new() -> GeoProperties {
		GeoProperties {
			properties: BTreeMap::new(),
		}
	}

	pub fn insert(&mut self, key: String, value: GeoValue) {
		self.properties.insert(key, value);
	}

	/// Copies every entry of `new_properties`, overwriting existing keys.
	pub fn update(&mut self, new_properties: &GeoProperties) {
		for (k, v) in new_properties.iter() {
			self.properties.insert(k.to_string(), v.clone());
		}
	}

	pub fn remove(&mut self, key: &str) {
		self.properties.remove(key);
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&GeoValue> {
		self.properties.get(key)
	}

	pub fn iter(&self) -> btree_map::Iter<'_, String, GeoValue> {
		self.properties.iter()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.properties.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.properties.is_empty()
	}
}

impl IntoIterator for GeoProperties {
	type Item = (String, GeoValue);
	type IntoIter = btree_map::IntoIter<String, GeoValue>;
	fn into_iter(self) -> Self::IntoIter {
		self.properties.into_iter()
	}
}

impl From<Vec<(&str, GeoValue)>> for GeoProperties {
	fn from(value: Vec<(&str, GeoValue)>) -> Self {
		GeoProperties {
			properties: value.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
		}
	}
}

impl From<Vec<(&str, &str)>> for GeoProperties {
	fn from(value: Vec<(&str, &str)>) -> Self {
		GeoProperties {
			properties: value
				.into_iter()
				.map(|(k, v)| (k.to_string(), GeoValue::from(v)))
				.collect(),
		}
	}
}

impl FromIterator<(String, GeoValue)> for GeoProperties {
	fn from_iter<T: IntoIterator<Item = (String, GeoValue)>>(iter: T) -> Self {
		GeoProperties {
			properties: BTreeMap::from_iter(iter),
		}
	}
}

impl Debug for GeoProperties {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map().entries(self.properties.iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_update_remove() {
		let mut properties = GeoProperties::from(vec![("name", "Main St"), ("kind", "road")]);
		properties.insert("lanes".into(), GeoValue::from(2));
		properties.update(&GeoProperties::from(vec![("kind", GeoValue::from("street"))]));
		properties.remove("name");

		assert_eq!(properties.len(), 2);
		assert_eq!(properties.get("kind"), Some(&GeoValue::from("street")));
		assert_eq!(properties.get("name"), None);
		assert_eq!(
			format!("{properties:?}"),
			"{\"kind\": String(\"street\"), \"lanes\": UInt(2)}"
		);
	}

	#[test]
	fn iteration_is_key_ordered() {
		let properties: GeoProperties = vec![
			("b".to_string(), GeoValue::Null),
			("a".to_string(), GeoValue::from(true)),
		]
		.into_iter()
		.collect();
		let keys: Vec<String> = properties.into_iter().map(|(k, _)| k).collect();
		assert_eq!(keys, ["a", "b"]);
	}
}
