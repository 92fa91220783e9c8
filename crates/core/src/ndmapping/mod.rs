use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::dimension::{Dimension, DimensionSpec};
use crate::error::MappingError;
use crate::key::{IntoKey, Key};
use crate::value::DimValue;


/// An ordered mapping from fixed-arity keys to opaque payloads.
///
/// Each key position is described by a [`Dimension`]; the number of
/// dimensions fixes the arity every stored key must have. Iteration yields
/// entries in first-insertion order, and overwriting a key never moves it.
/// Components of typed dimensions are coerced before storage and lookup, so
/// `0.5` and `"0.5"` land on the same key under a float-typed dimension.
///
/// Payloads are never inspected or mutated by the mapping itself. A payload
/// may be another `NdMapping`, nesting axes hierarchically; the nested
/// instance reached through [`get_mut`](Self::get_mut) is live, so mutating
/// it is visible to every later read through the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NdMapping<V> {
	key_dimensions: Vec<Dimension>,
	data: IndexMap<Key, V>,
}

impl<V> NdMapping<V> {
	/// Creates an empty mapping over the given dimensions.
	///
	/// Dimensions may be given as bare names or full [`Dimension`] values;
	/// bare names become untyped dimensions.
	pub fn new<D>(dims: impl IntoIterator<Item = D>) -> Result<Self, MappingError>
	where
		D: Into<DimensionSpec>,
	{
		Ok(Self {
			key_dimensions: normalize_dimensions(dims)?,
			data: IndexMap::new(),
		})
	}

	/// Creates a mapping over `dims`, seeded with `items` in order.
	///
	/// Every pair goes through the same path as [`insert`](Self::insert),
	/// so arity validation and coercion apply, first-insertion order is
	/// preserved, and a repeated key overwrites the earlier value without
	/// moving it.
	pub fn with_items<K, D>(
		items: impl IntoIterator<Item = (K, V)>,
		dims: impl IntoIterator<Item = D>,
	) -> Result<Self, MappingError>
	where
		K: IntoKey,
		D: Into<DimensionSpec>,
	{
		let mut mapping = Self::new(dims)?;
		mapping.update(items)?;
		Ok(mapping)
	}

	/// Number of key dimensions; every stored key has exactly this many
	/// components.
	pub fn ndims(&self) -> usize {
		self.key_dimensions.len()
	}

	/// The dimensions describing each key position, in key order.
	pub fn key_dimensions(&self) -> &[Dimension] {
		&self.key_dimensions
	}

	/// Dimension names in key order.
	pub fn dimension_labels(&self) -> Vec<&str> {
		self.key_dimensions.iter().map(Dimension::name).collect()
	}

	/// Position of the named dimension, if present.
	pub fn dimension_index(&self, name: &str) -> Option<usize> {
		self.key_dimensions.iter().position(|dim| dim.name() == name)
	}

	/// The named dimension, if present.
	pub fn dimension(&self, name: &str) -> Option<&Dimension> {
		self.dimension_index(name).map(|i| &self.key_dimensions[i])
	}

	/// Number of stored entries.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Whether the mapping holds no entries.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Validates arity, then coerces each component through its
	/// dimension's declared type.
	fn normalize_key(&self, key: Key) -> Result<Key, MappingError> {
		if key.len() != self.ndims() {
			return Err(MappingError::KeyLength {
				expected: self.ndims(),
				actual: key.len(),
			});
		}
		self.key_dimensions
			.iter()
			.zip(key)
			.map(|(dim, component)| dim.coerce(component).map_err(MappingError::from))
			.collect()
	}

	/// Inserts or overwrites a key, returning the previous value when the
	/// key was already present. An overwritten key keeps its position.
	pub fn insert(&mut self, key: impl IntoKey, value: V) -> Result<Option<V>, MappingError> {
		let key = self.normalize_key(key.into_key())?;
		Ok(self.data.insert(key, value))
	}

	/// Applies `items` in order through [`insert`](Self::insert).
	///
	/// Application stops at the first failing pair: earlier pairs remain
	/// applied, the failing pair and everything after it do not.
	pub fn update<K>(&mut self, items: impl IntoIterator<Item = (K, V)>) -> Result<(), MappingError>
	where
		K: IntoKey,
	{
		for (key, value) in items {
			self.insert(key, value)?;
		}
		Ok(())
	}

	/// Looks up a key, coercing it like an insertion.
	pub fn get(&self, key: impl IntoKey) -> Result<&V, MappingError> {
		let key = self.normalize_key(key.into_key())?;
		self.data.get(&key).ok_or(MappingError::KeyNotFound(key))
	}

	/// Mutable lookup. When the payload is itself a mapping this is the
	/// nested-mutation path: the returned reference is the live nested
	/// instance.
	pub fn get_mut(&mut self, key: impl IntoKey) -> Result<&mut V, MappingError> {
		let key = self.normalize_key(key.into_key())?;
		self.data.get_mut(&key).ok_or(MappingError::KeyNotFound(key))
	}

	/// Whether the mapping contains `key`.
	///
	/// A key that fails arity validation or coercion is simply not
	/// contained.
	pub fn contains_key(&self, key: impl IntoKey) -> bool {
		match self.normalize_key(key.into_key()) {
			Ok(key) => self.data.contains_key(&key),
			Err(_) => false,
		}
	}

	/// Removes a key, preserving the relative order of the remaining
	/// entries.
	pub fn remove(&mut self, key: impl IntoKey) -> Result<V, MappingError> {
		let key = self.normalize_key(key.into_key())?;
		self.data
			.shift_remove(&key)
			.ok_or(MappingError::KeyNotFound(key))
	}

	/// Removes every entry, keeping the dimension list.
	pub fn clear(&mut self) {
		self.data.clear();
	}

	/// Keys in first-insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &Key> {
		self.data.keys()
	}

	/// The single component of every key, in insertion order.
	///
	/// # Panics
	///
	/// Panics if the mapping is not one-dimensional.
	pub fn scalar_keys(&self) -> impl Iterator<Item = &DimValue> {
		assert!(
			self.ndims() == 1,
			"scalar_keys requires a one-dimensional mapping, this one has {} dimensions",
			self.ndims()
		);
		self.data.keys().map(|key| &key[0])
	}

	/// Values in first-insertion order.
	pub fn values(&self) -> impl Iterator<Item = &V> {
		self.data.values()
	}

	/// Mutable values in first-insertion order.
	pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
		self.data.values_mut()
	}

	/// Entries in first-insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&Key, &V)> {
		self.data.iter()
	}

	/// The component of every key along the named dimension, in iteration
	/// order.
	pub fn dimension_values(&self, name: &str) -> Result<Vec<DimValue>, MappingError> {
		let index = self
			.dimension_index(name)
			.ok_or_else(|| MappingError::UnknownDimension(name.to_owned()))?;
		Ok(self.data.keys().map(|key| key[index].clone()).collect())
	}
}

impl<V: Clone> NdMapping<V> {
	/// Projects the mapping onto an ordered subset (or reordering) of its
	/// dimensions, returning a new mapping; the receiver is untouched.
	///
	/// Requested dimensions are matched by name against the current
	/// dimension list, and the result carries the mapping's own dimension
	/// metadata, not freshly built descriptors. Surviving keys keep their
	/// relative iteration order. When distinct source keys collapse to the
	/// same projected key, the projected key keeps the position of its
	/// first occurrence and the value of its last; no aggregation is
	/// performed.
	pub fn reindex<D>(&self, dims: impl IntoIterator<Item = D>) -> Result<Self, MappingError>
	where
		D: Into<DimensionSpec>,
	{
		let mut key_dimensions = Vec::new();
		let mut positions = Vec::new();
		for spec in dims {
			let spec = spec.into();
			let index = self
				.dimension_index(spec.name())
				.ok_or_else(|| MappingError::UnknownDimension(spec.name().to_owned()))?;
			positions.push(index);
			key_dimensions.push(self.key_dimensions[index].clone());
		}
		trace!(
			from = ?self.dimension_labels(),
			to = ?key_dimensions.iter().map(Dimension::name).collect::<Vec<_>>(),
			"reindexing"
		);
		let mut data = IndexMap::with_capacity(self.data.len());
		for (key, value) in &self.data {
			let projected: Key = positions.iter().map(|&i| key[i].clone()).collect();
			data.insert(projected, value.clone());
		}
		Ok(Self {
			key_dimensions,
			data,
		})
	}

	/// Drops the named dimensions, projecting onto everything else in the
	/// current order.
	pub fn drop_dimensions<N>(&self, names: impl IntoIterator<Item = N>) -> Result<Self, MappingError>
	where
		N: AsRef<str>,
	{
		let dropped: Vec<String> = names.into_iter().map(|n| n.as_ref().to_owned()).collect();
		for name in &dropped {
			if self.dimension_index(name).is_none() {
				return Err(MappingError::UnknownDimension(name.clone()));
			}
		}
		let kept: Vec<Dimension> = self
			.key_dimensions
			.iter()
			.filter(|dim| !dropped.iter().any(|name| name == dim.name()))
			.cloned()
			.collect();
		self.reindex(kept)
	}

	/// Returns a new mapping with `dimension` inserted at `position` in
	/// the dimension list and `value` spliced into every key at the
	/// matching position; the receiver is untouched.
	///
	/// The value is coerced against the new dimension's declared type.
	/// Payloads carry over unchanged, in the same iteration order.
	pub fn add_dimension(
		&self,
		dimension: impl Into<DimensionSpec>,
		position: usize,
		value: impl Into<DimValue>,
	) -> Result<Self, MappingError> {
		let dimension = dimension.into().into_dimension()?;
		if position > self.ndims() {
			return Err(MappingError::PositionOutOfRange {
				position,
				ndims: self.ndims(),
			});
		}
		if self.dimension_index(dimension.name()).is_some() {
			return Err(MappingError::DuplicateDimension(dimension.name().to_owned()));
		}
		let value = dimension.coerce(value.into())?;
		debug!(dimension = dimension.name(), position, "adding dimension");

		let mut key_dimensions = self.key_dimensions.clone();
		key_dimensions.insert(position, dimension);

		let mut data = IndexMap::with_capacity(self.data.len());
		for (key, payload) in &self.data {
			let mut components: Vec<DimValue> = key.iter().cloned().collect();
			components.insert(position, value.clone());
			data.insert(Key::from(components), payload.clone());
		}
		Ok(Self {
			key_dimensions,
			data,
		})
	}
}

impl<V> IntoIterator for NdMapping<V> {
	type Item = (Key, V);
	type IntoIter = indexmap::map::IntoIter<Key, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.data.into_iter()
	}
}

impl<'a, V> IntoIterator for &'a NdMapping<V> {
	type Item = (&'a Key, &'a V);
	type IntoIter = indexmap::map::Iter<'a, Key, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.data.iter()
	}
}

fn normalize_dimensions<D>(dims: impl IntoIterator<Item = D>) -> Result<Vec<Dimension>, MappingError>
where
	D: Into<DimensionSpec>,
{
	dims.into_iter()
		.map(|spec| spec.into().into_dimension().map_err(MappingError::from))
		.collect()
}
