use std::fmt;
use std::ops::Deref;

use smallvec::SmallVec;

use crate::value::DimValue;

/// A stored key: one [`DimValue`] component per key dimension.
///
/// The inline capacity covers the common one- and two-dimensional cases
/// without allocating.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key(SmallVec<[DimValue; 2]>);

impl Key {
	/// Creates a key with a single component.
	pub fn single(value: DimValue) -> Self {
		Self(smallvec::smallvec![value])
	}

	/// The key's components, in dimension order.
	pub fn components(&self) -> &[DimValue] {
		&self.0
	}
}

impl Deref for Key {
	type Target = [DimValue];

	fn deref(&self) -> &[DimValue] {
		&self.0
	}
}

impl FromIterator<DimValue> for Key {
	fn from_iter<I: IntoIterator<Item = DimValue>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl From<Vec<DimValue>> for Key {
	fn from(components: Vec<DimValue>) -> Self {
		Self(components.into_iter().collect())
	}
}

impl IntoIterator for Key {
	type Item = DimValue;
	type IntoIter = smallvec::IntoIter<[DimValue; 2]>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a Key {
	type Item = &'a DimValue;
	type IntoIter = std::slice::Iter<'a, DimValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let [single] = self.components() {
			return write!(f, "{single}");
		}
		f.write_str("(")?;
		for (i, component) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{component}")?;
		}
		f.write_str(")")
	}
}

/// Conversion of caller-supplied key shapes into a [`Key`].
///
/// Bare scalars become single-component keys (the one-dimensional
/// convenience); tuples become multi-component keys in field order. The
/// mapping validates arity after conversion, so a bare scalar handed to a
/// multi-dimensional mapping fails there, not here.
pub trait IntoKey {
	/// Converts `self` into a key.
	fn into_key(self) -> Key;
}

impl IntoKey for Key {
	fn into_key(self) -> Key {
		self
	}
}

impl IntoKey for &Key {
	fn into_key(self) -> Key {
		self.clone()
	}
}

impl IntoKey for DimValue {
	fn into_key(self) -> Key {
		Key::single(self)
	}
}

impl IntoKey for &DimValue {
	fn into_key(self) -> Key {
		Key::single(self.clone())
	}
}

impl IntoKey for Vec<DimValue> {
	fn into_key(self) -> Key {
		Key::from(self)
	}
}

macro_rules! impl_into_key_scalar {
	($($ty:ty),+ $(,)?) => {
		$(impl IntoKey for $ty {
			fn into_key(self) -> Key {
				Key::single(self.into())
			}
		})+
	};
}

impl_into_key_scalar!(i64, i32, f64, f32, &str, String);

macro_rules! impl_into_key_tuple {
	($(($($field:ident: $ty:ident),+)),+ $(,)?) => {
		$(impl<$($ty: Into<DimValue>),+> IntoKey for ($($ty,)+) {
			fn into_key(self) -> Key {
				let ($($field,)+) = self;
				Key(smallvec::smallvec![$($field.into()),+])
			}
		})+
	};
}

impl_into_key_tuple!(
	(a: A),
	(a: A, b: B),
	(a: A, b: B, c: C),
	(a: A, b: B, c: C, d: D),
	(a: A, b: B, c: C, d: D, e: E),
	(a: A, b: B, c: C, d: D, e: E, f: F),
);
