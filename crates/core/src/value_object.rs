//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, build a new value: `Money::checked_add` returns a fresh
/// `Money` and never touches its operands.
///
/// ```
/// use tallybook_core::{Money, ValueObject};
///
/// fn assert_value_object<T: ValueObject>(_: &T) {}
///
/// let a = Money::from_minor_units(100);
/// let b = Money::from_minor_units(100);
/// assert_value_object(&a);
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
