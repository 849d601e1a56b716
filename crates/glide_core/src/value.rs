//! Typed property values
//!
//! A closed set of value kinds. Numeric kinds can be interpolated; the rest
//! are opaque to the animation engine and can at most be swapped in whole.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// An application-defined value type
///
/// `snap` marks types that may be animated by writing the end value once the
/// animation completes. Types without it are rejected by the animation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CustomType {
    pub name: &'static str,
    pub snap: bool,
}

impl CustomType {
    pub const fn new(name: &'static str) -> Self {
        Self { name, snap: false }
    }

    /// A custom type that snaps to its end value on completion
    pub const fn snapping(name: &'static str) -> Self {
        Self { name, snap: true }
    }
}

/// Declared type of a property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Bool,
    Text,
    Custom(CustomType),
}

impl ValueType {
    /// Whether values of this type have a numeric representation
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueType::Int
                | ValueType::UInt
                | ValueType::Long
                | ValueType::ULong
                | ValueType::Float
                | ValueType::Double
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => f.write_str("int"),
            ValueType::UInt => f.write_str("uint"),
            ValueType::Long => f.write_str("long"),
            ValueType::ULong => f.write_str("ulong"),
            ValueType::Float => f.write_str("float"),
            ValueType::Double => f.write_str("double"),
            ValueType::Bool => f.write_str("bool"),
            ValueType::Text => f.write_str("text"),
            ValueType::Custom(ty) => f.write_str(ty.name),
        }
    }
}

/// A value of an application-defined type
#[derive(Clone)]
pub struct CustomValue {
    ty: CustomType,
    data: Rc<dyn Any>,
}

impl CustomValue {
    pub fn new<T: Any>(ty: CustomType, data: T) -> Self {
        Self {
            ty,
            data: Rc::new(data),
        }
    }

    pub fn custom_type(&self) -> CustomType {
        self.ty
    }

    /// Borrow the payload if it is a `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("ty", &self.ty.name)
            .finish_non_exhaustive()
    }
}

/// Custom values compare by identity of their payload
impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && Rc::ptr_eq(&self.data, &other.data)
    }
}

/// A property value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Text(String),
    Custom(CustomValue),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::UInt(_) => ValueType::UInt,
            Value::Long(_) => ValueType::Long,
            Value::ULong(_) => ValueType::ULong,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::Bool(_) => ValueType::Bool,
            Value::Text(_) => ValueType::Text,
            Value::Custom(v) => ValueType::Custom(v.custom_type()),
        }
    }

    /// Numeric value widened to `f64`, `None` for non-numeric kinds
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(v) => Some(v as f64),
            Value::UInt(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::ULong(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::ULong(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<CustomValue> for Value {
    fn from(v: CustomValue) -> Self {
        Value::Custom(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLOR: CustomType = CustomType::snapping("color");

    #[test]
    fn test_value_type_matches_variant() {
        assert_eq!(Value::from(3i32).value_type(), ValueType::Int);
        assert_eq!(Value::from(3u64).value_type(), ValueType::ULong);
        assert_eq!(Value::from(0.5f32).value_type(), ValueType::Float);
        assert_eq!(Value::from("hi").value_type(), ValueType::Text);

        let c = Value::from(CustomValue::new(COLOR, [1u8, 2, 3]));
        assert_eq!(c.value_type(), ValueType::Custom(COLOR));
    }

    #[test]
    fn test_numeric_classification() {
        assert!(ValueType::Long.is_numeric());
        assert!(ValueType::Double.is_numeric());
        assert!(!ValueType::Bool.is_numeric());
        assert!(!ValueType::Custom(COLOR).is_numeric());
        assert_eq!(Value::UInt(7).as_f64(), Some(7.0));
        assert_eq!(Value::Bool(true).as_f64(), None);
    }

    #[test]
    fn test_custom_values_compare_by_identity() {
        let a = CustomValue::new(COLOR, 42u32);
        let b = a.clone();
        let c = CustomValue::new(COLOR, 42u32);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.downcast_ref::<u32>(), Some(&42));
        assert_eq!(a.downcast_ref::<i64>(), None);
    }

    #[test]
    fn test_display_uses_custom_name() {
        assert_eq!(ValueType::Custom(COLOR).to_string(), "color");
        assert_eq!(ValueType::ULong.to_string(), "ulong");
    }
}
