//! Property stores
//!
//! Animations read and write their target through [`PropertyStore`]. A property
//! is either owned by the object itself ([`PropertyKind::Direct`]) or by a
//! structural relation of the object, such as the container slot a widget
//! sits in ([`PropertyKind::Child`]).

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::PropertyError;
use crate::value::{Value, ValueType};

/// Shared, single-threaded handle to an animatable object
pub type SharedStore = Rc<RefCell<dyn PropertyStore>>;

/// Where a property lives relative to the object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Owned by the object
    Direct,
    /// Owned by the object's relation and addressed through it
    Child,
}

/// A resolved property: name, declared type, and location
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyRef {
    pub name: String,
    pub value_type: ValueType,
    pub kind: PropertyKind,
}

impl PropertyRef {
    pub fn direct(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            kind: PropertyKind::Direct,
        }
    }

    pub fn child(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            kind: PropertyKind::Child,
        }
    }

    pub fn is_child(&self) -> bool {
        self.kind == PropertyKind::Child
    }
}

/// An object with named, typed properties
pub trait PropertyStore {
    /// Declared type of a direct property, `None` if the object has no such property
    fn find_property(&self, name: &str) -> Option<ValueType>;

    /// Declared type of a property owned by the object's relation
    ///
    /// Fails with [`PropertyError::NoRelation`] when the object has no relation
    /// and [`PropertyError::NotFound`] when the relation lacks the property.
    fn find_child_property(&self, name: &str) -> Result<ValueType, PropertyError> {
        Err(PropertyError::NoRelation(name.to_owned()))
    }

    /// Current value of a resolved property
    fn get(&self, property: &PropertyRef) -> Result<Value, PropertyError>;

    /// Write a resolved property
    fn set(&mut self, property: &PropertyRef, value: Value) -> Result<(), PropertyError>;

    /// Resolve a name, preferring direct properties over child properties
    fn resolve(&self, name: &str) -> Result<PropertyRef, PropertyError> {
        if let Some(ty) = self.find_property(name) {
            return Ok(PropertyRef::direct(name, ty));
        }
        self.find_child_property(name)
            .map(|ty| PropertyRef::child(name, ty))
    }
}

/// In-memory property store
///
/// Each property's declared type is the type of the value it was installed
/// with. An optional relation holds the child properties.
#[derive(Debug, Default)]
pub struct PropertyMap {
    values: FxHashMap<String, Value>,
    relation: Option<Rc<RefCell<PropertyMap>>>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property with its initial value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.install(name, value);
        self
    }

    /// Attach the relation that owns this object's child properties
    pub fn with_relation(mut self, relation: Rc<RefCell<PropertyMap>>) -> Self {
        self.relation = Some(relation);
        self
    }

    /// Declare (or redeclare) a property
    pub fn install(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Current value of a direct property
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn relation(&self) -> Option<&Rc<RefCell<PropertyMap>>> {
        self.relation.as_ref()
    }

    fn get_direct(&self, name: &str) -> Result<Value, PropertyError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| PropertyError::NotFound(name.to_owned()))
    }

    fn set_direct(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| PropertyError::NotFound(name.to_owned()))?;
        let expected = slot.value_type();
        let actual = value.value_type();
        if expected != actual {
            return Err(PropertyError::TypeMismatch {
                name: name.to_owned(),
                expected,
                actual,
            });
        }
        *slot = value;
        Ok(())
    }

    fn relation_or_err(&self, name: &str) -> Result<&Rc<RefCell<PropertyMap>>, PropertyError> {
        self.relation
            .as_ref()
            .ok_or_else(|| PropertyError::NoRelation(name.to_owned()))
    }
}

impl PropertyStore for PropertyMap {
    fn find_property(&self, name: &str) -> Option<ValueType> {
        self.values.get(name).map(Value::value_type)
    }

    fn find_child_property(&self, name: &str) -> Result<ValueType, PropertyError> {
        self.relation_or_err(name)?
            .borrow()
            .find_property(name)
            .ok_or_else(|| PropertyError::NotFound(name.to_owned()))
    }

    fn get(&self, property: &PropertyRef) -> Result<Value, PropertyError> {
        match property.kind {
            PropertyKind::Direct => self.get_direct(&property.name),
            PropertyKind::Child => self
                .relation_or_err(&property.name)?
                .borrow()
                .get_direct(&property.name),
        }
    }

    fn set(&mut self, property: &PropertyRef, value: Value) -> Result<(), PropertyError> {
        match property.kind {
            PropertyKind::Direct => self.set_direct(&property.name, value),
            PropertyKind::Child => self
                .relation_or_err(&property.name)?
                .borrow_mut()
                .set_direct(&property.name, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> Rc<RefCell<PropertyMap>> {
        Rc::new(RefCell::new(PropertyMap::new().with("padding", 4u32)))
    }

    #[test]
    fn test_resolve_prefers_direct_properties() {
        let map = PropertyMap::new()
            .with("width", 10i32)
            .with_relation(slot());

        let width = map.resolve("width").unwrap();
        assert_eq!(width, PropertyRef::direct("width", ValueType::Int));

        let padding = map.resolve("padding").unwrap();
        assert_eq!(padding, PropertyRef::child("padding", ValueType::UInt));
        assert!(padding.is_child());
    }

    #[test]
    fn test_resolve_reports_missing_relation() {
        let map = PropertyMap::new().with("width", 10i32);
        assert_eq!(
            map.resolve("padding"),
            Err(PropertyError::NoRelation("padding".into()))
        );

        let with_slot = PropertyMap::new().with_relation(slot());
        assert_eq!(
            with_slot.resolve("margin"),
            Err(PropertyError::NotFound("margin".into()))
        );
    }

    #[test]
    fn test_child_writes_land_on_relation() {
        let relation = slot();
        let mut map = PropertyMap::new().with_relation(relation.clone());
        let padding = PropertyRef::child("padding", ValueType::UInt);

        map.set(&padding, Value::UInt(12)).unwrap();
        assert_eq!(relation.borrow().value("padding"), Some(&Value::UInt(12)));
        assert_eq!(map.get(&padding), Ok(Value::UInt(12)));
    }

    #[test]
    fn test_set_rejects_wrong_type() {
        let mut map = PropertyMap::new().with("opacity", 1.0f64);
        let opacity = PropertyRef::direct("opacity", ValueType::Double);

        let err = map.set(&opacity, Value::Int(0)).unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { .. }));
        assert_eq!(map.value("opacity"), Some(&Value::Double(1.0)));
    }
}
