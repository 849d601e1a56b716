//! Property tweens
//!
//! A tween pairs a resolved property with its begin and end values. The way a
//! tween produces intermediate values is fixed when it is registered:
//! numeric kinds interpolate linearly, everything else snaps to the end value
//! once the animation completes.

use glide_core::{PropertyRef, Value, ValueType};

/// How a tween produces intermediate values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    /// `begin + (end - begin) * alpha`
    Numeric,
    /// Unchanged until `alpha >= 1`, then the end value verbatim
    Snap,
}

impl Interpolation {
    /// Strategy for a declared type, `None` if the type cannot be animated
    pub fn for_type(value_type: ValueType) -> Option<Self> {
        match value_type {
            ty if ty.is_numeric() => Some(Interpolation::Numeric),
            ValueType::Bool | ValueType::Text => Some(Interpolation::Snap),
            ValueType::Custom(ty) if ty.snap => Some(Interpolation::Snap),
            ValueType::Custom(_) => None,
            // Numeric variants are all taken by the guarded arm above
            _ => None,
        }
    }
}

/// A single animated property
#[derive(Clone, Debug)]
pub struct Tween {
    property: PropertyRef,
    interpolation: Interpolation,
    begin: Option<Value>,
    end: Value,
}

impl Tween {
    /// Callers guarantee `end` has the property's declared type
    pub(crate) fn new(property: PropertyRef, interpolation: Interpolation, end: Value) -> Self {
        Self {
            property,
            interpolation,
            begin: None,
            end,
        }
    }

    pub fn property(&self) -> &PropertyRef {
        &self.property
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Value captured when the animation started, `None` while idle
    pub fn begin(&self) -> Option<&Value> {
        self.begin.as_ref()
    }

    pub fn end(&self) -> &Value {
        &self.end
    }

    pub(crate) fn set_begin(&mut self, value: Value) {
        self.begin = Some(value);
    }

    pub(crate) fn clear_begin(&mut self) {
        self.begin = None;
    }

    /// Value to write at eased progress `alpha`
    ///
    /// `None` means the property is left as it is for this frame: snap tweens
    /// before completion, or numeric tweens with no captured begin value.
    pub fn value_at(&self, alpha: f64) -> Option<Value> {
        match self.interpolation {
            Interpolation::Snap => (alpha >= 1.0).then(|| self.end.clone()),
            Interpolation::Numeric => {
                let begin = self.begin.as_ref()?;
                if alpha <= 0.0 {
                    Some(begin.clone())
                } else if alpha >= 1.0 {
                    Some(self.end.clone())
                } else {
                    lerp(begin, &self.end, alpha)
                }
            }
        }
    }
}

fn lerp(begin: &Value, end: &Value, alpha: f64) -> Option<Value> {
    let value = match (begin, end) {
        (Value::Int(b), Value::Int(e)) => Value::Int(lerp_int(*b as i128, *e as i128, alpha) as i32),
        (Value::UInt(b), Value::UInt(e)) => {
            Value::UInt(lerp_int(*b as i128, *e as i128, alpha) as u32)
        }
        (Value::Long(b), Value::Long(e)) => {
            Value::Long(lerp_int(*b as i128, *e as i128, alpha) as i64)
        }
        (Value::ULong(b), Value::ULong(e)) => {
            Value::ULong(lerp_int(*b as i128, *e as i128, alpha) as u64)
        }
        (Value::Float(b), Value::Float(e)) => {
            Value::Float(lerp_f64(*b as f64, *e as f64, alpha) as f32)
        }
        (Value::Double(b), Value::Double(e)) => Value::Double(lerp_f64(*b, *e, alpha)),
        _ => return None,
    };
    Some(value)
}

fn lerp_f64(begin: f64, end: f64, alpha: f64) -> f64 {
    begin + (end - begin) * alpha
}

/// Integer interpolation over a signed difference, truncated toward zero.
/// The result always lies between `begin` and `end`.
fn lerp_int(begin: i128, end: i128, alpha: f64) -> i128 {
    let step = ((end - begin) as f64 * alpha) as i128;
    let (lo, hi) = if begin <= end { (begin, end) } else { (end, begin) };
    (begin + step).clamp(lo, hi)
}
