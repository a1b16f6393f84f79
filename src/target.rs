//! What the population engine can do with a destination value.
//!
//! A target describes itself through [`Populate::shape`], which hands the
//! engine one of five capabilities: enumerate fields, resize and index a
//! sequence, allocate an optional value, store a coerced scalar, or report
//! that it cannot be populated at all.
//!
//! Structs get their implementation from `#[derive(Populate)]`; the scalar,
//! `Option`, `Vec`, and `Box` implementations live here.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::coerce::{Scalar, ScalarKind};
use crate::error::PathfigError;

/// A value the engine can write configuration into.
pub trait Populate {
    fn shape(&mut self) -> Shape<'_>;
}

/// The capability a target exposes for one population step.
pub enum Shape<'a> {
    /// Named fields, visited in declaration order.
    Struct(&'a mut dyn Fields),
    /// A growable list whose length is chosen from the sources.
    Sequence(&'a mut dyn Sequence),
    /// An indirection that is allocated on first use.
    Optional(&'a mut dyn Optional),
    /// A leaf that accepts one coerced scalar.
    Scalar(&'a mut dyn ScalarSlot),
    /// A kind the engine refuses, named for the error message.
    Unsupported(&'static str),
}

/// Static description of one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The declared field name.
    pub name: &'static str,
    /// An explicit path segment overriding the derived one.
    pub tag: Option<&'static str>,
    /// Whether the field's own fields are addressed at the parent's path.
    pub flatten: bool,
}

impl Field {
    pub const fn named(name: &'static str) -> Self {
        Field {
            name,
            tag: None,
            flatten: false,
        }
    }
}

pub trait Fields {
    /// Call `visit` once per populatable field, in declaration order,
    /// stopping at the first error.
    fn visit_fields(
        &mut self,
        visit: &mut dyn FnMut(Field, &mut dyn Populate) -> Result<(), PathfigError>,
    ) -> Result<(), PathfigError>;
}

pub trait Sequence {
    /// Replace the contents with `len` fresh elements.
    fn reset(&mut self, len: usize);
    /// Element `index`, which must be below the length last passed to `reset`.
    fn element(&mut self, index: usize) -> &mut dyn Populate;
}

pub trait Optional {
    /// The contained value, default-constructed if it was absent.
    fn get_or_init(&mut self) -> &mut dyn Populate;
}

pub trait ScalarSlot {
    fn kind(&self) -> ScalarKind;
    /// Store `value`. Returns `false`, leaving the slot untouched, when the
    /// value does not fit the slot's concrete type.
    fn store(&mut self, value: Scalar) -> bool;
}

impl<T: Populate + Default> Populate for Vec<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Sequence(self)
    }
}

impl<T: Populate + Default> Sequence for Vec<T> {
    fn reset(&mut self, len: usize) {
        self.clear();
        self.resize_with(len, T::default);
    }

    fn element(&mut self, index: usize) -> &mut dyn Populate {
        &mut self[index]
    }
}

impl<T: Populate + Default> Populate for Option<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Optional(self)
    }
}

impl<T: Populate + Default> Optional for Option<T> {
    fn get_or_init(&mut self) -> &mut dyn Populate {
        self.get_or_insert_with(T::default)
    }
}

impl<T: Populate + ?Sized> Populate for Box<T> {
    fn shape(&mut self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<K, V, S> Populate for HashMap<K, V, S> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Unsupported("map")
    }
}

impl<K, V> Populate for BTreeMap<K, V> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Unsupported("map")
    }
}

macro_rules! scalar_leaf {
    ($($ty:ty => $kind:ident, |$v:ident| $store:expr;)*) => {$(
        impl Populate for $ty {
            fn shape(&mut self) -> Shape<'_> {
                Shape::Scalar(self)
            }
        }

        impl ScalarSlot for $ty {
            fn kind(&self) -> ScalarKind {
                ScalarKind::$kind
            }

            fn store(&mut self, value: Scalar) -> bool {
                let Scalar::$kind($v) = value else {
                    return false;
                };
                let converted: Option<$ty> = $store;
                match converted {
                    Some(v) => {
                        *self = v;
                        true
                    }
                    None => false,
                }
            }
        }
    )*};
}

scalar_leaf! {
    String => String, |s| Some(s);
    PathBuf => String, |s| Some(PathBuf::from(s));
    bool => Bool, |b| Some(b);
    f64 => Float, |x| Some(x);
    f32 => Float, |x| {
        let narrowed = x as f32;
        (narrowed.is_finite() || !x.is_finite()).then_some(narrowed)
    };
    i64 => Int, |i| Some(i);
    i32 => Int, |i| i32::try_from(i).ok();
    i16 => Int, |i| i16::try_from(i).ok();
    i8 => Int, |i| i8::try_from(i).ok();
    isize => Int, |i| isize::try_from(i).ok();
    u64 => Uint, |u| Some(u);
    u32 => Uint, |u| u32::try_from(u).ok();
    u16 => Uint, |u| u16::try_from(u).ok();
    u8 => Uint, |u| u8::try_from(u).ok();
    usize => Uint, |u| usize::try_from(u).ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_into<T: Populate>(target: &mut T, value: Scalar) -> bool {
        match target.shape() {
            Shape::Scalar(slot) => slot.store(value),
            _ => panic!("not a scalar"),
        }
    }

    #[test]
    fn narrowing_rejects_out_of_range() {
        let mut small: u8 = 7;
        assert!(!store_into(&mut small, Scalar::Uint(300)));
        assert_eq!(small, 7);
        assert!(store_into(&mut small, Scalar::Uint(200)));
        assert_eq!(small, 200);

        let mut signed: i16 = 0;
        assert!(!store_into(&mut signed, Scalar::Int(-40_000)));
        assert!(store_into(&mut signed, Scalar::Int(-4)));
        assert_eq!(signed, -4);
    }

    #[test]
    fn f32_rejects_values_beyond_its_range() {
        let mut ratio = 1.5_f32;
        assert!(!store_into(&mut ratio, Scalar::Float(1e300)));
        assert!(!store_into(&mut ratio, Scalar::Float(-1e300)));
        assert_eq!(ratio, 1.5);

        assert!(store_into(&mut ratio, Scalar::Float(0.25)));
        assert_eq!(ratio, 0.25);
        assert!(store_into(&mut ratio, Scalar::Float(f64::INFINITY)));
        assert_eq!(ratio, f32::INFINITY);
    }

    #[test]
    fn mismatched_scalar_is_refused() {
        let mut flag = false;
        assert!(!store_into(&mut flag, Scalar::Int(1)));
        assert!(!flag);
    }

    #[test]
    fn path_and_string_slots_take_strings() {
        let mut path = PathBuf::new();
        assert!(store_into(&mut path, Scalar::String("/var/lib".into())));
        assert_eq!(path, PathBuf::from("/var/lib"));

        let mut s = String::new();
        assert_eq!(s.kind(), ScalarKind::String);
        assert!(store_into(&mut s, Scalar::String("x".into())));
        assert_eq!(s, "x");
    }

    #[test]
    fn vec_reset_replaces_contents() {
        let mut v = vec![1_u32, 2, 3];
        v.reset(2);
        assert_eq!(v, vec![0, 0]);
        v.reset(0);
        assert!(v.is_empty());
    }

    #[test]
    fn option_allocates_once() {
        let mut opt: Option<u16> = None;
        match opt.shape() {
            Shape::Optional(o) => {
                let inner = o.get_or_init();
                assert!(matches!(inner.shape(), Shape::Scalar(_)));
            }
            _ => panic!("not optional"),
        }
        assert_eq!(opt, Some(0));

        let mut present = Some(5_u16);
        if let Shape::Optional(o) = present.shape() {
            o.get_or_init();
        }
        assert_eq!(present, Some(5));
    }

    #[test]
    fn boxes_are_transparent() {
        let mut boxed = Box::new(1_i64);
        assert!(store_into(&mut boxed, Scalar::Int(9)));
        assert_eq!(*boxed, 9);
    }

    #[test]
    fn maps_are_unsupported() {
        let mut map: HashMap<String, String> = HashMap::new();
        assert!(matches!(map.shape(), Shape::Unsupported("map")));
        let mut tree: BTreeMap<String, u8> = BTreeMap::new();
        assert!(matches!(tree.shape(), Shape::Unsupported("map")));
    }
}
