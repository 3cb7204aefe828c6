//! Scope-bound value handles
//!
//! A [`Local`] is a copyable pair of a host value and its [`ValueKind`]. The
//! type parameter records what the handle is known to be; reinterpreting it as
//! another type goes through [`Local::try_cast`] or, when the kind has already
//! been checked, [`Local::cast_unchecked`].

use std::fmt;
use std::marker::PhantomData;

use crate::host::{ElementKind, HostEngine, HostValue, ValueKind};
use crate::scope::HandleScope;
use crate::string::String;

/// A handle type: a marker naming the set of value kinds a [`Local`] may hold
pub trait HandleType {
    const NAME: &'static str;

    fn matches(kind: ValueKind) -> bool;
}

/// Declare a handle marker type and its upcast to [`Value`].
macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident, |$kind:ident| $matches:expr) => {
        $(#[$meta])*
        pub enum $name {}

        impl $crate::local::HandleType for $name {
            const NAME: &'static str = stringify!($name);

            fn matches($kind: $crate::host::ValueKind) -> bool {
                $matches
            }
        }

        impl<'s> From<$crate::local::Local<'s, $name>>
            for $crate::local::Local<'s, $crate::local::Value>
        {
            fn from(local: $crate::local::Local<'s, $name>) -> Self {
                local.into_value()
            }
        }
    };
}
pub(crate) use handle_type;

/// Any value
pub enum Value {}

impl HandleType for Value {
    const NAME: &'static str = "Value";

    fn matches(_: ValueKind) -> bool {
        true
    }
}

/// A value rooted by a [`HandleScope`] for the scope's lifetime `'s`.
///
/// Equality is host identity: two locals are equal when they refer to the same
/// host value, so equal-content strings in different cells are not equal. Use
/// [`Local::strict_equals`] to compare by value.
pub struct Local<'s, T> {
    value: HostValue,
    kind: ValueKind,
    _marker: PhantomData<(&'s (), *const T)>,
}

impl<T> Clone for Local<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Local<'_, T> {}

impl<'s, T> Local<'s, T> {
    pub(crate) fn from_raw(value: HostValue, kind: ValueKind) -> Self {
        Self {
            value,
            kind,
            _marker: PhantomData,
        }
    }

    pub(crate) fn host_value(&self) -> HostValue {
        self.value
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Reinterpret as `U` if the value's kind allows it
    pub fn try_cast<U: HandleType>(self) -> Option<Local<'s, U>> {
        U::matches(self.kind).then(|| Local::from_raw(self.value, self.kind))
    }

    /// Reinterpret as `U` without checking.
    ///
    /// # Safety
    /// The value's kind must satisfy `U`, as established by the matching
    /// `is_*` predicate or a successful [`try_cast`](Self::try_cast). Debug
    /// builds assert this.
    pub unsafe fn cast_unchecked<U: HandleType>(self) -> Local<'s, U> {
        debug_assert!(
            U::matches(self.kind),
            "cast of a {:?} to {}",
            self.kind,
            U::NAME
        );
        Local::from_raw(self.value, self.kind)
    }

    pub fn into_value(self) -> Local<'s, Value> {
        Local::from_raw(self.value, self.kind)
    }

    /// ECMAScript ToString. `None` for symbols or if the host can't allocate.
    pub fn to_string<'t>(&self, scope: &mut HandleScope<'t>) -> Option<Local<'t, String>> {
        let result = scope.host_mut().to_string(self.value);
        scope.adopt(result, "to_string")
    }

    /// ECMAScript `===`
    pub fn strict_equals<U>(&self, other: Local<'_, U>, scope: &HandleScope<'_>) -> bool {
        match (self.value, other.value) {
            (HostValue::String(_), HostValue::String(_)) => {
                match (
                    string_units(scope.host(), self.value),
                    string_units(scope.host(), other.value),
                ) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.kind == ValueKind::Undefined
    }

    pub fn is_null(&self) -> bool {
        self.kind == ValueKind::Null
    }

    pub fn is_null_or_undefined(&self) -> bool {
        self.is_null() || self.is_undefined()
    }

    pub fn is_boolean(&self) -> bool {
        self.kind == ValueKind::Boolean
    }

    pub fn is_true(&self) -> bool {
        self.value == HostValue::Boolean(true)
    }

    pub fn is_false(&self) -> bool {
        self.value == HostValue::Boolean(false)
    }

    pub fn is_number(&self) -> bool {
        self.kind == ValueKind::Number
    }

    /// A number with an exact int32 value
    pub fn is_int32(&self) -> bool {
        self.value
            .as_number()
            .is_some_and(|n| {
                n.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&n)
            })
    }

    /// A number with an exact uint32 value
    pub fn is_uint32(&self) -> bool {
        self.value
            .as_number()
            .is_some_and(|n| n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n))
    }

    pub fn is_string(&self) -> bool {
        self.kind == ValueKind::String
    }

    pub fn is_symbol(&self) -> bool {
        self.kind == ValueKind::Symbol
    }

    pub fn is_object(&self) -> bool {
        self.kind.is_object()
    }

    pub fn is_array_buffer(&self) -> bool {
        self.kind == ValueKind::ArrayBuffer
    }

    pub fn is_array_buffer_view(&self) -> bool {
        self.kind.is_array_buffer_view()
    }

    pub fn is_typed_array(&self) -> bool {
        matches!(self.kind, ValueKind::TypedArray(_))
    }

    pub fn is_data_view(&self) -> bool {
        self.kind == ValueKind::DataView
    }

    pub fn is_string_object(&self) -> bool {
        self.kind == ValueKind::StringObject
    }

    pub fn is_boolean_object(&self) -> bool {
        self.kind == ValueKind::BooleanObject
    }

    /// An [`External`](crate::object::External) pointer wrapper. Not to be
    /// confused with an array buffer over external memory.
    pub fn is_external_value(&self) -> bool {
        self.kind == ValueKind::External
    }

    pub fn is_date(&self) -> bool {
        self.kind == ValueKind::Date
    }

    /// Element kind, for typed arrays
    pub fn element_kind(&self) -> Option<ElementKind> {
        match self.kind {
            ValueKind::TypedArray(kind) => Some(kind),
            _ => None,
        }
    }
}

fn string_units(host: &dyn HostEngine, string: HostValue) -> Option<Vec<u16>> {
    let mut units = vec![0; host.string_length(string)];
    host.copy_string_chars(string, &mut units).ok()?;
    Some(units)
}

impl<T, U> PartialEq<Local<'_, U>> for Local<'_, T> {
    fn eq(&self, other: &Local<'_, U>) -> bool {
        self.value == other.value
    }
}

impl<T: HandleType> fmt::Debug for Local<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Local")
            .field("type", &T::NAME)
            .field("value", &self.value)
            .field("kind", &self.kind)
            .finish()
    }
}
