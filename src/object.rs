//! Objects: primitive wrappers, external pointers and dates

use std::ffi::c_void;

use crate::host::{HostValue, ValueKind};
use crate::local::{Local, handle_type};
use crate::scope::HandleScope;
use crate::string::String;

handle_type!(
    /// Any object, including buffers, views and wrappers
    Object,
    |kind| kind.is_object()
);

handle_type!(
    /// A `String` wrapper object, as made by `new String(s)`
    StringObject,
    |kind| kind == ValueKind::StringObject
);

handle_type!(
    /// A `Boolean` wrapper object, as made by `new Boolean(b)`
    BooleanObject,
    |kind| kind == ValueKind::BooleanObject
);

handle_type!(
    /// An object carrying an embedder pointer. The pointer is never read or
    /// freed by the engine.
    External,
    |kind| kind == ValueKind::External
);

handle_type!(Date, |kind| kind == ValueKind::Date);

impl StringObject {
    pub fn new<'s>(
        scope: &mut HandleScope<'s>,
        value: Local<'_, String>,
    ) -> Option<Local<'s, StringObject>> {
        let result = scope.host_mut().box_primitive(value.host_value());
        scope.adopt(result, "StringObject::new")
    }
}

impl Local<'_, StringObject> {
    /// The wrapped string
    pub fn value_of<'t>(&self, scope: &mut HandleScope<'t>) -> Option<Local<'t, String>> {
        let result = scope.host().unbox(self.host_value());
        scope.adopt(result, "StringObject::value_of")
    }
}

impl BooleanObject {
    pub fn new<'s>(scope: &mut HandleScope<'s>, value: bool) -> Option<Local<'s, BooleanObject>> {
        let result = scope.host_mut().box_primitive(HostValue::Boolean(value));
        scope.adopt(result, "BooleanObject::new")
    }
}

impl Local<'_, BooleanObject> {
    /// The wrapped boolean
    pub fn value_of(&self, scope: &HandleScope<'_>) -> bool {
        scope.host().unbox(self.host_value()) == Ok(HostValue::Boolean(true))
    }
}

impl External {
    pub fn new<'s>(scope: &mut HandleScope<'s>, value: *mut c_void) -> Option<Local<'s, External>> {
        let result = scope.host_mut().new_external(value);
        scope.adopt(result, "External::new")
    }

    /// The pointer carried by `value`, or null if it isn't an `External`
    #[doc(alias = "unwrap")]
    pub fn pointer_of<T>(scope: &HandleScope<'_>, value: Local<'_, T>) -> *mut c_void {
        scope.host().external_value(value.host_value())
    }
}

impl Local<'_, External> {
    pub fn value(&self, scope: &HandleScope<'_>) -> *mut c_void {
        scope.host().external_value(self.host_value())
    }
}

impl Date {
    /// A date at `time` milliseconds from the epoch. Times that aren't finite
    /// or lie beyond ±8.64e15 make an invalid date.
    pub fn new<'s>(scope: &mut HandleScope<'s>, time: f64) -> Option<Local<'s, Date>> {
        let result = scope.host_mut().new_date(time);
        scope.adopt(result, "Date::new")
    }
}

impl Local<'_, Date> {
    /// Time value in milliseconds; NaN for an invalid date
    pub fn value_of(&self, scope: &HandleScope<'_>) -> f64 {
        scope.host().date_value(self.host_value())
    }
}
