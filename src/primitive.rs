//! Primitive values: undefined, null, booleans, numbers and symbols

use crate::host::{HostValue, ValueKind};
use crate::local::{Local, handle_type};
use crate::scope::HandleScope;
use crate::string::String;

handle_type!(
    /// Any non-object value
    Primitive,
    |kind| !kind.is_object()
);

handle_type!(Boolean, |kind| kind == ValueKind::Boolean);

handle_type!(Number, |kind| kind == ValueKind::Number);

handle_type!(
    /// A number read as an integer. Any number satisfies this type.
    Integer,
    |kind| kind == ValueKind::Number
);

handle_type!(
    /// A unique value, optionally described by a string
    Symbol,
    |kind| kind == ValueKind::Symbol
);

pub fn undefined<'s>(_scope: &mut HandleScope<'s>) -> Local<'s, Primitive> {
    Local::from_raw(HostValue::Undefined, ValueKind::Undefined)
}

pub fn null<'s>(_scope: &mut HandleScope<'s>) -> Local<'s, Primitive> {
    Local::from_raw(HostValue::Null, ValueKind::Null)
}

impl Boolean {
    pub fn new<'s>(_scope: &mut HandleScope<'s>, value: bool) -> Local<'s, Boolean> {
        Local::from_raw(HostValue::Boolean(value), ValueKind::Boolean)
    }
}

impl Local<'_, Boolean> {
    pub fn value(&self) -> bool {
        self.host_value() == HostValue::Boolean(true)
    }
}

impl Number {
    pub fn new<'s>(_scope: &mut HandleScope<'s>, value: f64) -> Local<'s, Number> {
        Local::from_raw(HostValue::number(value), ValueKind::Number)
    }
}

impl Local<'_, Number> {
    pub fn value(&self) -> f64 {
        self.host_value().as_number().unwrap_or(f64::NAN)
    }
}

impl Integer {
    pub fn new<'s>(_scope: &mut HandleScope<'s>, value: i32) -> Local<'s, Integer> {
        Local::from_raw(HostValue::Int32(value), ValueKind::Number)
    }

    pub fn new_from_unsigned<'s>(_scope: &mut HandleScope<'s>, value: u32) -> Local<'s, Integer> {
        Local::from_raw(HostValue::number(f64::from(value)), ValueKind::Number)
    }
}

impl Local<'_, Integer> {
    /// The number truncated toward zero, saturating at the `i64` range; NaN is 0
    pub fn value(&self) -> i64 {
        self.host_value().as_number().map_or(0, |n| n as i64)
    }
}

impl Symbol {
    pub fn new<'s>(
        scope: &mut HandleScope<'s>,
        description: Option<Local<'_, String>>,
    ) -> Option<Local<'s, Symbol>> {
        let description = description.map(|d| d.host_value());
        let result = scope.host_mut().new_symbol(description);
        scope.adopt(result, "Symbol::new")
    }
}

impl Local<'_, Symbol> {
    pub fn description<'t>(&self, scope: &mut HandleScope<'t>) -> Option<Local<'t, String>> {
        let description = scope.host().symbol_description(self.host_value())?;
        scope.make_local(description)
    }
}
