//! Handle scopes
//!
//! A [`HandleScope`] owns the host roots behind every [`Local`] created through
//! it. Dropping the scope releases exactly those roots; the values stay alive
//! only if something else still reaches them.

use crate::error::HostResult;
use crate::host::{HostEngine, HostValue};
use crate::isolate::Isolate;
use crate::local::{HandleType, Local};

pub struct HandleScope<'s> {
    isolate: &'s mut Isolate,
    roots: Vec<HostValue>,
}

impl<'s> HandleScope<'s> {
    pub fn new(isolate: &'s mut Isolate) -> Self {
        Self {
            isolate,
            roots: Vec::new(),
        }
    }

    /// Open a child scope. Locals created through it are released when it
    /// drops, before the parent can be used again.
    pub fn nested(&mut self) -> HandleScope<'_> {
        HandleScope {
            isolate: &mut *self.isolate,
            roots: Vec::new(),
        }
    }

    /// Roots registered by this scope (not its children)
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn isolate(&self) -> &Isolate {
        self.isolate
    }

    pub(crate) fn host(&self) -> &dyn HostEngine {
        self.isolate.host()
    }

    pub(crate) fn host_mut(&mut self) -> &mut dyn HostEngine {
        self.isolate.host_mut()
    }

    /// Wrap a host value in a local rooted by this scope. `None` if the value
    /// doesn't have the kind `T` requires.
    pub(crate) fn make_local<T: HandleType>(&mut self, value: HostValue) -> Option<Local<'s, T>> {
        let kind = self.host().classify(value);
        if !T::matches(kind) {
            tracing::debug!(?kind, expected = T::NAME, "host returned a value of the wrong kind");
            return None;
        }
        if value.cell().is_some() {
            self.isolate.host_mut().add_root(value);
            self.roots.push(value);
        }
        Some(Local::from_raw(value, kind))
    }

    /// Root the result of a host primitive, or log why there is no handle
    pub(crate) fn adopt<T: HandleType>(
        &mut self,
        result: HostResult<HostValue>,
        operation: &'static str,
    ) -> Option<Local<'s, T>> {
        match result {
            Ok(value) => self.make_local(value),
            Err(err) if err.is_allocation_failure() => {
                tracing::debug!(operation, error = %err, "allocation failed, returning an empty handle");
                None
            }
            Err(err) => {
                tracing::debug!(operation, error = %err, "request rejected, returning an empty handle");
                None
            }
        }
    }
}

impl Drop for HandleScope<'_> {
    fn drop(&mut self) {
        if !self.roots.is_empty() {
            tracing::trace!(roots = self.roots.len(), "releasing scope roots");
        }
        let host = self.isolate.host_mut();
        for value in self.roots.drain(..) {
            host.remove_root(value);
        }
    }
}
