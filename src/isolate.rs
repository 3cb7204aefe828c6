//! Isolates and the current-isolate registry

use std::cell::RefCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::config::CreateParams;
use crate::gc::HeapStatistics;
use crate::host::{HeapHost, HostEngine};

static NEXT_ISOLATE_ID: AtomicU32 = AtomicU32::new(1);

thread_local! {
    /// Isolates entered on this thread, innermost last
    static ENTERED: RefCell<Vec<IsolateId>> = const { RefCell::new(Vec::new()) };
}

/// Process-unique isolate identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsolateId(u32);

impl fmt::Display for IsolateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "isolate-{}", self.0)
    }
}

/// An isolated heap: one host engine instance and everything allocated in it.
///
/// Values never cross isolates. Handles are created through a
/// [`HandleScope`](crate::HandleScope) that borrows the isolate mutably, so
/// only one scope chain is active at a time.
pub struct Isolate {
    id: IsolateId,
    host: Box<dyn HostEngine>,
}

impl Isolate {
    /// Create an isolate over a fresh [`HeapHost`]
    pub fn new(params: CreateParams) -> Self {
        Self::with_host(Box::new(HeapHost::new(&params)))
    }

    /// Create an isolate over any host engine
    pub fn with_host(host: Box<dyn HostEngine>) -> Self {
        let id = IsolateId(NEXT_ISOLATE_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(isolate = %id, "isolate created");
        Self { id, host }
    }

    pub fn id(&self) -> IsolateId {
        self.id
    }

    /// Make this isolate the current one on this thread until the guard drops
    pub fn enter(&mut self) -> IsolateScope<'_> {
        ENTERED.with(|entered| entered.borrow_mut().push(self.id));
        IsolateScope { isolate: self }
    }

    /// The innermost entered isolate on this thread
    pub fn current_id() -> Option<IsolateId> {
        ENTERED.with(|entered| entered.borrow().last().copied())
    }

    pub fn is_current(&self) -> bool {
        Self::current_id() == Some(self.id)
    }

    /// Run a full collection. Only values rooted by a live scope survive.
    pub fn collect_garbage(&mut self) {
        self.host.collect_garbage();
    }

    pub fn heap_statistics(&self) -> HeapStatistics {
        self.host.heap_statistics()
    }

    pub(crate) fn host(&self) -> &dyn HostEngine {
        self.host.as_ref()
    }

    pub(crate) fn host_mut(&mut self) -> &mut dyn HostEngine {
        self.host.as_mut()
    }
}

impl fmt::Debug for Isolate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Isolate").field("id", &self.id).finish()
    }
}

/// Guard returned by [`Isolate::enter`]. Exits the isolate on drop.
pub struct IsolateScope<'i> {
    isolate: &'i mut Isolate,
}

impl Deref for IsolateScope<'_> {
    type Target = Isolate;

    fn deref(&self) -> &Isolate {
        self.isolate
    }
}

impl DerefMut for IsolateScope<'_> {
    fn deref_mut(&mut self) -> &mut Isolate {
        self.isolate
    }
}

impl Drop for IsolateScope<'_> {
    fn drop(&mut self) {
        let exited = ENTERED.with(|entered| entered.borrow_mut().pop());
        debug_assert_eq!(exited, Some(self.isolate.id), "isolates exited out of order");
    }
}
