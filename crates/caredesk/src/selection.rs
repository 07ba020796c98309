//! Shared "active patient" state.
//!
//! A [`SelectionContext`] holds the identifier of the patient every page in a
//! subtree is currently looking at. Pages establish it with
//! [`SelectionContext::provide`], which returns a [`SelectionProvider`] scope
//! guard; descendants reach it through [`SelectionContext::read`] without
//! having it passed down explicitly.
//!
//! Writes go through [`SelectionHandle::select`] (or
//! [`SelectionContext::set`]), which replaces the value and notifies every
//! subscriber before returning.
//!
//! # Example
//!
//! ```
//! use caredesk::selection::{PatientId, SelectionContext};
//!
//! # fn main() -> caredesk::Result<()> {
//! let provider = SelectionContext::provide(None);
//!
//! let sidebar = SelectionContext::read()?;
//! let header = SelectionContext::read()?;
//!
//! let _sub = header.subscribe(|id| println!("header now shows {:?}", id))?;
//! sidebar.select(Some(PatientId::from("p-42")));
//!
//! assert_eq!(header.active_patient_id(), Some(PatientId::from("p-42")));
//! drop(provider);
//! assert!(SelectionContext::read().is_err());
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use caredesk_core::logging::targets;
use caredesk_core::{ConnectionGuard, Property, Signal};

use crate::error::{FormError, Result};

/// Opaque identifier of a patient record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatientId(String);

impl PatientId {
    /// Create a patient identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatientId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PatientId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for PatientId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PatientId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

struct SelectionInner {
    active: Property<Option<PatientId>>,
    changed: Signal<Option<PatientId>>,
    /// Set once the owning provider unmounts; the state is frozen afterwards.
    torn_down: AtomicBool,
}

thread_local! {
    static PROVIDERS: RefCell<Vec<SelectionContext>> = const { RefCell::new(Vec::new()) };
}

/// The shared active-patient state.
///
/// Cloning a context yields another reference to the same state.
#[derive(Clone)]
pub struct SelectionContext {
    inner: Arc<SelectionInner>,
}

impl Default for SelectionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionContext {
    /// Create a detached context with no active patient.
    pub fn new() -> Self {
        Self::with_initial(None)
    }

    /// Create a detached context with an initial active patient.
    pub fn with_initial(initial: Option<PatientId>) -> Self {
        Self {
            inner: Arc::new(SelectionInner {
                active: Property::new(initial),
                changed: Signal::new(),
                torn_down: AtomicBool::new(false),
            }),
        }
    }

    /// Establish a new context for the current thread.
    ///
    /// The context stays reachable through [`read`](Self::read) until the
    /// returned provider is dropped. Providers nest; the innermost live one
    /// wins.
    pub fn provide(initial: Option<PatientId>) -> SelectionProvider {
        let context = Self::with_initial(initial);
        PROVIDERS.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(context.clone());
            tracing::trace!(target: targets::SELECTION, depth = stack.len(), "selection provider mounted");
        });
        SelectionProvider { context }
    }

    /// Resolve the innermost provider on the current thread.
    ///
    /// Calling this outside every provider scope is a contract violation and
    /// fails with [`FormError::NoSelectionProvider`].
    pub fn read() -> Result<SelectionHandle> {
        PROVIDERS.with(|stack| {
            stack
                .borrow()
                .last()
                .map(|context| SelectionHandle {
                    context: context.clone(),
                })
                .ok_or(FormError::NoSelectionProvider)
        })
    }

    /// Get the active patient id.
    pub fn get(&self) -> Option<PatientId> {
        self.inner.active.get()
    }

    /// Replace the active patient id and notify every subscriber.
    ///
    /// `None` clears the selection. Subscribers are notified on every call,
    /// including when the id is unchanged. Once the owning provider has been
    /// dropped the write is ignored and the value stays absent.
    pub fn set(&self, id: Option<PatientId>) {
        if self.is_torn_down() {
            tracing::warn!(
                target: targets::SELECTION,
                patient = id.as_ref().map(PatientId::as_str),
                "ignoring selection after provider unmounted"
            );
            return;
        }
        tracing::debug!(
            target: targets::SELECTION,
            patient = id.as_ref().map(PatientId::as_str),
            "active patient selected"
        );
        self.inner.active.set_silent(id.clone());
        self.inner.changed.emit(id);
    }

    /// Clear the active patient id.
    pub fn clear(&self) {
        self.set(None);
    }

    /// Subscribe to changes; dropping the returned handle unsubscribes.
    ///
    /// Fails with [`FormError::NoSelectionProvider`] once the owning
    /// provider has been dropped.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription>
    where
        F: Fn(&Option<PatientId>) + Send + Sync + 'static,
    {
        if self.is_torn_down() {
            tracing::warn!(target: targets::SELECTION, "refusing subscriber after provider unmounted");
            return Err(FormError::NoSelectionProvider);
        }
        Ok(Subscription {
            guard: self.inner.changed.connect_scoped(callback),
        })
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.changed.connection_count()
    }

    /// Whether two contexts share the same state.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether the provider owning this context has been dropped.
    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.load(Ordering::SeqCst)
    }

    fn teardown(&self) {
        self.inner.torn_down.store(true, Ordering::SeqCst);
        self.inner.changed.disconnect_all();
        self.inner.active.set_silent(None);
    }
}

impl fmt::Debug for SelectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionContext")
            .field("active_patient_id", &self.get())
            .field("subscribers", &self.subscriber_count())
            .field("torn_down", &self.is_torn_down())
            .finish()
    }
}

/// Scope guard for a mounted selection context.
///
/// Dropping the provider removes the context from the current thread,
/// detaches all subscribers and resets the active patient to absent. Handles
/// that outlive the provider keep reading `None` and can no longer write.
#[must_use = "the selection context is torn down when the provider is dropped"]
pub struct SelectionProvider {
    context: SelectionContext,
}

impl SelectionProvider {
    /// The context this provider owns.
    pub fn context(&self) -> &SelectionContext {
        &self.context
    }

    /// A consumer handle bound to this provider.
    pub fn handle(&self) -> SelectionHandle {
        SelectionHandle {
            context: self.context.clone(),
        }
    }
}

impl Drop for SelectionProvider {
    fn drop(&mut self) {
        // The stack may already be gone during thread-local destruction.
        let _ = PROVIDERS.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|c| c.ptr_eq(&self.context)) {
                stack.remove(pos);
            }
            tracing::trace!(target: targets::SELECTION, depth = stack.len(), "selection provider unmounted");
        });
        self.context.teardown();
    }
}

impl fmt::Debug for SelectionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionProvider")
            .field("context", &self.context)
            .finish()
    }
}

/// A consumer's view of the selection: the active id plus the setter.
#[derive(Clone, Debug)]
pub struct SelectionHandle {
    context: SelectionContext,
}

impl SelectionHandle {
    /// The currently active patient id.
    pub fn active_patient_id(&self) -> Option<PatientId> {
        self.context.get()
    }

    /// Replace the active patient id; `None` clears it.
    ///
    /// Ignored after the provider has been dropped.
    pub fn select(&self, id: Option<PatientId>) {
        self.context.set(id);
    }

    /// Subscribe to changes of the active patient id.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription>
    where
        F: Fn(&Option<PatientId>) + Send + Sync + 'static,
    {
        self.context.subscribe(callback)
    }

    /// The underlying shared context.
    pub fn context(&self) -> &SelectionContext {
        &self.context
    }
}

/// A live subscription to selection changes.
#[must_use = "dropping the subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    guard: ConnectionGuard<Option<PatientId>>,
}

impl Subscription {
    /// Unsubscribe explicitly.
    ///
    /// Fails if the provider already detached this subscriber.
    pub fn cancel(self) -> Result<()> {
        self.guard.disconnect()?;
        Ok(())
    }
}

static_assertions::assert_impl_all!(SelectionContext: Send, Sync);
static_assertions::assert_impl_all!(SelectionHandle: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_provider_defaults_to_absent() {
        let _provider = SelectionContext::provide(None);
        let handle = SelectionContext::read().unwrap();
        assert_eq!(handle.active_patient_id(), None);
    }

    #[test]
    fn test_provider_with_initial_value() {
        let _provider = SelectionContext::provide(Some("p-7".into()));
        let handle = SelectionContext::read().unwrap();
        assert_eq!(handle.active_patient_id(), Some(PatientId::from("p-7")));
    }

    #[test]
    fn test_read_outside_provider_fails() {
        assert!(matches!(
            SelectionContext::read(),
            Err(FormError::NoSelectionProvider)
        ));
    }

    #[test]
    fn test_value_is_shared_between_consumers() {
        let _provider = SelectionContext::provide(None);
        let first = SelectionContext::read().unwrap();
        let second = SelectionContext::read().unwrap();

        first.select(Some("p-42".into()));
        assert_eq!(second.active_patient_id().unwrap(), "p-42");
    }

    #[test]
    fn test_select_replaces_and_clears() {
        let context = SelectionContext::new();
        context.set(Some("a".into()));
        context.set(Some("b".into()));
        assert_eq!(context.get(), Some(PatientId::from("b")));
        context.clear();
        assert_eq!(context.get(), None);
    }

    #[test]
    fn test_subscribers_notified_synchronously() {
        let context = SelectionContext::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        let _sub = context
            .subscribe(move |id| seen_clone.lock().push(id.clone()))
            .unwrap();

        context.set(Some("p-1".into()));
        assert_eq!(*seen.lock(), vec![Some(PatientId::from("p-1"))]);

        context.set(None);
        assert_eq!(seen.lock().len(), 2);
        assert_eq!(seen.lock()[1], None);
    }

    #[test]
    fn test_every_select_notifies() {
        let context = SelectionContext::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let _sub = context
            .subscribe(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        context.set(Some("same".into()));
        context.set(Some("same".into()));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_subscriber_sees_new_value() {
        let context = SelectionContext::new();
        let observed = Arc::new(Mutex::new(None));

        let reader = context.clone();
        let observed_clone = observed.clone();
        let _sub = context
            .subscribe(move |_| {
                *observed_clone.lock() = reader.get();
            })
            .unwrap();

        context.set(Some("p-9".into()));
        assert_eq!(*observed.lock(), Some(PatientId::from("p-9")));
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let context = SelectionContext::new();
        let sub = context.subscribe(|_| {}).unwrap();
        assert_eq!(context.subscriber_count(), 1);
        drop(sub);
        assert_eq!(context.subscriber_count(), 0);
    }

    #[test]
    fn test_provider_teardown_resets_and_detaches() {
        let provider = SelectionContext::provide(None);
        let handle = provider.handle();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let sub = handle
            .subscribe(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        handle.select(Some("p-1".into()));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        drop(provider);

        assert_eq!(handle.active_patient_id(), None);
        assert_eq!(handle.context().subscriber_count(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(sub.cancel().is_err());
        assert!(SelectionContext::read().is_err());
    }

    #[test]
    fn test_stale_handle_cannot_revive_state() {
        let provider = SelectionContext::provide(None);
        let handle = SelectionContext::read().unwrap();
        drop(provider);
        assert!(handle.context().is_torn_down());

        handle.select(Some("ghost".into()));
        assert_eq!(handle.active_patient_id(), None);

        let notified = Arc::new(AtomicUsize::new(0));
        let notified_clone = notified.clone();
        let result = handle.subscribe(move |_| {
            notified_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert!(matches!(result, Err(FormError::NoSelectionProvider)));

        handle.select(Some("ghost2".into()));
        assert_eq!(handle.active_patient_id(), None);
        assert_eq!(handle.context().subscriber_count(), 0);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_detached_context_is_not_torn_down() {
        let context = SelectionContext::new();
        assert!(!context.is_torn_down());
        context.set(Some("p-3".into()));
        assert_eq!(context.get(), Some(PatientId::from("p-3")));
    }

    #[test]
    fn test_provider_dropped_during_thread_exit() {
        thread_local! {
            static HELD: RefCell<Option<SelectionProvider>> = const { RefCell::new(None) };
        }

        let observed = Arc::new(Mutex::new(None));
        let observed_clone = observed.clone();
        let worker = std::thread::spawn(move || {
            // Touch HELD first so its destructor runs after the provider stack's.
            HELD.with(|held| {
                let provider = SelectionContext::provide(Some("p-5".into()));
                *observed_clone.lock() = Some(provider.context().clone());
                *held.borrow_mut() = Some(provider);
            });
        });

        assert!(worker.join().is_ok());
        let context = observed.lock().take().unwrap();
        assert!(context.is_torn_down());
        assert_eq!(context.get(), None);
    }

    #[test]
    fn test_nested_providers_resolve_innermost() {
        let outer = SelectionContext::provide(Some("outer".into()));
        {
            let inner = SelectionContext::provide(Some("inner".into()));
            let handle = SelectionContext::read().unwrap();
            assert!(handle.context().ptr_eq(inner.context()));
            assert_eq!(handle.active_patient_id().unwrap(), "inner");
        }
        let handle = SelectionContext::read().unwrap();
        assert!(handle.context().ptr_eq(outer.context()));
        assert_eq!(handle.active_patient_id().unwrap(), "outer");
    }

    #[test]
    fn test_out_of_order_provider_drop() {
        let outer = SelectionContext::provide(Some("outer".into()));
        let inner = SelectionContext::provide(Some("inner".into()));
        drop(outer);
        let handle = SelectionContext::read().unwrap();
        assert!(handle.context().ptr_eq(inner.context()));
        drop(inner);
        assert!(SelectionContext::read().is_err());
    }
}
