//! Execution-context-local active scope storage.
//!
//! Each thread keeps, per container, a stack of opened scopes. The top of the
//! stack is the active scope for that thread; nothing here is shared between
//! threads.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::container::ScopeCache;
use crate::error::{DiError, DiResult};
use crate::options::NestedScopes;

thread_local! {
    static ACTIVE_SCOPES: RefCell<HashMap<u64, Vec<Arc<ScopeCache>>>> = RefCell::new(HashMap::new());
}

/// Makes `scope` the active scope of `container` for the calling thread.
pub(crate) fn open(container: u64, scope: Arc<ScopeCache>, policy: NestedScopes) -> DiResult<()> {
    ACTIVE_SCOPES.with(|scopes| {
        let mut scopes = scopes.borrow_mut();
        let stack = scopes.entry(container).or_default();
        if policy == NestedScopes::Reject && !stack.is_empty() {
            return Err(DiError::ScopeAlreadyActive);
        }
        stack.push(scope);
        Ok(())
    })
}

/// Active scope of `container` for the calling thread.
pub(crate) fn current(container: u64) -> Option<Arc<ScopeCache>> {
    ACTIVE_SCOPES.with(|scopes| {
        scopes
            .borrow()
            .get(&container)
            .and_then(|stack| stack.last().cloned())
    })
}

/// Removes the scope with id `scope` wherever it sits in the stack.
///
/// Returns `false` if it was already closed.
///
/// Guards dropped during thread teardown find the store gone and report `false`.
pub(crate) fn close(container: u64, scope: u64) -> bool {
    ACTIVE_SCOPES
        .try_with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            let Some(stack) = scopes.get_mut(&container) else {
                return false;
            };
            let removed = match stack.iter().rposition(|s| s.id() == scope) {
                Some(pos) => {
                    stack.remove(pos);
                    true
                }
                None => false,
            };
            if stack.is_empty() {
                scopes.remove(&container);
            }
            removed
        })
        .unwrap_or(false)
}

/// Pops the active scope of `container`. The caller closes the returned cache.
pub(crate) fn close_current(container: u64) -> Option<Arc<ScopeCache>> {
    ACTIVE_SCOPES.with(|scopes| {
        let mut scopes = scopes.borrow_mut();
        let stack = scopes.get_mut(&container)?;
        let closed = stack.pop();
        if stack.is_empty() {
            scopes.remove(&container);
        }
        closed
    })
}
