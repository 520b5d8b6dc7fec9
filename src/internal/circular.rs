//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

// Thread-local stack of (container, key) pairs currently under construction
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<(u64, TypeKey)>> = const { RefCell::new(Vec::new()) };
}

/// Guard for managing the thread-local resolution stack.
///
/// Entering fails instead of recursing when the key is already being built
/// on this thread, which would otherwise deadlock on its single-flight cell.
pub(crate) struct StackGuard {
    entry: (u64, TypeKey),
}

impl StackGuard {
    pub(crate) fn enter(container: u64, key: TypeKey, max_depth: usize) -> DiResult<Self> {
        let entry = (container, key);
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            if let Some(start) = stack.iter().position(|e| *e == entry) {
                let mut path: Vec<&'static str> = stack[start..]
                    .iter()
                    .map(|(_, k)| k.display_name())
                    .collect();
                path.push(key.display_name());
                return Err(DiError::Circular(path));
            }

            if stack.len() >= max_depth {
                return Err(DiError::DepthExceeded(stack.len()));
            }

            stack.push(entry);
            Ok(())
        })?;

        Ok(Self { entry })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();
            debug_assert_eq!(popped, Some(self.entry));
        });
    }
}
