use std::any::Any;
use std::fmt;

/// Explicitly supplied call arguments, addressed by parameter position.
///
/// A supplied value always wins over an injected one. For contract
/// parameters ([`Dep<T>`](crate::Dep), [`Inject<T>`](crate::Inject)) supply
/// an `Arc<T>`; for [`Arg<T>`](crate::Arg) supply the `T` itself.
///
/// ```rust
/// use depinj::Arguments;
///
/// let args = Arguments::new().with(0, 42u32).with(2, "name".to_string());
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Default)]
pub struct Arguments {
    values: Vec<Option<Box<dyn Any + Send>>>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies `value` for the parameter at `index`, builder style.
    pub fn with<V: Any + Send>(mut self, index: usize, value: V) -> Self {
        self.set(index, value);
        self
    }

    /// Supplies `value` for the parameter at `index`, replacing any earlier value.
    pub fn set<V: Any + Send>(&mut self, index: usize, value: V) {
        if self.values.len() <= index {
            self.values.resize_with(index + 1, || None);
        }
        self.values[index] = Some(Box::new(value));
    }

    pub(crate) fn take(&mut self, index: usize) -> Option<Box<dyn Any + Send>> {
        self.values.get_mut(index).and_then(Option::take)
    }

    /// Number of supplied values.
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let supplied: Vec<usize> = self
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|_| i))
            .collect();
        f.debug_struct("Arguments").field("supplied", &supplied).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_positions() {
        let mut args = Arguments::new().with(3, 1u8);
        assert_eq!(args.len(), 1);
        assert!(args.take(0).is_none());
        assert!(args.take(7).is_none());

        let value = args.take(3).unwrap();
        assert_eq!(*value.downcast::<u8>().unwrap(), 1);
        assert!(args.take(3).is_none());
        assert!(args.is_empty());
    }

    #[test]
    fn later_value_replaces_earlier() {
        let mut args = Arguments::new().with(0, 1u8);
        args.set(0, 2u8);
        assert_eq!(args.len(), 1);
        assert_eq!(*args.take(0).unwrap().downcast::<u8>().unwrap(), 2);
    }
}
