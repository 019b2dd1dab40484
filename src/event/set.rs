use crate::event::{EventCode, EventKind};

use std::fmt::{self, Display, Formatter};

/// The set of codes a single wait races against.
///
/// Kept sorted and deduplicated so registering the same code twice for one
/// waiter is impossible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventSet {
    codes: Vec<EventCode>,
}

impl EventSet {
    /// Creates an empty set.
    ///
    /// An empty set is only useful as a starting point: waiting on it
    /// panics.
    pub fn new() -> Self {
        Self { codes: Vec::new() }
    }

    /// Adds the code of kind `K`.
    ///
    /// # Example
    /// ```
    /// use cohost::basic::{KeySignal, Tick};
    /// use cohost::{EventKind, EventSet};
    ///
    /// let set = EventSet::new().with(KeySignal).with(Tick);
    /// assert!(set.contains(KeySignal::CODE));
    /// ```
    pub fn with<K: EventKind>(self, _kind: K) -> Self {
        self.with_code(K::CODE)
    }

    pub fn with_code(mut self, code: EventCode) -> Self {
        self.insert(code);
        self
    }

    /// Inserts `code`, keeping the set sorted.
    ///
    /// # Returns
    /// `true` if the code was not already present
    pub fn insert(&mut self, code: EventCode) -> bool {
        match self.codes.binary_search(&code) {
            Ok(_) => false,
            Err(at) => {
                self.codes.insert(at, code);
                true
            }
        }
    }

    pub fn contains(&self, code: EventCode) -> bool {
        self.codes.binary_search(&code).is_ok()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EventCode> + '_ {
        self.codes.iter().copied()
    }
}

impl FromIterator<EventCode> for EventSet {
    fn from_iter<I: IntoIterator<Item = EventCode>>(iter: I) -> Self {
        let mut codes: Vec<EventCode> = iter.into_iter().collect();
        codes.sort_unstable();
        codes.dedup();

        Self { codes }
    }
}

impl<const N: usize> From<[EventCode; N]> for EventSet {
    fn from(codes: [EventCode; N]) -> Self {
        codes.into_iter().collect()
    }
}

impl From<&[EventCode]> for EventSet {
    fn from(codes: &[EventCode]) -> Self {
        codes.iter().copied().collect()
    }
}

impl From<EventCode> for EventSet {
    fn from(code: EventCode) -> Self {
        Self { codes: vec![code] }
    }
}

impl Display for EventSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, code) in self.codes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{code}")?;
        }
        f.write_str("}")
    }
}

/// Builds an [`EventSet`] from kind names.
///
/// ```
/// use cohost::basic::{KeyChange, Tick};
/// use cohost::{EventKind, events};
///
/// let set = events![KeyChange, Tick];
/// assert!(set.contains(Tick::CODE));
/// assert_eq!(set.len(), 2);
/// ```
#[macro_export]
macro_rules! events {
    ($($kind:ty),* $(,)?) => {
        <$crate::EventSet as ::core::iter::FromIterator<$crate::EventCode>>::from_iter([
            $(<$kind as $crate::EventKind>::CODE),*
        ])
    };
}
