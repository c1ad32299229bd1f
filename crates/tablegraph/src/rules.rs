//! Keyed rule tables shared by interceptors and permissions.
//!
//! A lookup walks an ordered list of candidate keys. The first key that has
//! an entry decides the outcome, even when that entry only passes.

/// What a rule table holds under one key.
#[derive(Debug, Clone)]
pub enum Slot<T> {
    /// Always refuse: suppress the object, or deny the call.
    Deny,

    /// Stop the search without applying anything.
    Pass,

    /// Apply the attached transform or permission check.
    Apply(T),
}

/// The outcome of a rule lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    /// No candidate key matched, or the matching slot passes.
    Absent,

    /// The matching slot denies.
    Deny,

    Value(T),
}

impl<T> Lookup<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Lookup::Deny)
    }
}

/// An ordered table of slots keyed by name.
#[derive(Debug, Clone)]
pub struct Rules<T> {
    entries: Vec<(String, Slot<T>)>,
}

impl<T> Rules<T> {
    pub fn new() -> Rules<T> {
        Rules { entries: vec![] }
    }

    /// Sets the slot for `key`, replacing any previous one.
    pub fn slot(mut self, key: impl Into<String>, slot: Slot<T>) -> Self {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = slot,
            None => self.entries.push((key, slot)),
        }
        self
    }

    pub fn deny(self, key: impl Into<String>) -> Self {
        self.slot(key, Slot::Deny)
    }

    pub fn pass(self, key: impl Into<String>) -> Self {
        self.slot(key, Slot::Pass)
    }

    pub fn apply(self, key: impl Into<String>, value: T) -> Self {
        self.slot(key, Slot::Apply(value))
    }

    pub fn get(&self, key: &str) -> Option<&Slot<T>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, slot)| slot)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves `keys` in order. At most one slot is consulted.
    pub fn lookup(&self, keys: &[&str]) -> Lookup<&T> {
        keys.iter()
            .find_map(|key| self.get(key))
            .map(Lookup::from)
            .unwrap_or(Lookup::Absent)
    }
}

impl<T> Default for Rules<T> {
    fn default() -> Self {
        Rules::new()
    }
}

impl<'a, T> From<&'a Slot<T>> for Lookup<&'a T> {
    fn from(slot: &'a Slot<T>) -> Self {
        match slot {
            Slot::Deny => Lookup::Deny,
            Slot::Pass => Lookup::Absent,
            Slot::Apply(value) => Lookup::Value(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_present_key_wins() {
        let rules = Rules::new().apply("default", 1).apply("user", 2);

        assert_eq!(rules.lookup(&["user", "default"]), Lookup::Value(&2));
        assert_eq!(rules.lookup(&["post", "default"]), Lookup::Value(&1));
        assert_eq!(rules.lookup(&["post"]), Lookup::Absent);
    }

    #[test]
    fn pass_stops_the_search() {
        let rules: Rules<()> = Rules::new().deny("default").pass("user");

        assert!(rules.lookup(&["user", "default"]).is_absent());
        assert!(rules.lookup(&["post", "default"]).is_deny());
    }

    #[test]
    fn later_slot_replaces_earlier() {
        let rules = Rules::new().deny("user").apply("user", 3);
        assert_eq!(rules.lookup(&["user"]), Lookup::Value(&3));
    }
}
