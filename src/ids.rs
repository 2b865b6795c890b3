use std::collections::HashSet;

use log::debug;
use uuid::Uuid;

/// Source of fresh identifiers for anything that must mint new ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs in their 32-character hex form.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `<prefix><n>` ids, counting from 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: usize,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id-")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Hands out ids that collide neither with an existing id set nor with
/// anything handed out earlier by the same allocator.
pub struct IdAllocator<'a> {
    used: HashSet<String>,
    ids: &'a mut dyn IdGenerator,
}

impl<'a> IdAllocator<'a> {
    pub fn new(existing: &HashSet<String>, ids: &'a mut dyn IdGenerator) -> Self {
        Self {
            used: existing.clone(),
            ids,
        }
    }

    /// Keeps `wanted` when it is free, otherwise mints a fresh id.
    pub fn claim(&mut self, wanted: &str) -> String {
        if !wanted.is_empty() && self.used.insert(wanted.to_string()) {
            return wanted.to_string();
        }
        let fresh = self.fresh();
        debug!(from = wanted, to = fresh.as_str(); "remapped colliding id");
        fresh
    }

    pub fn fresh(&mut self) -> String {
        loop {
            let candidate = self.ids.next_id();
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new("n");
        assert_eq!(ids.next_id(), "n1");
        assert_eq!(ids.next_id(), "n2");
    }

    #[test]
    fn random_ids_differ() {
        let mut ids = RandomIds;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn allocator_keeps_free_ids_and_remaps_taken_ones() {
        let existing: HashSet<String> = ["a".to_string(), "n1".to_string()].into();
        let mut ids = SequentialIds::new("n");
        let mut alloc = IdAllocator::new(&existing, &mut ids);
        assert_eq!(alloc.claim("b"), "b");
        assert_eq!(alloc.claim("a"), "n2");
        assert_eq!(alloc.claim("b"), "n3");
        assert_eq!(alloc.claim(""), "n4");
    }
}
