//! Id generation for new sections and curve points.

use uuid::Uuid;

/// Source of fresh entity ids.
///
/// Edits take the generator as a parameter so tests can use a deterministic
/// sequence instead of random ids.
pub trait IdGenerator {
    /// Produce a new id starting with `prefix` (for example `"pt"`).
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Random ids of the form `pt-1a2b3c4d`, taken from a v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format!("{}-{}", prefix, &uuid[..8])
    }
}

/// Deterministic ids `pt-000001`, `pt-000002`, ...
///
/// Numbers are zero-padded so lexicographic order matches creation order,
/// which is the tie-break used when points collide in time.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after `start`.
    pub fn starting_at(start: u64) -> Self {
        Self { counter: start }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{}-{:06}", prefix, self.counter)
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self, prefix: &str) -> String {
        (**self).next_id(prefix)
    }
}

/// Ask `ids` for new ids until one is not rejected by `taken`.
pub(crate) fn fresh_id(
    ids: &mut impl IdGenerator,
    prefix: &str,
    taken: impl Fn(&str) -> bool,
) -> String {
    loop {
        let id = ids.next_id(prefix);
        if !taken(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id("pt"), "pt-000001");
        assert_eq!(ids.next_id("sec"), "sec-000002");

        let mut ids = SequentialIds::starting_at(41);
        assert_eq!(ids.next_id("pt"), "pt-000042");
    }

    #[test]
    fn test_sequential_ids_sort_in_creation_order() {
        let mut ids = SequentialIds::starting_at(8);
        let ninth = ids.next_id("pt");
        let tenth = ids.next_id("pt");
        assert!(ninth < tenth);
    }

    #[test]
    fn test_random_ids_shape() {
        let mut ids = RandomIds;
        let id = ids.next_id("pt");
        assert!(id.starts_with("pt-"));
        assert_eq!(id.len(), "pt-".len() + 8);
        assert_ne!(id, ids.next_id("pt"));
    }

    #[test]
    fn test_fresh_id_skips_taken() {
        let mut ids = SequentialIds::new();
        let taken = ["pt-000001", "pt-000002"];
        let id = fresh_id(&mut ids, "pt", |candidate| taken.contains(&candidate));
        assert_eq!(id, "pt-000003");
    }
}
