/// Explicit bookkeeping context for scenes, cameras and renderers
///
/// Objects that need an identity receive a `&mut Registry` at construction
/// instead of reaching for process-wide state.
use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Random (version 4) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uuid([u8; 16]);

impl Uuid {
    fn random<R: Rng>(rng: &mut R) -> Self {
        let mut bytes: [u8; 16] = rng.gen();
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Uuid(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// What a registered id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Scene,
    Camera,
    Renderer,
}

pub struct Registry {
    entries: HashMap<Uuid, ObjectKind>,
    rng: StdRng,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// A registry whose ids are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            entries: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn register(&mut self, kind: ObjectKind) -> Uuid {
        let mut id = Uuid::random(&mut self.rng);
        while self.entries.contains_key(&id) {
            id = Uuid::random(&mut self.rng);
        }
        self.entries.insert(id, kind);
        debug!(%id, ?kind, "registered");
        id
    }

    pub fn unregister(&mut self, id: &Uuid) -> Option<ObjectKind> {
        self.entries.remove(id)
    }

    pub fn kind(&self, id: &Uuid) -> Option<ObjectKind> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.entries.contains_key(id)
    }

    /// All ids registered as `kind`, in no particular order.
    pub fn ids_of(&self, kind: ObjectKind) -> impl Iterator<Item = Uuid> + '_ {
        self.entries
            .iter()
            .filter(move |(_, k)| **k == kind)
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_format() {
        let mut registry = Registry::with_seed(7);
        let id = registry.register(ObjectKind::Scene).to_string();
        assert_eq!(id.len(), 36);
        let groups: Vec<&str> = id.split('-').collect();
        assert_eq!(
            groups.iter().map(|g| g.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(groups[2].starts_with('4'));
        assert!(matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::with_seed(1);
        let scene = registry.register(ObjectKind::Scene);
        let camera = registry.register(ObjectKind::Camera);
        let renderer = registry.register(ObjectKind::Renderer);

        assert_ne!(scene, camera);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.kind(&camera), Some(ObjectKind::Camera));
        assert_eq!(
            registry.ids_of(ObjectKind::Renderer).collect::<Vec<_>>(),
            vec![renderer]
        );

        assert_eq!(registry.unregister(&scene), Some(ObjectKind::Scene));
        assert!(!registry.contains(&scene));
        assert_eq!(registry.kind(&scene), None);
    }

    #[test]
    fn test_seeded_ids_are_reproducible() {
        let a = Registry::with_seed(42).register(ObjectKind::Camera);
        let b = Registry::with_seed(42).register(ObjectKind::Camera);
        assert_eq!(a, b);
        assert_eq!(a.as_bytes()[6] >> 4, 4);
    }
}
