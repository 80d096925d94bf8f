use fnv::FnvHashMap;

/// Append-only mapping between external entity ids (`u64`) and dense
/// positions (`0..len`). Positions are assigned in first-appearance
/// order, so the mapping is deterministic for a fixed input order.
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    id_to_pos: FnvHashMap<u64, usize>,
    ids: Vec<u64>,
}

impl EntityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of `id`, interning it at the end if unseen.
    pub fn intern(&mut self, id: u64) -> usize {
        if let Some(&pos) = self.id_to_pos.get(&id) {
            return pos;
        }
        let pos = self.ids.len();
        self.id_to_pos.insert(id, pos);
        self.ids.push(id);
        pos
    }

    /// Position of `id` if it was interned before.
    pub fn position(&self, id: u64) -> Option<usize> {
        self.id_to_pos.get(&id).copied()
    }

    /// External id at dense position `pos`.
    pub fn id_at(&self, pos: usize) -> Option<u64> {
        self.ids.get(pos).copied()
    }

    /// All ids in position order.
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
