// Material pool: hand each new pipe a distinct visual until they run out.
//
// The pool holds the configured palette and the subset still available.
// `draw()` removes a random available material; when nothing is left it
// refills from the palette first and reports that it did, so the session can
// warn that colours are now being reused. `refill()` is also called on grid
// reset, giving a fresh round of unique materials per grid.
//
// A pool is never built from an empty palette: `MaterialPool::new()` returns
// `None` and the session runs without materials instead.

use crate::prng::PipeRng;
use crate::types::MaterialId;

/// Result of `MaterialPool::draw()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draw {
    pub material: MaterialId,
    /// The pool was exhausted and had to be refilled before this draw.
    pub refilled: bool,
}

#[derive(Clone, Debug)]
pub struct MaterialPool {
    palette: Vec<MaterialId>,
    available: Vec<MaterialId>,
}

impl MaterialPool {
    /// `None` for an empty palette.
    pub fn new(palette: Vec<MaterialId>) -> Option<Self> {
        if palette.is_empty() {
            return None;
        }
        Some(Self {
            available: palette.clone(),
            palette,
        })
    }

    pub fn palette(&self) -> &[MaterialId] {
        &self.palette
    }

    /// Materials left before the next refill.
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Make every palette entry available again.
    pub fn refill(&mut self) {
        self.available.clear();
        self.available.extend(self.palette.iter().cloned());
    }

    /// Take one material uniformly from those still available.
    pub fn draw(&mut self, rng: &mut PipeRng) -> Draw {
        let refilled = self.available.is_empty();
        if refilled {
            self.refill();
        }
        let i = rng.index(self.available.len());
        // `remove` keeps the remaining order stable, so the next draw's
        // index maps to the same material on every platform.
        let material = self.available.remove(i);
        Draw { material, refilled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(names: &[&str]) -> Vec<MaterialId> {
        names.iter().map(|n| MaterialId::new(*n)).collect()
    }

    #[test]
    fn empty_palette_has_no_pool() {
        assert!(MaterialPool::new(Vec::new()).is_none());
    }

    #[test]
    fn draws_are_unique_until_exhausted() {
        let mut pool = MaterialPool::new(palette(&["a", "b", "c"])).unwrap();
        let mut rng = PipeRng::new(4);
        let mut seen = Vec::new();
        for _ in 0..3 {
            let d = pool.draw(&mut rng);
            assert!(!d.refilled);
            assert!(!seen.contains(&d.material));
            seen.push(d.material);
        }
        assert_eq!(pool.remaining(), 0);
    }

    #[test]
    fn exhaustion_refills_once() {
        let mut pool = MaterialPool::new(palette(&["a", "b"])).unwrap();
        let mut rng = PipeRng::new(9);
        let refills: Vec<bool> = (0..5).map(|_| pool.draw(&mut rng).refilled).collect();
        assert_eq!(refills, vec![false, false, true, false, true]);
    }

    #[test]
    fn refill_restores_palette() {
        let mut pool = MaterialPool::new(palette(&["a", "b", "c"])).unwrap();
        let mut rng = PipeRng::new(1);
        pool.draw(&mut rng);
        assert_eq!(pool.remaining(), 2);
        pool.refill();
        assert_eq!(pool.remaining(), 3);
        assert_eq!(pool.palette().len(), 3);
    }

    #[test]
    fn single_material_is_reused() {
        let mut pool = MaterialPool::new(palette(&["only"])).unwrap();
        let mut rng = PipeRng::new(0);
        let first = pool.draw(&mut rng);
        let second = pool.draw(&mut rng);
        assert_eq!(first.material, second.material);
        assert!(!first.refilled);
        assert!(second.refilled);
    }
}
