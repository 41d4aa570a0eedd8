use image::Rgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of class colors; matches the COCO label set.
pub const PALETTE_SIZE: usize = 80;

/// Seed used when the configuration does not pick one.
pub const DEFAULT_PALETTE_SEED: u64 = 0x5eed_c0c0;

/// Per-class box colors, generated once per session.
///
/// Colors come from a seeded generator, so the same seed yields the same table
/// on every run. Class ids past the table wrap around.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
}

impl Palette {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let colors = (0..PALETTE_SIZE)
            .map(|_| Rgb([rng.gen_range(0..255), rng.gen_range(0..255), rng.gen_range(0..255)]))
            .collect();
        Self { colors }
    }

    pub fn color(&self, class_id: u32) -> Rgb<u8> {
        self.colors[class_id as usize % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_colors() {
        let a = Palette::new(42);
        let b = Palette::new(42);
        for class_id in 0..PALETTE_SIZE as u32 {
            assert_eq!(a.color(class_id), b.color(class_id));
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = Palette::new(1);
        let b = Palette::new(2);
        let differs = (0..PALETTE_SIZE as u32).any(|id| a.color(id) != b.color(id));
        assert!(differs);
    }

    #[test]
    fn ids_wrap_around() {
        let palette = Palette::default();
        assert_eq!(palette.len(), PALETTE_SIZE);
        assert_eq!(palette.color(3), palette.color(3 + PALETTE_SIZE as u32));
    }
}
