use rand::Rng;

/**
 * Accumulates weighted entries, then selects among them with probability
 * proportional to weight. Entries with non-positive weight can never be
 * selected and are not stored.
 */
#[derive(Clone, Debug)]
pub struct RandomPicker<T> {
    entries: Vec<(f32, T)>,
    total_weight: f32,
}

impl<T> RandomPicker<T> {

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            total_weight: 0.0,
        }
    }

    pub fn add(&mut self, weight: f32, value: T) {
        if weight <= 0.0 {
            return;
        }
        self.total_weight += weight;
        self.entries.push((weight, value));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Borrows a random entry, weighted.
    pub fn pick(&self, rng: &mut impl Rng) -> Option<&T> {
        let index = self.pick_index(rng)?;
        Some(&self.entries[index].1)
    }

    /// Removes and returns a random entry, weighted.
    pub fn take(&mut self, rng: &mut impl Rng) -> Option<T> {
        let index = self.pick_index(rng)?;
        let (_, value) = self.entries.swap_remove(index);
        // Recomputed rather than decremented to keep the sum exact.
        self.total_weight = self.entries.iter().map(|(weight, _)| weight).sum();
        Some(value)
    }

    fn pick_index(&self, rng: &mut impl Rng) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let threshold = rng.gen_range(0.0..self.total_weight);
        let mut partial_sum = 0.0;
        for (index, (weight, _)) in self.entries.iter().enumerate() {
            partial_sum += weight;
            if partial_sum > threshold {
                return Some(index);
            }
        }
        // Accumulated rounding can leave the threshold past every partial sum.
        Some(self.entries.len() - 1)
    }
}

impl<T> Default for RandomPicker<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use super::*;

    #[test]
    fn test_empty() {
        let picker: RandomPicker<u32> = RandomPicker::new();
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(picker.is_empty());
        assert_eq!(None, picker.pick(&mut rng));
    }

    #[test]
    fn test_non_positive_weights_never_picked() {
        let mut picker = RandomPicker::new();
        picker.add(0.0, "never");
        picker.add(-1.0, "never");
        picker.add(1.0, "always");
        assert_eq!(1, picker.len());

        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(Some(&"always"), picker.pick(&mut rng));
        }
    }

    #[test]
    fn test_deterministic_under_seed() {
        let mut picker = RandomPicker::new();
        picker.add(1.0, 'a');
        picker.add(2.0, 'b');
        picker.add(4.0, 'c');

        let mut first_rng = SmallRng::seed_from_u64(7);
        let mut second_rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let expected = picker.pick(&mut first_rng).copied();
            let actual = picker.pick(&mut second_rng).copied();
            assert_eq!(expected, actual);
        }
    }

    #[test]
    fn test_heavier_weight_picked_more() {
        let mut picker = RandomPicker::new();
        picker.add(1.0, "light");
        picker.add(4.0, "heavy");

        let mut rng = SmallRng::seed_from_u64(42);
        let mut heavy_count = 0;
        for _ in 0..1000 {
            if picker.pick(&mut rng) == Some(&"heavy") {
                heavy_count += 1;
            }
        }
        assert!(heavy_count > 500);
    }

    #[test]
    fn test_take_drains() {
        let mut picker = RandomPicker::new();
        picker.add(1.0, 1);
        picker.add(1.0, 2);
        picker.add(1.0, 3);

        let mut rng = SmallRng::seed_from_u64(3);
        let mut taken = Vec::new();
        while let Some(value) = picker.take(&mut rng) {
            taken.push(value);
        }
        taken.sort();
        assert_eq!(vec![1, 2, 3], taken);
        assert!(picker.is_empty());
    }
}
