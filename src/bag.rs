// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, rack};
use rand::prelude::*;

// Undrawn tiles. Drawing takes from the end, so shuffle before the first draw.
#[derive(Clone, Debug)]
pub struct Bag(pub Vec<u8>);

impl Bag {
    pub fn new(alphabet: &alphabet::Alphabet) -> Bag {
        let mut bag = Vec::with_capacity(alphabet.num_tiles() as usize);
        for tile in 1..alphabet.len() {
            for _ in 0..alphabet.freq(tile) {
                bag.push(tile);
            }
        }
        Bag(bag)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.0.shuffle(rng);
    }

    // draws fewer when the bag runs out. returns the number drawn.
    pub fn replenish(&mut self, rack: &mut rack::Rack, rack_size: usize) -> usize {
        let num_drawn = rack_size.saturating_sub(rack.len()).min(self.0.len());
        let drawn = self.0.split_off(self.0.len() - num_drawn);
        rack.add(&drawn);
        num_drawn
    }

    // put back the tiles in random order. keep the rest of the bag in the same order.
    pub fn put_back<R: Rng + ?Sized>(&mut self, rng: &mut R, tiles: &[u8]) {
        let mut num_new_tiles = tiles.len();
        match num_new_tiles {
            0 => {
                return;
            }
            1 => {
                self.0.insert(rng.random_range(0..=self.0.len()), tiles[0]);
                return;
            }
            _ => {}
        }
        let mut num_old_tiles = self.0.len();
        let new_len = num_new_tiles + num_old_tiles;
        self.0.reserve(num_new_tiles + new_len); // cap = old+(new+old)+new
        self.0.resize(new_len + num_old_tiles, 0); // [old,0,0]
        let mut p_old_tiles = new_len; // after old+new
        self.0.copy_within(0..num_old_tiles, p_old_tiles); // [old,0,old]
        let mut p_new_tiles = self.0.len(); // after old+new+old
        self.0.extend_from_slice(tiles); // [old,0,old,new]
        self.0[p_new_tiles..].shuffle(rng);
        for wp in 0..new_len {
            if if num_new_tiles == 0 {
                true
            } else if num_old_tiles == 0 {
                false
            } else {
                rng.random_range(0..num_old_tiles + num_new_tiles) < num_old_tiles
            } {
                self.0[wp] = self.0[p_old_tiles];
                p_old_tiles += 1;
                num_old_tiles -= 1;
            } else {
                self.0[wp] = self.0[p_new_tiles];
                p_new_tiles += 1;
                num_new_tiles -= 1;
            }
        }
        self.0.truncate(new_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(v: &[u8]) -> Vec<u8> {
        let mut v = v.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_replenish_draws_fewer_when_short() {
        let alphabet = alphabet::make_english_alphabet();
        let mut bag = Bag(vec![1, 2, 3]);
        let mut rack = rack::Rack::from_tiles(&alphabet, &[5, 5]);
        assert_eq!(bag.replenish(&mut rack, 7), 3);
        assert!(bag.is_empty());
        assert_eq!(rack.len(), 5);
        assert_eq!(bag.replenish(&mut rack, 7), 0);
    }

    #[test]
    fn test_put_back_keeps_multiset() {
        let alphabet = alphabet::make_polish_alphabet();
        let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(7);
        let mut bag = Bag::new(&alphabet);
        assert_eq!(bag.len(), 98);
        let expected = sorted(&bag.0);
        bag.shuffle(&mut rng);
        let mut rack = rack::Rack::new(&alphabet);
        bag.replenish(&mut rack, 7);
        assert_eq!(bag.len(), 91);
        let tiles = rack.tiles();
        rack.remove(&tiles).unwrap();
        bag.put_back(&mut rng, &tiles);
        assert_eq!(sorted(&bag.0), expected);
        bag.put_back(&mut rng, &[]);
        bag.put_back(&mut rng, &[4]);
        assert_eq!(bag.len(), 99);
    }

    #[test]
    fn test_same_seed_same_bag() {
        let alphabet = alphabet::make_polish_alphabet();
        let mut a = Bag::new(&alphabet);
        let mut b = Bag::new(&alphabet);
        a.shuffle(&mut rand_chacha::ChaCha20Rng::seed_from_u64(42));
        b.shuffle(&mut rand_chacha::ChaCha20Rng::seed_from_u64(42));
        assert_eq!(a.0, b.0);
    }
}
