// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, error};

// Tile counts indexed by tile. Index 0 is the empty square and stays zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rack {
    tally: Box<[u8]>,
    len: u8,
}

impl Rack {
    pub fn new(alphabet: &alphabet::Alphabet) -> Self {
        Self {
            tally: vec![0u8; alphabet.len() as usize].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn from_tiles(alphabet: &alphabet::Alphabet, tiles: &[u8]) -> Self {
        let mut rack = Self::new(alphabet);
        rack.add(tiles);
        rack
    }

    pub fn from_text(
        alphabet: &alphabet::Alphabet,
        reader: &alphabet::AlphabetReader,
        s: &str,
    ) -> error::Returns<Self> {
        let tiles = reader.read_word(s)?;
        if tiles.iter().any(|&tile| tile >= alphabet.len()) {
            return_error!(format!("invalid rack {s:?}"));
        }
        Ok(Self::from_tiles(alphabet, &tiles))
    }

    #[inline(always)]
    pub fn tally(&self) -> &[u8] {
        &self.tally
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // the rack size limit is the caller's business.
    pub fn add(&mut self, tiles: &[u8]) {
        for &tile in tiles {
            self.tally[tile as usize] += 1;
        }
        self.len += tiles.len() as u8;
    }

    // all or nothing: on error the rack is unchanged.
    pub fn remove(&mut self, tiles: &[u8]) -> error::Returns<()> {
        for &tile in tiles {
            let wanted = tiles.iter().filter(|&&t| t == tile).count();
            if tile as usize >= self.tally.len() || (self.tally[tile as usize] as usize) < wanted {
                return_error!(format!("rack does not have {wanted} of tile {tile}"));
            }
        }
        for &tile in tiles {
            self.tally[tile as usize] -= 1;
        }
        self.len -= tiles.len() as u8;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.tally.iter_mut().for_each(|m| *m = 0);
        self.len = 0;
    }

    // sorted by tile.
    pub fn tiles(&self) -> Vec<u8> {
        self.tally
            .iter()
            .enumerate()
            .flat_map(|(tile, &count)| std::iter::repeat_n(tile as u8, count as usize))
            .collect()
    }

    // face value of the unplayed tiles.
    pub fn score(&self, alphabet: &alphabet::Alphabet) -> i16 {
        self.tally
            .iter()
            .enumerate()
            .map(|(tile, &count)| alphabet.score(tile as u8) as i16 * count as i16)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_fails_without_enough_tiles() {
        let alphabet = alphabet::make_english_alphabet();
        let reader = alphabet::AlphabetReader::new(&alphabet);
        let mut rack = Rack::from_text(&alphabet, &reader, "CATS").unwrap();
        let before = rack.clone();
        let two_a = reader.read_word("AA").unwrap();
        assert!(rack.remove(&two_a).is_err());
        assert_eq!(rack, before);
        rack.remove(&reader.read_word("TA").unwrap()).unwrap();
        assert_eq!(rack.len(), 2);
        assert_eq!(alphabet.fmt_rack(&rack.tiles()), "CS");
    }

    #[test]
    fn test_score_and_add() {
        let alphabet = alphabet::make_english_alphabet();
        let reader = alphabet::AlphabetReader::new(&alphabet);
        let mut rack = Rack::from_text(&alphabet, &reader, "QI").unwrap();
        assert_eq!(rack.score(&alphabet), 11);
        rack.add(&reader.read_word("Z").unwrap());
        assert_eq!(rack.len(), 3);
        assert_eq!(rack.score(&alphabet), 21);
        rack.clear();
        assert!(rack.is_empty());
        assert_eq!(rack.score(&alphabet), 0);
    }
}
