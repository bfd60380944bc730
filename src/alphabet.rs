// Copyright (C) 2020-2024 Andy Kurnia.

use super::error;

// highest score a csv letter may have; any move score then fits in i16.
pub const MAX_LETTER_SCORE: i8 = 20;

// tile 0 is the empty square; letters are numbered from 1 in alphabet order.
pub struct Tile {
    label: Box<str>,
    lower_label: Box<str>,
    freq: u8,
    score: i8,
}

impl Tile {
    #[inline(always)]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline(always)]
    pub fn lower_label(&self) -> &str {
        &self.lower_label
    }

    #[inline(always)]
    pub fn freq(&self) -> u8 {
        self.freq
    }

    #[inline(always)]
    pub fn score(&self) -> i8 {
        self.score
    }
}

pub struct Alphabet {
    tiles: Box<[Tile]>,
}

impl Alphabet {
    // (label, lower_label, freq, score) for each letter, in machine order.
    pub fn new(letters: &[(&str, &str, u8, i8)]) -> Self {
        let mut tiles = Vec::with_capacity(letters.len() + 1);
        tiles.push(Tile {
            label: "-".into(),
            lower_label: "-".into(),
            freq: 0,
            score: 0,
        });
        for &(label, lower_label, freq, score) in letters {
            tiles.push(Tile {
                label: label.into(),
                lower_label: lower_label.into(),
                freq,
                score,
            });
        }
        Self {
            tiles: tiles.into_boxed_slice(),
        }
    }

    // columns: label, lower_label, freq, score. no header.
    // scores are limited to 0..=MAX_LETTER_SCORE so that move scores fit in i16.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> error::Returns<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut letters = Vec::<(String, String, u8, i8)>::new();
        for result in csv_reader.records() {
            let record = result?;
            if record.len() != 4 {
                return_error!(format!("expected 4 columns, got {:?}", record));
            }
            if record[0].is_empty() || &record[0] == "-" {
                return_error!(format!("invalid label in {:?}", record));
            }
            let score = record[3].parse::<i8>()?;
            if !(0..=MAX_LETTER_SCORE).contains(&score) {
                return_error!(format!(
                    "score must be 0 to {MAX_LETTER_SCORE}, got {:?}",
                    record
                ));
            }
            letters.push((
                record[0].to_string(),
                record[1].to_string(),
                record[2].parse()?,
                score,
            ));
        }
        if letters.is_empty() || letters.len() > 63 {
            return_error!(format!("cannot have {} letters", letters.len()));
        }
        Ok(Self::new(
            &letters
                .iter()
                .map(|(label, lower_label, freq, score)| {
                    (label.as_str(), lower_label.as_str(), *freq, *score)
                })
                .collect::<Vec<_>>(),
        ))
    }

    // includes the empty square.
    #[inline(always)]
    pub fn len(&self) -> u8 {
        self.tiles.len() as u8
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.tiles.len() <= 1
    }

    #[inline(always)]
    pub fn get(&self, idx: u8) -> &Tile {
        &self.tiles[idx as usize]
    }

    #[inline(always)]
    pub fn of(&self, idx: u8) -> Option<&str> {
        if idx == 0 || idx >= self.len() {
            None
        } else {
            Some(&self.get(idx).label)
        }
    }

    #[inline(always)]
    pub fn score(&self, idx: u8) -> i8 {
        self.get(idx).score
    }

    #[inline(always)]
    pub fn freq(&self, idx: u8) -> u8 {
        self.get(idx).freq
    }

    pub fn num_tiles(&self) -> u16 {
        self.tiles.iter().map(|tile| tile.freq as u16).sum()
    }

    pub fn fmt_rack(&self, rack: &[u8]) -> String {
        let mut s = String::new();
        for &tile in rack {
            s.push_str(self.of(tile).unwrap_or("?"));
        }
        s
    }
}

// Longest label wins, so multi-character labels may coexist with their prefixes.
pub struct AlphabetReader {
    supported: Box<[(Box<[u8]>, u8)]>,
}

impl AlphabetReader {
    pub fn new(alphabet: &Alphabet) -> Self {
        let mut supported = Vec::<(Box<[u8]>, u8)>::new();
        for idx in 1..alphabet.len() {
            let tile = alphabet.get(idx);
            supported.push((tile.label.as_bytes().into(), idx));
            if tile.lower_label != tile.label && !tile.lower_label.is_empty() {
                supported.push((tile.lower_label.as_bytes().into(), idx));
            }
        }
        supported.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self {
            supported: supported.into_boxed_slice(),
        }
    }

    // returns (tile, next index)
    #[inline(always)]
    pub fn next_tile(&self, sb: &[u8], ix: usize) -> Option<(u8, usize)> {
        let rest = &sb[ix..];
        self.supported
            .iter()
            .find(|(label, _)| rest.starts_with(label))
            .map(|(label, tile)| (*tile, ix + label.len()))
    }

    pub fn set_word(&self, s: &str, v: &mut Vec<u8>) -> error::Returns<()> {
        v.clear();
        let sb = s.as_bytes();
        let mut ix = 0;
        while ix < sb.len() {
            match self.next_tile(sb, ix) {
                Some((tile, end_ix)) => {
                    v.push(tile);
                    ix = end_ix;
                }
                None => {
                    return_error!(format!("invalid tile after {:?} in {:?}", v, s));
                }
            }
        }
        Ok(())
    }

    pub fn read_word(&self, s: &str) -> error::Returns<Box<[u8]>> {
        let mut v = Vec::new();
        self.set_word(s, &mut v)?;
        Ok(v.into_boxed_slice())
    }
}

pub fn make_polish_alphabet() -> Alphabet {
    Alphabet::new(&[
        ("A", "a", 9, 1),
        ("Ą", "ą", 1, 5),
        ("B", "b", 2, 3),
        ("C", "c", 3, 2),
        ("Ć", "ć", 1, 6),
        ("D", "d", 3, 2),
        ("E", "e", 7, 1),
        ("Ę", "ę", 1, 5),
        ("F", "f", 1, 5),
        ("G", "g", 2, 3),
        ("H", "h", 2, 3),
        ("I", "i", 8, 1),
        ("J", "j", 2, 3),
        ("K", "k", 3, 2),
        ("L", "l", 3, 2),
        ("Ł", "ł", 2, 3),
        ("M", "m", 3, 2),
        ("N", "n", 5, 1),
        ("Ń", "ń", 1, 7),
        ("O", "o", 6, 1),
        ("Ó", "ó", 1, 5),
        ("P", "p", 3, 2),
        ("R", "r", 4, 1),
        ("S", "s", 4, 1),
        ("Ś", "ś", 1, 5),
        ("T", "t", 3, 2),
        ("U", "u", 2, 3),
        ("W", "w", 4, 1),
        ("Y", "y", 4, 2),
        ("Z", "z", 5, 1),
        ("Ź", "ź", 1, 9),
        ("Ż", "ż", 1, 5),
    ])
}

pub fn make_english_alphabet() -> Alphabet {
    Alphabet::new(&[
        ("A", "a", 9, 1),
        ("B", "b", 2, 3),
        ("C", "c", 2, 3),
        ("D", "d", 4, 2),
        ("E", "e", 12, 1),
        ("F", "f", 2, 4),
        ("G", "g", 3, 2),
        ("H", "h", 2, 4),
        ("I", "i", 9, 1),
        ("J", "j", 1, 8),
        ("K", "k", 1, 5),
        ("L", "l", 4, 1),
        ("M", "m", 2, 3),
        ("N", "n", 6, 1),
        ("O", "o", 8, 1),
        ("P", "p", 2, 3),
        ("Q", "q", 1, 10),
        ("R", "r", 6, 1),
        ("S", "s", 4, 1),
        ("T", "t", 6, 1),
        ("U", "u", 4, 1),
        ("V", "v", 2, 4),
        ("W", "w", 2, 4),
        ("X", "x", 1, 8),
        ("Y", "y", 2, 4),
        ("Z", "z", 1, 10),
    ])
}
