// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, error, matrix};

// 0 is an empty square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    dim: matrix::Dim,
    tiles: Box<[u8]>,
}

impl Board {
    pub fn new(dim: matrix::Dim) -> Self {
        Self {
            dim,
            tiles: vec![0u8; dim.len()].into_boxed_slice(),
        }
    }

    // one string per row, "-" for empty squares.
    pub fn from_rows<S: AsRef<str>>(
        reader: &alphabet::AlphabetReader,
        dim: matrix::Dim,
        rows: &[S],
    ) -> error::Returns<Self> {
        if rows.len() != dim.rows as usize {
            return_error!(format!("expected {} rows, got {}", dim.rows, rows.len()));
        }
        let mut board = Self::new(dim);
        for (row, s) in (0..).zip(rows) {
            let s = s.as_ref();
            let sb = s.as_bytes();
            let mut ix = 0;
            let mut col = 0;
            while ix < sb.len() {
                if col >= dim.cols {
                    return_error!(format!("row {} is too long: {:?}", row + 1, s));
                }
                if sb[ix] == b'-' || sb[ix] == b'.' {
                    ix += 1;
                } else if let Some((tile, end_ix)) = reader.next_tile(sb, ix) {
                    board.tiles[dim.at_row_col(row, col)] = tile;
                    ix = end_ix;
                } else {
                    return_error!(format!("invalid tile in row {}: {:?}", row + 1, s));
                }
                col += 1;
            }
            if col != dim.cols {
                return_error!(format!("row {} is too short: {:?}", row + 1, s));
            }
        }
        Ok(board)
    }

    pub fn to_rows(&self, alphabet: &alphabet::Alphabet) -> Vec<String> {
        (0..self.dim.rows)
            .map(|row| {
                self.row(row)
                    .iter()
                    .map(|&tile| alphabet.of(tile).unwrap_or("-"))
                    .collect()
            })
            .collect()
    }

    #[inline(always)]
    pub fn dim(&self) -> matrix::Dim {
        self.dim
    }

    #[inline(always)]
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    #[inline(always)]
    pub fn at(&self, row: i8, col: i8) -> u8 {
        self.tiles[self.dim.at_row_col(row, col)]
    }

    #[inline(always)]
    pub fn row(&self, row: i8) -> &[u8] {
        let start = self.dim.at_row_col(row, 0);
        &self.tiles[start..start + self.dim.cols as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(|&tile| tile == 0)
    }

    pub fn is_row_empty(&self, row: i8) -> bool {
        self.row(row).iter().all(|&tile| tile == 0)
    }

    // out-of-range rows count as empty.
    pub fn is_row_isolated(&self, row: i8) -> bool {
        (row - 1..=row + 1)
            .filter(|&r| (0..self.dim.rows).contains(&r))
            .all(|r| self.is_row_empty(r))
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.iter().filter(|&&tile| tile != 0).count()
    }

    // squares already holding a tile are left alone. the caller ensures they hold the same tile.
    pub fn place(&mut self, down: bool, row: i8, col: i8, word: &[u8]) {
        for (i, &tile) in (0i8..).zip(word.iter()) {
            let (r, c) = if down { (row + i, col) } else { (row, col + i) };
            let idx = self.dim.at_row_col(r, c);
            if self.tiles[idx] == 0 {
                self.tiles[idx] = tile;
            }
        }
    }

    // swaps rows and columns of the stored grid.
    pub fn transpose(&mut self) {
        let dim = self.dim;
        let transposed_dim = dim.transpose();
        let mut transposed = vec![0u8; dim.len()].into_boxed_slice();
        for row in 0..dim.rows {
            for col in 0..dim.cols {
                transposed[transposed_dim.at_row_col(col, row)] = self.tiles[dim.at_row_col(row, col)];
            }
        }
        self.dim = transposed_dim;
        self.tiles = transposed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim() -> matrix::Dim {
        matrix::Dim { rows: 15, cols: 15 }
    }

    fn empty_rows() -> Vec<String> {
        vec!["-".repeat(15); 15]
    }

    #[test]
    fn test_rows_round_trip() {
        let alphabet = alphabet::make_polish_alphabet();
        let reader = alphabet::AlphabetReader::new(&alphabet);
        let mut rows = empty_rows();
        rows[7] = "----żółw-------".to_string();
        let board = Board::from_rows(&reader, dim(), &rows).unwrap();
        assert_eq!(board.num_tiles(), 4);
        rows[7] = "----ŻÓŁW-------".to_string();
        assert_eq!(board.to_rows(&alphabet), rows);
        assert!(!board.is_row_empty(7));
        assert!(board.is_row_empty(6));
        assert!(!board.is_row_isolated(6));
        assert!(board.is_row_isolated(5));
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        let alphabet = alphabet::make_english_alphabet();
        let reader = alphabet::AlphabetReader::new(&alphabet);
        let mut rows = empty_rows();
        rows[0] = "-".repeat(14);
        assert!(Board::from_rows(&reader, dim(), &rows).is_err());
        rows[0] = "-".repeat(16);
        assert!(Board::from_rows(&reader, dim(), &rows).is_err());
        rows[0] = "--------------1".to_string();
        assert!(Board::from_rows(&reader, dim(), &rows).is_err());
        assert!(Board::from_rows(&reader, dim(), &rows[1..]).is_err());
    }

    #[test]
    fn test_place_and_transpose() {
        let alphabet = alphabet::make_english_alphabet();
        let reader = alphabet::AlphabetReader::new(&alphabet);
        let mut board = Board::new(dim());
        board.place(false, 7, 6, &reader.read_word("CAT").unwrap());
        board.place(true, 7, 7, &reader.read_word("AT").unwrap());
        assert_eq!(board.num_tiles(), 4);
        assert_eq!(alphabet.of(board.at(8, 7)), Some("T"));

        let original = board.clone();
        board.transpose();
        assert_eq!(board.at(7, 8), original.at(8, 7));
        assert_eq!(board.at(6, 7), original.at(7, 6));
        board.place(false, 9, 7, &reader.read_word("S").unwrap());
        board.transpose();
        assert_eq!(alphabet.of(board.at(7, 9)), Some("S"));
        assert_eq!(board.num_tiles(), 5);
    }
}
