// Copyright (C) 2020-2024 Andy Kurnia.

use super::matrix;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Premium {
    pub word_multiplier: i8,
    pub letter_multiplier: i8,
}

pub static TWS: Premium = Premium {
    word_multiplier: 3,
    letter_multiplier: 1,
};
pub static DWS: Premium = Premium {
    word_multiplier: 2,
    letter_multiplier: 1,
};
pub static TLS: Premium = Premium {
    word_multiplier: 1,
    letter_multiplier: 3,
};
pub static DLS: Premium = Premium {
    word_multiplier: 1,
    letter_multiplier: 2,
};
pub static FVS: Premium = Premium {
    word_multiplier: 1,
    letter_multiplier: 1,
};

pub struct BoardLayout {
    premiums: Box<[Premium]>,
    dim: matrix::Dim,
    star_row: i8,
    star_col: i8,
}

impl BoardLayout {
    // unlisted squares are face value.
    pub fn from_bonuses(
        dim: matrix::Dim,
        star_row: i8,
        star_col: i8,
        bonuses: &[((i8, i8), Premium)],
    ) -> Self {
        let mut premiums = vec![FVS; dim.len()].into_boxed_slice();
        for &((row, col), premium) in bonuses {
            premiums[dim.at_row_col(row, col)] = premium;
        }
        Self {
            premiums,
            dim,
            star_row,
            star_col,
        }
    }

    #[inline(always)]
    pub fn dim(&self) -> matrix::Dim {
        self.dim
    }

    #[inline(always)]
    pub fn star_row(&self) -> i8 {
        self.star_row
    }

    #[inline(always)]
    pub fn star_col(&self) -> i8 {
        self.star_col
    }

    #[inline(always)]
    pub fn premiums(&self) -> &[Premium] {
        &self.premiums
    }

    #[inline(always)]
    pub fn premium_at(&self, row: i8, col: i8) -> Premium {
        self.premiums[self.dim.at_row_col(row, col)]
    }

    // true if transposing the board maps every premium and the star onto itself.
    pub fn is_symmetric(&self) -> bool {
        self.dim.rows == self.dim.cols
            && self.star_row == self.star_col
            && (0..self.dim.rows).all(|row| {
                (0..row).all(|col| self.premium_at(row, col) == self.premium_at(col, row))
            })
    }
}

pub fn make_standard_board_layout() -> BoardLayout {
    BoardLayout {
        premiums: Box::new([
            TWS, FVS, FVS, DLS, FVS, FVS, FVS, TWS, FVS, FVS, FVS, DLS, FVS, FVS, TWS, //
            FVS, DWS, FVS, FVS, FVS, TLS, FVS, FVS, FVS, TLS, FVS, FVS, FVS, DWS, FVS, //
            FVS, FVS, DWS, FVS, FVS, FVS, DLS, FVS, DLS, FVS, FVS, FVS, DWS, FVS, FVS, //
            DLS, FVS, FVS, DWS, FVS, FVS, FVS, DLS, FVS, FVS, FVS, DWS, FVS, FVS, DLS, //
            FVS, FVS, FVS, FVS, DWS, FVS, FVS, FVS, FVS, FVS, DWS, FVS, FVS, FVS, FVS, //
            FVS, TLS, FVS, FVS, FVS, TLS, FVS, FVS, FVS, TLS, FVS, FVS, FVS, TLS, FVS, //
            FVS, FVS, DLS, FVS, FVS, FVS, DLS, FVS, DLS, FVS, FVS, FVS, DLS, FVS, FVS, //
            TWS, FVS, FVS, DLS, FVS, FVS, FVS, DWS, FVS, FVS, FVS, DLS, FVS, FVS, TWS, //
            FVS, FVS, DLS, FVS, FVS, FVS, DLS, FVS, DLS, FVS, FVS, FVS, DLS, FVS, FVS, //
            FVS, TLS, FVS, FVS, FVS, TLS, FVS, FVS, FVS, TLS, FVS, FVS, FVS, TLS, FVS, //
            FVS, FVS, FVS, FVS, DWS, FVS, FVS, FVS, FVS, FVS, DWS, FVS, FVS, FVS, FVS, //
            DLS, FVS, FVS, DWS, FVS, FVS, FVS, DLS, FVS, FVS, FVS, DWS, FVS, FVS, DLS, //
            FVS, FVS, DWS, FVS, FVS, FVS, DLS, FVS, DLS, FVS, FVS, FVS, DWS, FVS, FVS, //
            FVS, DWS, FVS, FVS, FVS, TLS, FVS, FVS, FVS, TLS, FVS, FVS, FVS, DWS, FVS, //
            TWS, FVS, FVS, DLS, FVS, FVS, FVS, TWS, FVS, FVS, FVS, DLS, FVS, FVS, TWS, //
        ]),
        dim: matrix::Dim { rows: 15, cols: 15 },
        star_row: 7,
        star_col: 7,
    }
}

// no premiums at all, not even the star.
pub fn make_plain_board_layout() -> BoardLayout {
    BoardLayout::from_bonuses(matrix::Dim { rows: 15, cols: 15 }, 7, 7, &[])
}
