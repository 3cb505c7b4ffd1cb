//! Puzzle module - the shelf being sorted
//!
//! The shelf is a fixed array of 12 distinct books numbered `1..=12`.
//! Slot `i` is "home" for book `i + 1`. The array is only ever modified by
//! swapping neighbours or by the sorter's insertion sort, so it stays a permutation.

use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};

use crate::rng::sorted_books;
use crate::types::SHELF_SIZE;

/// A shelf of books (always a permutation of `1..=12`)
///
/// Serializes as a plain array; deserializing rejects anything but a permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 12]", into = "[u8; 12]")]
pub struct Puzzle {
    books: [u8; SHELF_SIZE],
}

impl Puzzle {
    /// The solved shelf
    pub const SORTED_BOOKS: [u8; SHELF_SIZE] = sorted_books();

    /// Build a shelf from an explicit arrangement.
    ///
    /// Returns `None` unless `books` holds each of `1..=12` exactly once.
    pub fn new(books: [u8; SHELF_SIZE]) -> Option<Self> {
        let mut seen = [false; SHELF_SIZE];
        for &book in &books {
            let slot = (book as usize).checked_sub(1)?;
            if slot >= SHELF_SIZE || seen[slot] {
                return None;
            }
            seen[slot] = true;
        }
        Some(Self { books })
    }

    pub(crate) fn from_books(books: [u8; SHELF_SIZE]) -> Self {
        debug_assert!(Self::new(books).is_some());
        Self { books }
    }

    /// The solved shelf `[1, 2, ..., 12]`
    pub fn sorted() -> Self {
        Self {
            books: Self::SORTED_BOOKS,
        }
    }

    pub fn books(&self) -> &[u8; SHELF_SIZE] {
        &self.books
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.books
    }

    /// Book at `slot`, or `None` when out of range
    pub fn get(&self, slot: usize) -> Option<u8> {
        self.books.get(slot).copied()
    }

    /// Slot currently holding `book`
    pub fn position_of(&self, book: u8) -> Option<usize> {
        self.books.iter().position(|&b| b == book)
    }

    /// Whether the book at `slot` is home
    pub fn is_placed(&self, slot: usize) -> bool {
        self.get(slot) == Some((slot + 1) as u8)
    }

    /// Whether every slot `0..=through` holds its home book
    pub fn front_is_placed(&self, through: usize) -> bool {
        through < SHELF_SIZE && (0..=through).all(|slot| self.is_placed(slot))
    }

    /// Whether the whole shelf is in ascending order
    pub fn is_sorted(&self) -> bool {
        self.books.windows(2).all(|w| w[0] <= w[1])
    }

    /// Swap the book at `slot` with its left neighbour.
    ///
    /// Returns false (and does nothing) for slot 0 or an out-of-range slot.
    pub fn swap_left(&mut self, slot: usize) -> bool {
        if slot == 0 || slot >= SHELF_SIZE {
            return false;
        }
        self.books.swap(slot, slot - 1);
        true
    }

    /// Sort the shelf in place with insertion sort.
    ///
    /// Returns the number of element shifts performed.
    pub fn insertion_sort(&mut self) -> u32 {
        let mut shifts = 0u32;
        for i in 1..SHELF_SIZE {
            let key = self.books[i];
            let mut j = i;
            while j > 0 && self.books[j - 1] > key {
                self.books[j] = self.books[j - 1];
                j -= 1;
                shifts += 1;
            }
            self.books[j] = key;
        }
        shifts
    }
}

impl TryFrom<[u8; SHELF_SIZE]> for Puzzle {
    type Error = Error;

    fn try_from(books: [u8; SHELF_SIZE]) -> Result<Self, Self::Error> {
        match Self::new(books) {
            Some(puzzle) => Ok(puzzle),
            None => bail!("shelf is not a permutation of 1..={SHELF_SIZE}: {books:?}"),
        }
    }
}

impl From<Puzzle> for [u8; SHELF_SIZE] {
    fn from(puzzle: Puzzle) -> Self {
        puzzle.books
    }
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::sorted()
    }
}
