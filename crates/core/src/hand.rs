//! Hand module - the pieces currently offered to the player
//!
//! Pieces keep their dealing order. Each dealt piece gets a fresh [`PieceId`],
//! unique within the hand's lifetime, and is removed by that id once placed. The
//! hand is redealt in full only when it runs empty.

use std::fmt;

use arrayvec::ArrayVec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pieces::{Piece, PieceCatalog};
use crate::types::{Color, MAX_HAND_SIZE};

/// Identity of a dealt piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece in the hand with its identity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldPiece {
    pub id: PieceId,
    pub piece: Piece,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    slots: ArrayVec<HeldPiece, MAX_HAND_SIZE>,
    capacity: usize,
    next_id: u32,
}

impl Hand {
    /// Empty hand dealing `capacity` pieces at a time
    ///
    /// # Panics
    ///
    /// If `capacity` is 0 or above [`MAX_HAND_SIZE`].
    pub fn new(capacity: usize) -> Self {
        assert!(
            (1..=MAX_HAND_SIZE).contains(&capacity),
            "hand capacity {capacity} out of range"
        );
        Self {
            slots: ArrayVec::new(),
            capacity,
            next_id: 1,
        }
    }

    /// Hand holding `pieces` in order (extra pieces beyond capacity are dropped)
    pub fn from_pieces(capacity: usize, pieces: impl IntoIterator<Item = Piece>) -> Self {
        let mut hand = Self::new(capacity);
        for piece in pieces {
            if hand.push(piece).is_none() {
                break;
            }
        }
        hand
    }

    /// Add a piece with a fresh id; `None` if the hand is full
    pub fn push(&mut self, piece: Piece) -> Option<PieceId> {
        if self.slots.len() >= self.capacity {
            return None;
        }
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.slots.push(HeldPiece { id, piece });
        Some(id)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: PieceId) -> Option<&HeldPiece> {
        self.slots.iter().find(|held| held.id == id)
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.get(id).is_some()
    }

    /// Held pieces in dealing order
    pub fn iter(&self) -> std::slice::Iter<'_, HeldPiece> {
        self.slots.iter()
    }

    /// The pieces alone, in dealing order
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + Clone + '_ {
        self.slots.iter().map(|held| &held.piece)
    }

    /// Smallest cell count in the hand
    pub fn min_cell_count(&self) -> Option<usize> {
        self.pieces().map(Piece::cell_count).min()
    }

    /// Remove a piece by id, keeping the order of the rest
    pub fn remove(&mut self, id: PieceId) -> Option<HeldPiece> {
        let index = self.slots.iter().position(|held| held.id == id)?;
        Some(self.slots.remove(index))
    }

    /// Deal fresh pieces until the hand is at capacity
    pub fn deal<R: Rng + ?Sized>(
        &mut self,
        catalog: &PieceCatalog,
        rng: &mut R,
        palette: &[Color],
    ) {
        while self.slots.len() < self.capacity {
            let piece = catalog.spawn_piece(rng, palette);
            self.push(piece);
        }
    }

    /// Redeal a full hand if the hand is empty; returns whether it did
    pub fn refill_if_empty<R: Rng + ?Sized>(
        &mut self,
        catalog: &PieceCatalog,
        rng: &mut R,
        palette: &[Color],
    ) -> bool {
        if !self.slots.is_empty() {
            return false;
        }
        self.deal(catalog, rng, palette);
        true
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<'a> IntoIterator for &'a Hand {
    type Item = &'a HeldPiece;
    type IntoIter = std::slice::Iter<'a, HeldPiece>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
