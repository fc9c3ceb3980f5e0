//! The swipe deck of one recommendation session.
//!
//! Every recipe handed to [`Deck::new`] is, at any point, in exactly one of three
//! places: `pending`, `rejected`, or gone because it was accepted. Rejected
//! recipes can be brought back with [`Deck::reset`]; accepted ones can't.

use std::collections::VecDeque;

use uuid::Uuid;

use crate::{error::EmptyDeck, schema::Recipe};

#[derive(Debug, Clone)]
pub struct Deck {
    id: Uuid,
    pending: VecDeque<Recipe>,
    rejected: Vec<Recipe>,
}

impl Deck {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let deck = Self {
            id: Uuid::new_v4(),
            pending: recipes.into(),
            rejected: vec![],
        };
        log::trace!("> Deck {} created with {} recipes", deck.id, deck.pending.len());

        deck
    }

    /// Session id, for correlating log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The recipe on top of the deck. Repeated calls without a mutation in
    /// between return the same reference.
    pub fn current(&self) -> Option<&Recipe> {
        self.pending.front()
    }

    /// Takes the top recipe out of the session for good.
    pub fn accept(&mut self) -> Result<Recipe, EmptyDeck> {
        let recipe = self.pending.pop_front().ok_or(EmptyDeck)?;
        log::trace!("> Deck {} accepted {}", self.id, recipe.id);

        Ok(recipe)
    }

    /// Moves the top recipe to the back of the rejected pile.
    pub fn reject(&mut self) -> Result<(), EmptyDeck> {
        let recipe = self.pending.pop_front().ok_or(EmptyDeck)?;
        log::trace!("> Deck {} rejected {}", self.id, recipe.id);
        self.rejected.push(recipe);

        Ok(())
    }

    /// Requeues every rejected recipe, in rejection order, ahead of whatever is still pending.
    pub fn reset(&mut self) {
        if self.rejected.is_empty() {
            return;
        }

        log::trace!(
            "> Deck {} requeued {} rejected recipes",
            self.id,
            self.rejected.len()
        );

        let mut pending: VecDeque<Recipe> = self.rejected.drain(..).collect();
        pending.append(&mut self.pending);
        self.pending = pending;
    }

    pub fn pending(&self) -> impl Iterator<Item = &Recipe> {
        self.pending.iter()
    }

    pub fn rejected(&self) -> &[Recipe] {
        &self.rejected
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Nothing left to show and nothing a reset could bring back.
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty() && self.rejected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: format!("Recipe {id}"),
            cooking_time_minutes: 15,
            energy_kcal: None,
            image_uri: None,
            ingredients: vec![],
            steps: vec![],
        }
    }

    fn deck(ids: &[&str]) -> Deck {
        Deck::new(ids.iter().map(|id| recipe(id)).collect())
    }

    fn pending_ids(deck: &Deck) -> Vec<&str> {
        deck.pending().map(|r| r.id.as_str()).collect()
    }

    fn rejected_ids(deck: &Deck) -> Vec<&str> {
        deck.rejected().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn current_is_stable_without_mutation() {
        let deck = deck(&["a", "b"]);

        let first = deck.current().unwrap();
        let second = deck.current().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.id, "a");
    }

    #[test]
    fn rejections_keep_their_order() {
        let mut deck = deck(&["r1", "r2", "r3", "p1"]);
        deck.reject().unwrap();
        deck.reject().unwrap();
        deck.reject().unwrap();

        assert_eq!(rejected_ids(&deck), vec!["r1", "r2", "r3"]);
        assert_eq!(pending_ids(&deck), vec!["p1"]);
    }

    #[test]
    fn reset_puts_rejected_ahead_of_pending() {
        let mut deck = deck(&["r1", "r2", "p1", "p2"]);
        deck.reject().unwrap();
        deck.reject().unwrap();
        assert_eq!(pending_ids(&deck), vec!["p1", "p2"]);

        deck.reset();

        assert_eq!(pending_ids(&deck), vec!["r1", "r2", "p1", "p2"]);
        assert!(deck.rejected().is_empty());
    }

    #[test]
    fn accepted_recipes_never_come_back() {
        let mut deck = deck(&["a", "b", "c"]);
        deck.reject().unwrap();
        let accepted = deck.accept().unwrap();
        assert_eq!(accepted.id, "b");

        deck.reject().unwrap();
        deck.reset();
        deck.reject().unwrap();
        deck.reject().unwrap();
        deck.reset();

        assert!(deck.pending().all(|r| r.id != "b"));
        assert!(deck.rejected().iter().all(|r| r.id != "b"));
        assert_eq!(deck.pending_len(), 2);
    }

    #[test]
    fn empty_deck_mutations_are_benign() {
        let mut deck = deck(&[]);

        assert_eq!(deck.accept(), Err(EmptyDeck));
        assert_eq!(deck.reject(), Err(EmptyDeck));
        deck.reset();

        assert!(deck.current().is_none());
        assert!(deck.is_exhausted());
    }

    #[test]
    fn only_an_empty_input_exhausts_the_deck() {
        let mut deck = deck(&["a"]);
        deck.reject().unwrap();
        assert!(deck.current().is_none());
        assert!(!deck.is_exhausted());

        deck.reset();
        assert_eq!(deck.current().map(|r| r.id.as_str()), Some("a"));
    }

    #[test]
    fn walkthrough() {
        let mut deck = deck(&["A", "B", "C"]);

        deck.reject().unwrap();
        assert_eq!(rejected_ids(&deck), vec!["A"]);
        assert_eq!(pending_ids(&deck), vec!["B", "C"]);

        assert_eq!(deck.accept().unwrap().id, "B");
        assert_eq!(pending_ids(&deck), vec!["C"]);

        deck.reject().unwrap();
        assert_eq!(rejected_ids(&deck), vec!["A", "C"]);
        assert!(pending_ids(&deck).is_empty());

        assert!(deck.current().is_none());

        deck.reset();
        assert_eq!(pending_ids(&deck), vec!["A", "C"]);
        assert!(deck.rejected().is_empty());
    }

    #[test]
    fn reject_and_reset_conserve_every_recipe() {
        let ids = ["a", "b", "c", "d", "e", "f", "g"];
        let mut deck = deck(&ids);

        // Fixed pseudo-random walk over reject/reset
        let mut seed: u32 = 7;
        for _ in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            if (seed >> 16) % 4 == 0 {
                deck.reset();
            } else {
                let _ = deck.reject();
            }

            assert_eq!(deck.pending_len() + deck.rejected().len(), ids.len());

            let mut seen: Vec<&str> = pending_ids(&deck);
            seen.extend(rejected_ids(&deck));
            seen.sort();
            assert_eq!(seen, ids.to_vec());
        }
    }
}
