// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory drink store.
//!
//! Drinks are keyed by a monotonically increasing identifier; identifiers of
//! deleted drinks are never reused. Titles are unique.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{Drink, Ingredient, NewDrink};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("drink {0} not found")]
    NotFound(u64),

    #[error("a drink titled {0:?} already exists")]
    DuplicateTitle(String),
}

#[derive(Debug, Default)]
pub struct DrinkStore {
    drinks: BTreeMap<u64, Drink>,
    last_id: u64,
}

impl DrinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the demo drink the frontend expects on first run.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        // A fresh store has no titles to clash with.
        let _ = store.insert(NewDrink {
            title: "water".into(),
            recipe: vec![Ingredient {
                name: "water".into(),
                color: "blue".into(),
                parts: 1,
            }],
        });
        store
    }

    /// All drinks, ordered by identifier.
    pub fn list_all(&self) -> Vec<Drink> {
        self.drinks.values().cloned().collect()
    }

    pub fn find_by_id(&self, id: u64) -> Option<Drink> {
        self.drinks.get(&id).cloned()
    }

    pub fn insert(&mut self, drink: NewDrink) -> Result<Drink, StoreError> {
        self.ensure_title_free(&drink.title, None)?;

        self.last_id += 1;
        let stored = Drink {
            id: self.last_id,
            title: drink.title,
            recipe: drink.recipe,
        };
        self.drinks.insert(stored.id, stored.clone());
        Ok(stored)
    }

    /// Replace the drink with the same identifier.
    pub fn update(&mut self, drink: Drink) -> Result<Drink, StoreError> {
        if !self.drinks.contains_key(&drink.id) {
            return Err(StoreError::NotFound(drink.id));
        }
        self.ensure_title_free(&drink.title, Some(drink.id))?;

        self.drinks.insert(drink.id, drink.clone());
        Ok(drink)
    }

    pub fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        self.drinks
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn ensure_title_free(&self, title: &str, except: Option<u64>) -> Result<(), StoreError> {
        let taken = self
            .drinks
            .values()
            .any(|d| d.title == title && Some(d.id) != except);
        if taken {
            Err(StoreError::DuplicateTitle(title.to_string()))
        } else {
            Ok(())
        }
    }
}
