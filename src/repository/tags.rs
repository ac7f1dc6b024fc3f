// src/repository/tags.rs

//! Ingredient tag forest and closure computation
//!
//! Each tag has at most one parent. A parent is only assigned through
//! [`RecipeDb::add_child`], which refuses tags that already have one and
//! refuses links that would close a loop. Ascent still tracks the ids it
//! has visited and fails with `TagCycle` rather than looping if a loop was
//! written some other way.

use super::RecipeDb;
use super::ingredients::normalized;
use crate::db::models::{Ingredient, IngredientTag, Recipe};
use crate::error::{Error, Result};
use rusqlite::Connection;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Everything reachable from a recipe's ingredients
#[derive(Debug, Clone, Default)]
pub struct RecipeClosure {
    /// Ingredients the recipe uses directly
    pub ingredients: HashSet<Ingredient>,
    /// Tags on those ingredients plus all of their ancestors
    pub tags: HashSet<IngredientTag>,
}

impl RecipeClosure {
    /// Sorted names of every ingredient and tag in the closure
    pub fn names(&self) -> BTreeSet<String> {
        self.ingredients
            .iter()
            .map(|i| i.name.clone())
            .chain(self.tags.iter().map(|t| t.name.clone()))
            .collect()
    }
}

/// Add `start` and every ancestor of it to `result`
///
/// A chain stops early at a tag some earlier chain already added.
fn ascend_into(
    conn: &Connection,
    start: IngredientTag,
    result: &mut HashSet<IngredientTag>,
) -> Result<()> {
    let mut chain: HashSet<String> = HashSet::new();
    let mut current = Some(start);

    while let Some(tag) = current {
        if !chain.insert(tag.id.clone()) {
            return Err(Error::TagCycle(tag.id));
        }
        let parent = tag.parent(conn)?;
        if !result.insert(tag) {
            break;
        }
        current = parent;
    }
    Ok(())
}

/// Ancestors of `tag`, nearest first
fn ancestors(conn: &Connection, tag: &IngredientTag) -> Result<Vec<IngredientTag>> {
    let mut seen: HashSet<String> = HashSet::from([tag.id.clone()]);
    let mut found = Vec::new();
    let mut current = tag.parent(conn)?;

    while let Some(parent) = current {
        if !seen.insert(parent.id.clone()) {
            return Err(Error::TagCycle(parent.id));
        }
        current = parent.parent(conn)?;
        found.push(parent);
    }
    Ok(found)
}

impl RecipeDb {
    /// Create a tag, optionally directly under `parent`
    pub fn new_ingredient_tag(
        &self,
        name: &str,
        parent: Option<&IngredientTag>,
    ) -> Result<IngredientTag> {
        let name = normalized(name)?;
        if let Some(parent) = parent {
            self.get_ingredient_tag(&parent.id)?;
        }

        let mut tag = IngredientTag::new(name);
        tag.parent_id = parent.map(|p| p.id.clone());
        tag.insert(&self.conn)?;

        debug!("Created ingredient tag {} ({})", tag.name, tag.id);
        Ok(tag)
    }

    /// Fetch a tag by ID
    pub fn get_ingredient_tag(&self, id: &str) -> Result<IngredientTag> {
        IngredientTag::find_by_id(&self.conn, id)?
            .ok_or_else(|| Error::NoSuchIngredientTag(id.to_string()))
    }

    /// Fetch a tag by name, ignoring case
    pub fn get_ingredient_tag_by_name(&self, name: &str) -> Result<IngredientTag> {
        let name = normalized(name)?;
        IngredientTag::find_by_name(&self.conn, &name)?.ok_or(Error::NoSuchIngredientTag(name))
    }

    /// All tags by name
    pub fn get_all_ingredient_tags(&self) -> Result<Vec<IngredientTag>> {
        IngredientTag::list_all(&self.conn)
    }

    /// Make `tag` a child of `parent`
    ///
    /// Fails with `AlreadyHasParent` if the stored tag already has a parent;
    /// call [`RecipeDb::leave_parent`] first. Fails with `TagCycle` if
    /// `parent` is `tag` itself or one of its descendants.
    pub fn add_child(&self, parent: &IngredientTag, tag: &mut IngredientTag) -> Result<()> {
        let stored = self.get_ingredient_tag(&tag.id)?;
        if let Some(existing) = stored.parent_id {
            return Err(Error::AlreadyHasParent {
                tag: tag.id.clone(),
                parent: existing,
            });
        }

        let parent = self.get_ingredient_tag(&parent.id)?;
        if parent.id == tag.id || ancestors(&self.conn, &parent)?.iter().any(|a| a.id == tag.id) {
            return Err(Error::TagCycle(tag.id.clone()));
        }

        tag.set_parent(&self.conn, Some(&parent.id))?;
        debug!("Attached tag {} under {}", tag.id, parent.id);
        Ok(())
    }

    /// Detach `tag` from its parent; rootless tags are left alone
    pub fn leave_parent(&self, tag: &mut IngredientTag) -> Result<()> {
        let stored = self.get_ingredient_tag(&tag.id)?;
        if stored.parent_id.is_none() {
            tag.parent_id = None;
            return Ok(());
        }

        tag.set_parent(&self.conn, None)?;
        debug!("Detached tag {} from its parent", tag.id);
        Ok(())
    }

    /// The parent of `tag`, or None for a root
    pub fn get_parent(&self, tag: &IngredientTag) -> Result<Option<IngredientTag>> {
        tag.parent(&self.conn)
    }

    /// Tags whose parent is `tag`
    pub fn get_children(&self, tag: &IngredientTag) -> Result<Vec<IngredientTag>> {
        tag.children(&self.conn)
    }

    /// Ingredients carrying `tag` directly
    pub fn get_tagged_ingredients(&self, tag: &IngredientTag) -> Result<Vec<Ingredient>> {
        tag.ingredients(&self.conn)
    }

    /// The tags on `ingredient` and all of their ancestors
    pub fn tag_closure(&self, ingredient: &Ingredient) -> Result<HashSet<IngredientTag>> {
        let mut tags = HashSet::new();
        for tag in ingredient.tags(&self.conn)? {
            ascend_into(&self.conn, tag, &mut tags)?;
        }
        Ok(tags)
    }

    /// The ingredients of `recipe` and every tag reachable from them
    pub fn recipe_closure(&self, recipe: &Recipe) -> Result<RecipeClosure> {
        let mut closure = RecipeClosure::default();
        for row in recipe.ingredients(&self.conn)? {
            for tag in row.ingredient.tags(&self.conn)? {
                ascend_into(&self.conn, tag, &mut closure.tags)?;
            }
            closure.ingredients.insert(row.ingredient);
        }
        Ok(closure)
    }
}
