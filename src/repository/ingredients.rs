// src/repository/ingredients.rs

//! Ingredient lookup, creation and autocorrect redirects
//!
//! Every name passed in is normalized before it is compared or stored.
//! A name is "claimed" when it is either an ingredient's canonical name or
//! an alternate name redirecting to one; a claimed name cannot be reused
//! for a new ingredient or a new redirect.

use super::{RecipeDb, exists_on_conflict};
use crate::db::models::{Ingredient, IngredientTag};
use crate::error::{Error, Result};
use crate::text::normalize_name;
use rusqlite::Connection;
use tracing::debug;

/// Normalize a name, refusing names that normalize to nothing
pub(crate) fn normalized(name: &str) -> Result<String> {
    let name = normalize_name(name);
    if name.is_empty() {
        return Err(Error::InvalidArgument("name must not be empty".to_string()));
    }
    Ok(name)
}

/// Resolve an already-normalized name: canonical names first, then redirects
pub(crate) fn resolve_ingredient_in(conn: &Connection, name: &str) -> Result<Option<Ingredient>> {
    if let Some(ingredient) = Ingredient::find_by_name(conn, name)? {
        return Ok(Some(ingredient));
    }
    Ingredient::find_by_autocorrect(conn, name)
}

/// Resolve `name`, creating the ingredient if nothing claims it
pub(crate) fn get_or_create_in(conn: &Connection, name: &str) -> Result<Ingredient> {
    let name = normalized(name)?;
    if let Some(ingredient) = resolve_ingredient_in(conn, &name)? {
        return Ok(ingredient);
    }

    let ingredient = Ingredient::new(name);
    ingredient
        .insert(conn)
        .map_err(|e| exists_on_conflict(e, || Error::IngredientExists(ingredient.name.clone())))?;
    debug!("Created ingredient {} ({})", ingredient.name, ingredient.id);
    Ok(ingredient)
}

impl RecipeDb {
    /// Fetch an ingredient by ID
    pub fn get_ingredient(&self, id: &str) -> Result<Ingredient> {
        Ingredient::find_by_id(&self.conn, id)?
            .ok_or_else(|| Error::NoSuchIngredient(id.to_string()))
    }

    /// Fetch an ingredient by name, following autocorrect redirects
    pub fn get_ingredient_by_name(&self, name: &str) -> Result<Ingredient> {
        let name = normalized(name)?;
        resolve_ingredient_in(&self.conn, &name)?.ok_or(Error::NoSuchIngredient(name))
    }

    /// All ingredients by name
    pub fn get_ingredients(&self) -> Result<Vec<Ingredient>> {
        Ingredient::list_all(&self.conn)
    }

    /// Fetch the ingredient `name` resolves to, creating it on a miss
    pub fn get_or_create_ingredient(&self, name: &str) -> Result<Ingredient> {
        get_or_create_in(&self.conn, name)
    }

    /// Create a new ingredient
    ///
    /// Fails with `IngredientExists` if the normalized name is already
    /// claimed by an ingredient or a redirect.
    pub fn new_ingredient(&self, name: &str) -> Result<Ingredient> {
        let name = normalized(name)?;
        if let Some(existing) = resolve_ingredient_in(&self.conn, &name)? {
            debug!("Ingredient name {} already claimed by {}", name, existing.id);
            return Err(Error::IngredientExists(name));
        }

        let ingredient = Ingredient::new(name);
        ingredient.insert(&self.conn).map_err(|e| {
            exists_on_conflict(e, || Error::IngredientExists(ingredient.name.clone()))
        })?;
        debug!("Created ingredient {} ({})", ingredient.name, ingredient.id);
        Ok(ingredient)
    }

    /// Redirect `alternate_name` to `ingredient`
    pub fn add_autocorrect(&self, ingredient: &Ingredient, alternate_name: &str) -> Result<()> {
        let alternate_name = normalized(alternate_name)?;
        if resolve_ingredient_in(&self.conn, &alternate_name)?.is_some() {
            return Err(Error::IngredientExists(alternate_name));
        }

        ingredient
            .insert_autocorrect(&self.conn, &alternate_name)
            .map_err(|e| exists_on_conflict(e, || Error::IngredientExists(alternate_name.clone())))?;
        debug!("Redirected {} to ingredient {}", alternate_name, ingredient.id);
        Ok(())
    }

    /// Alternate names redirecting to `ingredient`
    pub fn get_autocorrects(&self, ingredient: &Ingredient) -> Result<Vec<String>> {
        ingredient.autocorrects(&self.conn)
    }

    /// Give `ingredient` a new canonical name
    ///
    /// Changing only the case of the current name is allowed.
    pub fn rename_ingredient(&self, ingredient: &mut Ingredient, name: &str) -> Result<()> {
        let name = normalized(name)?;
        if let Some(existing) = resolve_ingredient_in(&self.conn, &name)? {
            if existing.id != ingredient.id || Ingredient::find_by_name(&self.conn, &name)?.is_none()
            {
                return Err(Error::IngredientExists(name));
            }
        }

        ingredient
            .update_name(&self.conn, &name)
            .map_err(|e| exists_on_conflict(e, || Error::IngredientExists(name.clone())))?;
        debug!("Renamed ingredient {} to {}", ingredient.id, ingredient.name);
        Ok(())
    }

    /// Attach `tag` to `ingredient`; attaching twice is a no-op
    pub fn add_tag(&self, ingredient: &Ingredient, tag: &IngredientTag) -> Result<()> {
        ingredient.add_tag(&self.conn, tag)?;
        debug!("Tagged ingredient {} with {}", ingredient.id, tag.id);
        Ok(())
    }

    /// Detach `tag` from `ingredient`; returns whether it was attached
    pub fn remove_tag(&self, ingredient: &Ingredient, tag: &IngredientTag) -> Result<bool> {
        let removed = ingredient.remove_tag(&self.conn, tag)?;
        if removed {
            debug!("Untagged ingredient {} from {}", ingredient.id, tag.id);
        }
        Ok(removed)
    }

    /// Tags attached directly to `ingredient`
    pub fn get_ingredient_tags(&self, ingredient: &Ingredient) -> Result<Vec<IngredientTag>> {
        ingredient.tags(&self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, RecipeDb) {
        let temp_dir = tempfile::tempdir().unwrap();
        let rdb = RecipeDb::open_in_memory(temp_dir.path().join("images")).unwrap();
        (temp_dir, rdb)
    }

    #[test]
    fn test_new_ingredient_normalizes() {
        let (_temp, rdb) = test_db();
        let ingredient = rdb.new_ingredient("  cream_cheese ").unwrap();
        assert_eq!(ingredient.name, "cream cheese");

        let found = rdb.get_ingredient(&ingredient.id).unwrap();
        assert_eq!(found.name, "cream cheese");
        assert_eq!(rdb.get_ingredient_by_name("Cream_Cheese").unwrap(), ingredient);
    }

    #[test]
    fn test_duplicate_ingredient_any_case() {
        let (_temp, rdb) = test_db();
        rdb.new_ingredient("Flour").unwrap();

        let err = rdb.new_ingredient("FLOUR").unwrap_err();
        assert!(matches!(err, Error::IngredientExists(_)), "got {err:?}");
        assert_eq!(rdb.get_ingredients().unwrap().len(), 1);
    }

    #[test]
    fn test_get_or_create_follows_autocorrect() {
        let (_temp, rdb) = test_db();
        let eggplant = rdb.new_ingredient("eggplant").unwrap();
        rdb.add_autocorrect(&eggplant, "aubergine").unwrap();

        assert_eq!(rdb.get_or_create_ingredient("Aubergine").unwrap(), eggplant);
        assert_eq!(rdb.get_or_create_ingredient("eggplant").unwrap(), eggplant);
        assert_eq!(rdb.get_ingredients().unwrap().len(), 1);

        let basil = rdb.get_or_create_ingredient("basil").unwrap();
        assert_ne!(basil, eggplant);
        assert_eq!(rdb.get_ingredients().unwrap().len(), 2);
    }

    #[test]
    fn test_autocorrect_conflicts() {
        let (_temp, rdb) = test_db();
        let eggplant = rdb.new_ingredient("eggplant").unwrap();
        let basil = rdb.new_ingredient("basil").unwrap();
        rdb.add_autocorrect(&eggplant, "aubergine").unwrap();

        // Claimed by an ingredient
        assert!(matches!(
            rdb.add_autocorrect(&eggplant, "Basil"),
            Err(Error::IngredientExists(_))
        ));
        // Claimed by a redirect
        assert!(matches!(
            rdb.add_autocorrect(&basil, "AUBERGINE"),
            Err(Error::IngredientExists(_))
        ));
        // New ingredient named after a redirect
        assert!(matches!(
            rdb.new_ingredient("aubergine"),
            Err(Error::IngredientExists(_))
        ));

        assert_eq!(rdb.get_autocorrects(&eggplant).unwrap(), vec!["aubergine".to_string()]);
        assert!(rdb.get_autocorrects(&basil).unwrap().is_empty());
    }

    #[test]
    fn test_rename_ingredient() {
        let (_temp, rdb) = test_db();
        let mut eggs = rdb.new_ingredient("eggs").unwrap();
        rdb.new_ingredient("milk").unwrap();

        rdb.rename_ingredient(&mut eggs, "Eggs").unwrap();
        assert_eq!(rdb.get_ingredient(&eggs.id).unwrap().name, "Eggs");

        assert!(matches!(
            rdb.rename_ingredient(&mut eggs, "milk"),
            Err(Error::IngredientExists(_))
        ));
        assert_eq!(eggs.name, "Eggs");

        rdb.rename_ingredient(&mut eggs, "hen_eggs").unwrap();
        assert_eq!(rdb.get_ingredient(&eggs.id).unwrap().name, "hen eggs");
    }

    #[test]
    fn test_tagging() {
        let (_temp, rdb) = test_db();
        let milk = rdb.new_ingredient("milk").unwrap();
        let dairy = rdb.new_ingredient_tag("dairy", None).unwrap();

        rdb.add_tag(&milk, &dairy).unwrap();
        rdb.add_tag(&milk, &dairy).unwrap();
        assert_eq!(rdb.get_ingredient_tags(&milk).unwrap(), vec![dairy.clone()]);

        assert!(rdb.remove_tag(&milk, &dairy).unwrap());
        assert!(rdb.get_ingredient_tags(&milk).unwrap().is_empty());
    }

    #[test]
    fn test_empty_names_rejected() {
        let (_temp, rdb) = test_db();
        assert!(matches!(rdb.new_ingredient(" _ "), Err(Error::InvalidArgument(_))));
        assert!(matches!(rdb.get_or_create_ingredient(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_missing_ingredient() {
        let (_temp, rdb) = test_db();
        assert!(matches!(rdb.get_ingredient("nope"), Err(Error::NoSuchIngredient(_))));
        assert!(matches!(
            rdb.get_ingredient_by_name("saffron"),
            Err(Error::NoSuchIngredient(_))
        ));
    }
}
