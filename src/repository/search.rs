// src/repository/search.rs

//! Recipe search
//!
//! A search runs in two stages:
//! 1. Scalar predicates (author, country, cuisine, meal type, name
//!    substring) are AND-ed into one `WHERE` clause.
//! 2. Each candidate's ingredient set is checked against the exclusion set
//!    and then the inclusion set.
//!
//! Exclusion always applies. Inclusion is loose by default (at least one
//! shared ingredient); strict inclusion requires every ingredient of the
//! recipe to be in the requested set. Results keep storage order.

use super::RecipeDb;
use super::ingredients::resolve_ingredient_in;
use crate::db::models::{Ingredient, Recipe, User};
use crate::error::Result;
use crate::text::normalize_name;
use rusqlite::Connection;
use rusqlite::types::ToSql;
use std::collections::HashSet;
use tracing::debug;

/// An ingredient named in a search, by name or by handle
#[derive(Debug, Clone)]
pub enum IngredientFilter {
    /// Normalized and resolved through autocorrect; never created
    Name(String),
    Ingredient(Ingredient),
}

impl From<&str> for IngredientFilter {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for IngredientFilter {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Ingredient> for IngredientFilter {
    fn from(ingredient: Ingredient) -> Self {
        Self::Ingredient(ingredient)
    }
}

impl From<&Ingredient> for IngredientFilter {
    fn from(ingredient: &Ingredient) -> Self {
        Self::Ingredient(ingredient.clone())
    }
}

impl IngredientFilter {
    /// The id this filter refers to, or None if the name is unknown
    fn resolve(&self, conn: &Connection) -> Result<Option<String>> {
        match self {
            Self::Ingredient(ingredient) => Ok(Some(ingredient.id.clone())),
            Self::Name(name) => {
                let name = normalize_name(name);
                if name.is_empty() {
                    return Ok(None);
                }
                Ok(resolve_ingredient_in(conn, &name)?.map(|i| i.id))
            }
        }
    }
}

/// Search predicates; every field left unset matches everything
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub author_id: Option<String>,
    pub country: Option<String>,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
    /// Case-insensitive substring of the recipe name
    pub name: Option<String>,
    pub ingredients: Vec<IngredientFilter>,
    pub ingredients_exclude: Vec<IngredientFilter>,
    pub strict_ingredients: bool,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author: &User) -> Self {
        self.author_id = Some(author.id.clone());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn meal_type(mut self, meal_type: impl Into<String>) -> Self {
        self.meal_type = Some(meal_type.into());
        self
    }

    pub fn name(mut self, pattern: impl Into<String>) -> Self {
        self.name = Some(pattern.into());
        self
    }

    pub fn ingredient(mut self, ingredient: impl Into<IngredientFilter>) -> Self {
        self.ingredients.push(ingredient.into());
        self
    }

    pub fn ingredients<I, T>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<IngredientFilter>,
    {
        self.ingredients.extend(ingredients.into_iter().map(Into::into));
        self
    }

    pub fn exclude(mut self, ingredient: impl Into<IngredientFilter>) -> Self {
        self.ingredients_exclude.push(ingredient.into());
        self
    }

    pub fn exclude_all<I, T>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<IngredientFilter>,
    {
        self.ingredients_exclude.extend(ingredients.into_iter().map(Into::into));
        self
    }

    /// Only keep recipes whose ingredients all appear in the inclusion set
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_ingredients = strict;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the scalar `WHERE` clause and its bindings
    fn where_clause<'a>(
        &'a self,
        name_pattern: &'a Option<String>,
    ) -> (String, Vec<&'a dyn ToSql>) {
        let mut conditions: Vec<String> = Vec::new();
        let mut bindings: Vec<&'a dyn ToSql> = Vec::new();

        let equalities = [
            ("AuthorID", &self.author_id, ""),
            ("CountryOfOrigin", &self.country, " COLLATE NOCASE"),
            ("Cuisine", &self.cuisine, " COLLATE NOCASE"),
            ("MealType", &self.meal_type, " COLLATE NOCASE"),
        ];
        for (column, value, collation) in equalities {
            if let Some(value) = value {
                bindings.push(value);
                conditions.push(format!("{column} = ?{}{collation}", bindings.len()));
            }
        }
        if let Some(pattern) = name_pattern {
            bindings.push(pattern);
            conditions.push(format!("Name LIKE ?{} ESCAPE '\\'", bindings.len()));
        }

        let clause = if conditions.is_empty() {
            "ORDER BY rowid".to_string()
        } else {
            format!("WHERE {} ORDER BY rowid", conditions.join(" AND "))
        };
        (clause, bindings)
    }
}

/// Wrap `text` for a LIKE substring match, escaping wildcards
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn resolve_all(conn: &Connection, filters: &[IngredientFilter]) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    for filter in filters {
        if let Some(id) = filter.resolve(conn)? {
            ids.insert(id);
        }
    }
    Ok(ids)
}

impl RecipeDb {
    /// Find recipes matching every predicate in `query`
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<Recipe>> {
        if query.limit == Some(0) {
            return Ok(Vec::new());
        }

        let include = resolve_all(&self.conn, &query.ingredients)?;
        let exclude = resolve_all(&self.conn, &query.ingredients_exclude)?;
        // A non-empty inclusion list that resolved to nothing matches nothing
        let filter_included = !query.ingredients.is_empty();

        let name_pattern = query.name.as_deref().map(like_pattern);
        let (clause, bindings) = query.where_clause(&name_pattern);
        let candidates = Recipe::select(&self.conn, &clause, &bindings)?;
        debug!("Search matched {} recipes before ingredient filters", candidates.len());

        let mut results = Vec::new();
        for recipe in candidates {
            let ingredient_ids = recipe.ingredient_ids(&self.conn)?;

            if !ingredient_ids.is_disjoint(&exclude) {
                continue;
            }
            if filter_included {
                let keep = if query.strict_ingredients {
                    ingredient_ids.is_subset(&include)
                } else {
                    !ingredient_ids.is_disjoint(&include)
                };
                if !keep {
                    continue;
                }
            }

            results.push(recipe);
            if query.limit.is_some_and(|limit| results.len() >= limit) {
                break;
            }
        }

        Ok(results)
    }
}
