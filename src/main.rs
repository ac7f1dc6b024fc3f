// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use recipedb::db::paths::{DEFAULT_DATA_DIR, clean_path};
use recipedb::{RecipeDb, SearchQuery};
use tracing::info;

#[derive(Parser)]
#[command(name = "recipedb")]
#[command(author, version, about = "Recipe storage and query engine", long_about = None)]
struct Cli {
    /// Data directory holding the database, configuration and images
    #[arg(short, long, global = true, default_value = DEFAULT_DATA_DIR)]
    data_dir: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and database if missing
    Init,
    /// List every recipe
    Recipes,
    /// Show one recipe with its ingredients
    Show {
        /// Recipe ID
        recipe_id: String,
    },
    /// Search recipes
    Search {
        /// Author username
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        cuisine: Option<String>,
        #[arg(long)]
        meal_type: Option<String>,
        /// Substring of the recipe name
        #[arg(long)]
        name: Option<String>,
        /// Ingredient the recipe must use (repeatable)
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,
        /// Ingredient the recipe must not use (repeatable)
        #[arg(short = 'x', long = "exclude")]
        exclude: Vec<String>,
        /// Only allow the listed ingredients
        #[arg(long)]
        strict: bool,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show every ingredient and tag reachable from a recipe
    Closure {
        /// Recipe ID
        recipe_id: String,
    },
}

fn init_tracing(rdb: &RecipeDb) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(rdb.config().tracing_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = clean_path(&cli.data_dir);

    // The log level comes from the store's configuration
    let rdb = RecipeDb::open(&data_dir)?;
    init_tracing(&rdb);

    match cli.command {
        Some(Commands::Init) => {
            info!("RecipeDB ready at {}", data_dir.display());
            println!("Initialized RecipeDB at {}", data_dir.display());
        }
        Some(Commands::Recipes) => {
            let recipes = rdb.get_recipes()?;
            if recipes.is_empty() {
                println!("No recipes");
            }
            for recipe in recipes {
                println!("{}  {}", recipe.id, recipe.name);
            }
        }
        Some(Commands::Show { recipe_id }) => {
            let recipe = rdb.get_recipe(&recipe_id)?;
            println!("{}", recipe.name);
            println!("  id: {}", recipe.id);
            println!("  slug: {}", recipe.slug());
            if let Some(author) = recipe.author(rdb.conn())? {
                println!("  author: {} ({})", author.display_name, author.username);
            }
            for (label, value) in [
                ("country", &recipe.country_of_origin),
                ("cuisine", &recipe.cuisine),
                ("meal type", &recipe.meal_type),
                ("blurb", &recipe.blurb),
            ] {
                if let Some(value) = value {
                    println!("  {label}: {value}");
                }
            }
            if let Some(minutes) = recipe.prep_time {
                println!("  prep time: {minutes} min");
            }
            if let Some(servings) = recipe.serving_size {
                println!("  serves: {servings}");
            }
            println!("  added: {}", recipe.date_added.to_rfc3339());
            println!("  modified: {}", recipe.date_modified.to_rfc3339());

            let ingredients = rdb.get_recipe_ingredients(&recipe)?;
            if !ingredients.is_empty() {
                println!("\nIngredients:");
                for row in ingredients {
                    println!("  - {row}");
                }
            }

            let paragraphs = recipe.instruction_paragraphs();
            if !paragraphs.is_empty() {
                println!("\nInstructions:");
                for (i, paragraph) in paragraphs.iter().enumerate() {
                    println!("  {}. {}", i + 1, paragraph);
                }
            }
        }
        Some(Commands::Search {
            author,
            country,
            cuisine,
            meal_type,
            name,
            ingredients,
            exclude,
            strict,
            limit,
        }) => {
            let mut query = SearchQuery::new()
                .ingredients(ingredients)
                .exclude_all(exclude)
                .strict(strict);
            if let Some(username) = author {
                query = query.author(&rdb.get_user_by_username(&username)?);
            }
            query.country = country;
            query.cuisine = cuisine;
            query.meal_type = meal_type;
            query.name = name;
            query.limit = limit;

            let results = rdb.search(&query)?;
            println!("{} recipe(s)", results.len());
            for recipe in results {
                println!("{}  {}", recipe.id, recipe.name);
            }
        }
        Some(Commands::Closure { recipe_id }) => {
            let recipe = rdb.get_recipe(&recipe_id)?;
            let closure = rdb.recipe_closure(&recipe)?;
            for name in closure.names() {
                println!("{name}");
            }
        }
        None => {
            println!("RecipeDB");
            println!("Run 'recipedb --help' for usage information");
        }
    }

    Ok(())
}
