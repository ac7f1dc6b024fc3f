// tests/store.rs

//! Store lifecycle: schema stamp, configuration merge, reopen.

use recipedb::db::paths;
use recipedb::db::schema::SCHEMA_VERSION;
use recipedb::{Error, NewRecipe, RecipeDb, config};
use rusqlite::Connection;
use serde_json::{Value, json};
use std::fs;

#[test]
fn test_reopen_keeps_data() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");

    let recipe_id = {
        let rdb = RecipeDb::open(&data_dir).unwrap();
        let author = rdb.new_user("angela", "Angela", "pw", None, None).unwrap();
        rdb.new_recipe(NewRecipe::new("Toast").author(&author).ingredient("bread"))
            .unwrap()
            .id
    };

    let rdb = RecipeDb::open(&data_dir).unwrap();
    let recipe = rdb.get_recipe(&recipe_id).unwrap();
    assert_eq!(recipe.name, "Toast");
    assert_eq!(rdb.get_recipe_ingredients(&recipe).unwrap().len(), 1);
    assert_eq!(rdb.get_user_by_username("Angela").unwrap().display_name, "Angela");
}

#[test]
fn test_schema_guard() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    drop(RecipeDb::open(&data_dir).unwrap());

    let db_path = paths::db_path(&data_dir);
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch("PRAGMA user_version = 0;").unwrap();
    }
    let config_before = fs::read(paths::config_path(&data_dir)).unwrap();

    match RecipeDb::open(&data_dir) {
        Err(err @ Error::SchemaOutOfDate { .. }) => {
            assert_eq!(err.error_type(), "SCHEMA_OUT_OF_DATE");
            assert_eq!(
                err.to_string(),
                format!("Database is out of date. 0 should be {SCHEMA_VERSION}.")
            );
        }
        Err(other) => panic!("expected SchemaOutOfDate, got {other:?}"),
        Ok(_) => panic!("out-of-date store was opened"),
    }

    assert_eq!(fs::read(paths::config_path(&data_dir)).unwrap(), config_before);
    let conn = Connection::open(&db_path).unwrap();
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, 0);
}

#[test]
fn test_config_merge_rewrites_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("recipedb.json");
    fs::write(&path, r#"{"log_level": "DEBUG"}"#).unwrap();

    let defaults = json!({"log_level": "INFO", "cache": {"size": 10}});
    let merged = config::load(&path, &defaults).unwrap();
    assert_eq!(merged, json!({"log_level": "DEBUG", "cache": {"size": 10}}));

    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, merged);
}

#[test]
fn test_store_config_keeps_unknown_keys() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(
        paths::config_path(&data_dir),
        r#"{"log_level": "warning", "theme": "dark"}"#,
    )
    .unwrap();

    let rdb = RecipeDb::open(&data_dir).unwrap();
    assert_eq!(rdb.config().log_level, "warning");
    assert_eq!(rdb.config().tracing_directive(), "warn");
    assert_eq!(rdb.config().session.max_age_seconds, 604_800);
    assert_eq!(rdb.config_document()["theme"], "dark");

    let on_disk: Value =
        serde_json::from_str(&fs::read_to_string(paths::config_path(&data_dir)).unwrap()).unwrap();
    assert_eq!(on_disk["theme"], "dark");
    assert_eq!(on_disk["session"]["max_age_seconds"], 604_800);
}

#[test]
fn test_out_of_range_config_values_refused() {
    for document in [
        r#"{"session": {"max_age_seconds": 9223372036854775807}}"#,
        r#"{"file_read_chunk": 18446744073709551615}"#,
    ] {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(paths::config_path(&data_dir), document).unwrap();

        match RecipeDb::open(&data_dir) {
            Err(err @ Error::InvalidArgument(_)) => {
                assert_eq!(err.error_type(), "INVALID_ARGUMENT");
            }
            Err(other) => panic!("expected InvalidArgument, got {other:?}"),
            Ok(_) => panic!("store opened with {document}"),
        }
    }
}
