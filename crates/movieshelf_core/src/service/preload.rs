//! One-shot preload of bundled recipe data.
//!
//! # Invariants
//! - Recipes and the `is_data_preloaded` flag are committed together.
//! - Once the flag is set, later preloads write nothing.

use crate::context::ManagedContext;
use crate::model::recipe::Recipe;
use crate::repo::RepoResult;
use log::info;
use serde::Deserialize;

/// Persisted flag recording a completed preload.
pub const DATA_PRELOADED_FLAG: &str = "is_data_preloaded";

/// One recipe in the bundled JSON document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeSeed {
    name: String,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    image: String,
    #[serde(default, rename = "description")]
    summary: String,
    #[serde(default)]
    prep_time: String,
    #[serde(default)]
    cook_time: String,
    #[serde(default)]
    total_time: String,
    #[serde(default)]
    servings: u32,
    #[serde(default)]
    highlights: Vec<String>,
    #[serde(default)]
    directions: Vec<String>,
}

impl From<RecipeSeed> for Recipe {
    fn from(seed: RecipeSeed) -> Self {
        let mut recipe = Recipe::new(seed.name);
        recipe.featured = seed.featured;
        recipe.image = seed.image;
        recipe.summary = seed.summary;
        recipe.prep_time = seed.prep_time;
        recipe.cook_time = seed.cook_time;
        recipe.total_time = seed.total_time;
        recipe.servings = seed.servings;
        recipe.highlights = seed.highlights;
        recipe.directions = seed.directions;
        recipe
    }
}

/// Parses `json` (an array of recipes) and commits them once.
///
/// Returns the number of recipes inserted; `0` when the store was already
/// preloaded. Other pending changes in `ctx` are committed along with the
/// recipes.
///
/// # Errors
/// - `InvalidData` when `json` is not a recipe array; nothing is staged.
/// - `CommitFailed` when the store rejects a recipe; nothing is preloaded.
pub fn preload_recipes(ctx: &mut ManagedContext, json: &str) -> RepoResult<usize> {
    if ctx.flag(DATA_PRELOADED_FLAG)? {
        info!("event=recipe_preload module=service status=skipped reason=already_preloaded");
        return Ok(0);
    }

    let seeds: Vec<RecipeSeed> = serde_json::from_str(json)?;
    let count = seeds.len();
    for seed in seeds {
        ctx.insert(&Recipe::from(seed));
    }
    ctx.set_flag(DATA_PRELOADED_FLAG, true);
    ctx.save()?;

    info!("event=recipe_preload module=service status=ok count={count}");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::{preload_recipes, DATA_PRELOADED_FLAG};
    use crate::context::ManagedContext;
    use crate::db::open_db_in_memory;
    use crate::model::recipe::Recipe;
    use crate::repo::base_model::BaseModel;
    use crate::repo::RepoError;

    const SAMPLE: &str = r#"[
        {
            "name": "Spaghetti Carbonara",
            "featured": true,
            "image": "carbonara",
            "description": "Creamy, no cream.",
            "prepTime": "10 minutes",
            "cookTime": "15 minutes",
            "totalTime": "25 minutes",
            "servings": 4,
            "highlights": ["Quick", "Classic"],
            "ingredients": [{"name": "Eggs", "num": 3}],
            "directions": ["Boil pasta.", "Whisk eggs.", "Combine."]
        },
        { "name": "Toast" }
    ]"#;

    fn context() -> ManagedContext {
        ManagedContext::try_new(open_db_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn preload_inserts_recipes_and_sets_flag() {
        let mut ctx = context();

        assert_eq!(preload_recipes(&mut ctx, SAMPLE).unwrap(), 2);
        assert!(ctx.flag(DATA_PRELOADED_FLAG).unwrap());

        let recipes = Recipe::all(&ctx);
        let carbonara = recipes
            .iter()
            .find(|recipe| recipe.name == "Spaghetti Carbonara")
            .unwrap();
        assert!(carbonara.featured);
        assert_eq!(carbonara.summary, "Creamy, no cream.");
        assert_eq!(carbonara.prep_time, "10 minutes");
        assert_eq!(carbonara.servings, 4);
        assert_eq!(carbonara.highlights, vec!["Quick", "Classic"]);
        assert_eq!(carbonara.directions.len(), 3);
    }

    #[test]
    fn second_preload_is_a_no_op() {
        let mut ctx = context();
        preload_recipes(&mut ctx, SAMPLE).unwrap();

        assert_eq!(preload_recipes(&mut ctx, SAMPLE).unwrap(), 0);
        assert_eq!(Recipe::all(&ctx).len(), 2);
    }

    #[test]
    fn malformed_json_stages_nothing() {
        let mut ctx = context();

        let err = preload_recipes(&mut ctx, "{not json").unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
        assert!(!ctx.has_changes());
        assert!(!ctx.flag(DATA_PRELOADED_FLAG).unwrap());
    }

    #[test]
    fn rejected_recipe_leaves_store_unpreloaded() {
        let mut ctx = context();

        let err = preload_recipes(&mut ctx, r#"[{"name": "Soup"}, {"name": "   "}]"#).unwrap_err();
        assert!(matches!(err, RepoError::CommitFailed { discarded: 3, .. }));
        assert!(Recipe::all(&ctx).is_empty());
        assert!(!ctx.flag(DATA_PRELOADED_FLAG).unwrap());
    }
}
