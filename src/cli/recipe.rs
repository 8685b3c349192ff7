//! Recipe lookup command implementations

use std::future::Future;

use futures::future::join_all;
use log::{debug, warn};

use crate::cache::key;
use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::client::{IngredientList, RecipeFilters};
use crate::error::{Error, Result};
use crate::output::{self, table};

/// Run the recipe command
pub async fn details(opts: &GlobalOptions, recipe_id: u64) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let client = &ctx.client;
    run_calls(&ctx, &key::recipe_details(recipe_id), move || {
        client.recipe_details(recipe_id)
    })
    .await
}

/// Run the ingredients command
pub async fn ingredients(opts: &GlobalOptions, recipe_id: u64) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let client = &ctx.client;
    run_calls(&ctx, &key::ingredients(recipe_id), move || {
        client.ingredients(recipe_id)
    })
    .await
}

/// Run the search command
pub async fn search(opts: &GlobalOptions, ingredients: &IngredientList) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let client = &ctx.client;
    run_calls(&ctx, &key::recipes(ingredients), move || {
        client.recipes_by_ingredients(ingredients)
    })
    .await
}

/// Run the filter command
pub async fn filter(opts: &GlobalOptions, filters: &RecipeFilters) -> Result<()> {
    if filters.min_calories > filters.max_calories {
        return Err(Error::Other(format!(
            "--min-calories ({}) must not exceed --max-calories ({})",
            filters.min_calories, filters.max_calories
        )));
    }

    let ctx = CommandContext::new(opts)?;
    let client = &ctx.client;
    run_calls(&ctx, &key::filtered_recipes(filters), move || {
        client.filtered_recipes(filters)
    })
    .await
}

/// Issue `ctx.concurrency` identical calls at once and print the outcome.
async fn run_calls<F, Fut>(ctx: &CommandContext, key: &str, call: F) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Option<String>>,
{
    ctx.cancel_on_interrupt();

    debug!(
        "Issuing {} concurrent call(s) for {} against {}",
        ctx.concurrency,
        key,
        ctx.config.api_host()
    );
    let results = join_all((0..ctx.concurrency).map(|_| call())).await;
    let outcome = settle(results);

    if ctx.show_stats {
        let coordinator = ctx.client.coordinator();
        let rows = table::stats_rows(&coordinator.stats(), &coordinator.store().stats());
        eprintln!("{}", table::format_table(&rows));
    }

    match outcome {
        Some(body) => output::print_payload(&body, ctx.format),
        None => Err(Error::NoData(key.to_string())),
    }
}

/// Pick the result to show from a batch of identical calls
fn settle(results: Vec<Option<String>>) -> Option<String> {
    let total = results.len();
    let mut bodies: Vec<String> = results.into_iter().flatten().collect();

    let missing = total - bodies.len();
    if missing > 0 && !bodies.is_empty() {
        warn!("{} of {} calls returned no data", missing, total);
    }

    if bodies.is_empty() {
        None
    } else {
        Some(bodies.swap_remove(0))
    }
}
