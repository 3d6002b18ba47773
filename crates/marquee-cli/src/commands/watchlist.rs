use super::progress::{is_interactive, Spinner};
use super::{prompts, year_or_dash, AppContext};
use crate::output::{new_table, Output};
use crate::WatchlistCommands;
use color_eyre::Result;
use comfy_table::Cell;
use marquee_api::ApiError;
use marquee_core::{FileStorage, SortDirection, SortKey, SortState, ToggleOutcome, WatchlistStore};
use marquee_models::{MovieSummary, WatchlistItem};
use serde_json::json;

pub async fn run_watchlist(cmd: WatchlistCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut store = ctx.watchlist().await;

    match cmd {
        WatchlistCommands::List { sort, direction } => list(&store, sort, direction, output),
        WatchlistCommands::Add { id } => {
            if let Some(item) = store.get(id) {
                output.info(format!("\"{}\" is already in your watchlist", item.title()));
                return Ok(());
            }
            let movie = lookup(&ctx, id, output).await?;
            let title = movie.title.clone();
            store.add(movie).await;
            output.success(format!("Added \"{}\" to your watchlist", title));
            Ok(())
        }
        WatchlistCommands::Remove { id } => {
            let title = store.get(id).map(|item| item.title().to_string());
            if store.remove(id).await {
                output.success(format!(
                    "Removed \"{}\" from your watchlist",
                    title.unwrap_or_else(|| id.to_string())
                ));
            } else {
                output.warn(format!("Movie {} is not in your watchlist", id));
            }
            Ok(())
        }
        WatchlistCommands::Toggle { id } => {
            let movie = match store.get(id) {
                Some(item) => item.movie.clone(),
                None => lookup(&ctx, id, output).await?,
            };
            let title = movie.title.clone();
            match store.toggle(movie).await {
                ToggleOutcome::Added => output.success(format!("Added \"{}\" to your watchlist", title)),
                ToggleOutcome::Removed => {
                    output.success(format!("Removed \"{}\" from your watchlist", title))
                }
            }
            Ok(())
        }
        WatchlistCommands::Clear { yes } => clear(&mut store, yes, output).await,
        WatchlistCommands::Sort { key, direction } => {
            let state = store.update_sort(key, direction).await;
            output.json(&json!({ "sortBy": state.sort_by, "direction": state.direction }));
            output.success(format!("Watchlist sorted by {} ({})", state.sort_by.label(), state.direction));
            Ok(())
        }
        WatchlistCommands::Stats => {
            let stats = store.stats();
            output.json(&json!({ "totalMovies": stats.total_movies }));
            if output.is_human() {
                output.info(format!("Total movies: {}", stats.total_movies));
            }
            Ok(())
        }
    }
}

/// Fetch details and project them onto the stored summary shape
async fn lookup(ctx: &AppContext, id: u64, output: &Output) -> Result<MovieSummary> {
    let client = ctx.client()?;
    let spinner = Spinner::start(format!("Looking up movie {}...", id), output);
    let result = client.movie_details(id).await;
    spinner.finish();

    match result {
        Ok(detail) => Ok(detail.to_summary()),
        Err(ApiError::Transport { status: 404 }) => Err(color_eyre::eyre::eyre!("Movie {} not found", id)),
        Err(e) => Err(color_eyre::eyre::eyre!("Failed to look up movie {}: {}", id, e)),
    }
}

/// One-off view: an explicit key or direction is not saved as the preference
fn view_state(current: SortState, sort: Option<SortKey>, direction: Option<SortDirection>) -> SortState {
    let sort_by = sort.unwrap_or(current.sort_by);
    let direction = direction.unwrap_or(if sort_by == current.sort_by {
        current.direction
    } else {
        sort_by.default_direction()
    });
    SortState { sort_by, direction }
}

fn list(
    store: &WatchlistStore<FileStorage>,
    sort: Option<SortKey>,
    direction: Option<SortDirection>,
    output: &Output,
) -> Result<()> {
    let state = view_state(store.sort_state(), sort, direction);
    let items = store.sorted_view(state.sort_by, state.direction);

    output.json(&json!({
        "sortBy": state.sort_by,
        "direction": state.direction,
        "totalMovies": items.len(),
        "items": &items,
    }));

    if !output.is_human() {
        return Ok(());
    }

    if items.is_empty() {
        output.info("Your watchlist is empty. Add movies with 'marquee watchlist add <ID>'.");
        return Ok(());
    }

    output.table(&items_table(&items));
    output.info(format!(
        "{} movies · sorted by {} ({})",
        items.len(),
        state.sort_by.label(),
        state.direction
    ));
    Ok(())
}

fn items_table(items: &[WatchlistItem]) -> comfy_table::Table {
    let mut table = new_table();
    table.set_header(vec!["#", "ID", "Title", "Year", "Rating", "Added"]);
    for (position, item) in items.iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(item.id()),
            Cell::new(item.title()),
            Cell::new(year_or_dash(item.movie.release_year())),
            Cell::new(format!("{:.1}", item.movie.vote_average)),
            Cell::new(item.date_added.display_date()),
        ]);
    }
    table
}

async fn clear(store: &mut WatchlistStore<FileStorage>, yes: bool, output: &Output) -> Result<()> {
    if store.is_empty() {
        output.info("Your watchlist is already empty");
        return Ok(());
    }

    if !yes {
        if !is_interactive() {
            return Err(color_eyre::eyre::eyre!(
                "Refusing to clear the watchlist without confirmation; pass --yes"
            ));
        }
        let prompt = format!("Remove all {} movies from your watchlist?", store.len());
        if !prompts::prompt_yes_no(&prompt, false)? {
            output.info("Cancelled");
            return Ok(());
        }
    }

    let removed = store.clear().await;
    output.success(format!("Removed {} movies from your watchlist", removed));
    Ok(())
}
