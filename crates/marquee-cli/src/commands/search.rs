use super::progress::Spinner;
use super::{year_or_dash, AppContext};
use crate::output::{new_table, Output};
use color_eyre::Result;
use comfy_table::{Cell, Color};
use serde_json::json;

pub async fn run_search(query: String, page: u32, output: &Output) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(color_eyre::eyre::eyre!("Search query cannot be empty"));
    }
    if page == 0 {
        return Err(color_eyre::eyre::eyre!("Page numbers start at 1"));
    }

    let ctx = AppContext::load()?;
    let client = ctx.client()?;
    let store = ctx.watchlist().await;

    let spinner = Spinner::start(format!("Searching for \"{}\"...", query), output);
    let result = client.search_movies(query, page).await;
    spinner.finish();

    let results = result.map_err(|e| {
        tracing::error!("Search for {:?} failed: {}", query, e);
        color_eyre::eyre::eyre!("Search failed: {}", e)
    })?;

    if results.recovered {
        output.warn("Some results were malformed and have been skipped");
    }

    output.json(&json!({
        "query": query,
        "page": results.page,
        "total_pages": results.total_pages,
        "total_results": results.total_results,
        "recovered": results.recovered,
        "results": results.results.iter().map(|movie| json!({
            "movie": movie,
            "poster_url": client.poster_url(movie.poster_path.as_deref()),
            "in_watchlist": store.contains(movie.id),
        })).collect::<Vec<_>>(),
    }));

    if !output.is_human() {
        return Ok(());
    }

    if results.is_empty() {
        output.info(format!("No movies found for \"{}\"", query));
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["ID", "Title", "Year", "Rating", "Poster", ""]);
    for movie in &results.results {
        let marker = if store.contains(movie.id) {
            Cell::new("★").fg(Color::Yellow)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(movie.id),
            Cell::new(&movie.title),
            Cell::new(year_or_dash(movie.release_year())),
            Cell::new(format!("{:.1}", movie.vote_average)),
            Cell::new(
                client
                    .poster_url(movie.poster_path.as_deref())
                    .unwrap_or_else(|| "—".to_string()),
            ),
            marker,
        ]);
    }
    output.table(&table);

    let mut footer = format!(
        "Page {} of {} ({} results)",
        results.page, results.total_pages, results.total_results
    );
    if let Some(next) = results.next_page() {
        footer.push_str(&format!(" · next: marquee search \"{}\" --page {}", query, next));
    }
    output.info(footer);
    Ok(())
}
