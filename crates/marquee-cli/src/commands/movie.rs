use super::progress::Spinner;
use super::{truncate, year_or_dash, AppContext};
use crate::output::{new_table, Output};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use marquee_api::{ApiError, TmdbClient};
use marquee_models::{format_currency, Credits, MovieDetail, Page, Review};
use serde_json::json;

const TOP_CAST: usize = 8;
const REVIEW_PREVIEW_CHARS: usize = 300;

pub async fn run_movie(movie_id: u64, reviews_page: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let client = ctx.client()?;
    let store = ctx.watchlist().await;

    let spinner = Spinner::start(format!("Loading movie {}...", movie_id), output);
    let (details, credits, videos, reviews) = futures::join!(
        client.movie_details(movie_id),
        client.movie_credits(movie_id),
        client.movie_videos(movie_id),
        client.movie_reviews(movie_id, reviews_page.max(1)),
    );
    spinner.finish();

    let details = details.map_err(|e| {
        tracing::error!("Loading details for movie {} failed: {}", movie_id, e);
        match e {
            ApiError::Transport { status: 404 } => color_eyre::eyre::eyre!("Movie {} not found", movie_id),
            e => color_eyre::eyre::eyre!("Failed to load movie {}: {}", movie_id, e),
        }
    })?;

    // Secondary sections degrade to "unavailable" on their own
    let credits = secondary("credits", credits, output);
    let videos = secondary("videos", videos, output);
    let reviews = secondary("reviews", reviews, output);

    if credits.as_ref().is_some_and(|c| c.recovered) {
        output.warn("Some cast or crew entries were malformed and have been skipped");
    }

    let in_watchlist = store.contains(movie_id);
    let director = credits.as_ref().and_then(|c| c.director());
    let top_cast = credits.as_ref().map(|c| c.top_cast(TOP_CAST)).unwrap_or_default();
    let trailer_url = videos.as_ref().and_then(|v| v.trailer()).and_then(|t| t.watch_url());

    output.json(&json!({
        "movie": &details,
        "poster_url": client.poster_url(details.poster_path.as_deref()),
        "backdrop_url": client.backdrop_url(details.backdrop_path.as_deref()),
        "runtime": details.formatted_runtime(),
        "director": director.map(|d| &d.name),
        "cast": top_cast.iter().map(|member| json!({
            "member": member,
            "profile_url": client.profile_url(member.profile_path.as_deref()),
        })).collect::<Vec<_>>(),
        "trailer_url": trailer_url,
        "reviews": reviews.as_ref().map(|page| json!({
            "page": page.page,
            "total_pages": page.total_pages,
            "total_results": page.total_results,
            "results": &page.results,
        })),
        "in_watchlist": in_watchlist,
    }));

    if !output.is_human() {
        return Ok(());
    }

    print_details(
        &details,
        &client,
        director.map(|d| d.name.as_str()),
        trailer_url.as_deref(),
        in_watchlist,
        output,
    );
    print_cast(credits.as_ref(), TOP_CAST, output);
    print_reviews(reviews.as_ref(), movie_id, output);
    Ok(())
}

fn secondary<T>(section: &str, result: Result<T, ApiError>, output: &Output) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Loading {} failed: {}", section, e);
            output.warn(format!("Could not load {}: {}", section, e));
            None
        }
    }
}

fn print_details(
    details: &MovieDetail,
    client: &TmdbClient,
    director: Option<&str>,
    trailer_url: Option<&str>,
    in_watchlist: bool,
    output: &Output,
) {
    output.heading(format!("{} ({})", details.title, year_or_dash(details.release_year())));
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        output.info(format!("\"{}\"", tagline));
    }
    if !details.overview.is_empty() {
        output.info(&details.overview);
    }

    let mut table = new_table();
    let mut row = |label: &str, value: String| {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    };
    row("Rating", format!("{:.1}/10 ({} votes)", details.vote_average, details.vote_count));
    row("Runtime", details.formatted_runtime());
    row(
        "Release Date",
        if details.release_date.is_empty() { "Unknown".to_string() } else { details.release_date.clone() },
    );
    row("Status", details.status.clone());
    row("Genres", details.genre_names().join(", "));
    row("Director", director.unwrap_or("Unknown").to_string());
    row("Budget", format_currency(details.budget));
    row("Revenue", format_currency(details.revenue));
    if let Some(url) = trailer_url {
        row("Trailer", url.to_string());
    }
    if let Some(url) = client.poster_url(details.poster_path.as_deref()) {
        row("Poster", url);
    }
    if let Some(homepage) = details.homepage.as_deref().filter(|h| !h.is_empty()) {
        row("Homepage", homepage.to_string());
    }
    if let Some(imdb_id) = details.imdb_id.as_deref().filter(|id| !id.is_empty()) {
        row("IMDb", format!("https://www.imdb.com/title/{}", imdb_id));
    }
    row("Watchlist", if in_watchlist { "★ Saved".to_string() } else { "Not saved".to_string() });
    output.table(&table);
}

fn print_cast(credits: Option<&Credits>, n: usize, output: &Output) {
    output.heading("Top Cast");
    let Some(credits) = credits else {
        output.info("Cast unavailable");
        return;
    };
    let cast = credits.top_cast(n);
    if cast.is_empty() {
        output.info("No cast information");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["Name", "Character"]);
    for member in cast {
        table.add_row(vec![Cell::new(&member.name), Cell::new(&member.character).fg(Color::DarkGrey)]);
    }
    output.table(&table);
}

fn print_reviews(reviews: Option<&Page<Review>>, movie_id: u64, output: &Output) {
    output.heading("Reviews");
    let Some(page) = reviews else {
        output.info("Reviews unavailable");
        return;
    };
    if page.is_empty() {
        output.info("No reviews yet");
        return;
    }

    for review in &page.results {
        let rating = review
            .author_details
            .rating
            .map(|r| format!(" · {:.0}/10", r))
            .unwrap_or_default();
        let date = review.created_at.get(..10).unwrap_or(&review.created_at);
        output.info(format!("{}{} ({})", review.author, rating, date));
        output.info(format!("  {}", truncate(&review.content.replace('\n', " "), REVIEW_PREVIEW_CHARS)));
    }
    if let Some(next) = page.next_page() {
        output.info(format!(
            "Page {} of {} · more: marquee movie {} --reviews-page {}",
            page.page, page.total_pages, movie_id, next
        ));
    }
}

