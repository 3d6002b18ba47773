use marquee_models::WatchlistItem;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    DateAdded,
    Title,
    ReleaseDate,
    Rating,
}

impl SortKey {
    /// Newest-first for `dateAdded`, ascending for everything else
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortKey::DateAdded => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::DateAdded => "Date Added",
            SortKey::Title => "Title",
            SortKey::ReleaseDate => "Release Date",
            SortKey::Rating => "Rating",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::DateAdded => "dateAdded",
            SortKey::Title => "title",
            SortKey::ReleaseDate => "releaseDate",
            SortKey::Rating => "rating",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "dateadded" | "added" => Ok(SortKey::DateAdded),
            "title" => Ok(SortKey::Title),
            "releasedate" | "release" => Ok(SortKey::ReleaseDate),
            "rating" => Ok(SortKey::Rating),
            _ => Err(format!(
                "Invalid sort key: {}. Use 'dateAdded', 'title', 'releaseDate', or 'rating'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}. Use 'asc' or 'desc'", s)),
        }
    }
}

/// Current sort preference of a watchlist view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub sort_by: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            sort_by: SortKey::DateAdded,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Resolve the next preference.
    ///
    /// An explicit direction always wins. Otherwise re-selecting the current key
    /// flips the direction and selecting a new key uses that key's default.
    pub fn next(&self, sort_by: SortKey, explicit: Option<SortDirection>) -> SortState {
        let direction = match explicit {
            Some(direction) => direction,
            None if sort_by == self.sort_by => self.direction.flipped(),
            None => sort_by.default_direction(),
        };
        SortState { sort_by, direction }
    }
}

/// Ascending comparison of two items under `key`
pub fn compare(a: &WatchlistItem, b: &WatchlistItem, key: SortKey) -> Ordering {
    match key {
        // Unparsable timestamps are None and order first, like release dates
        SortKey::DateAdded => a.date_added.timestamp().cmp(&b.date_added.timestamp()),
        SortKey::Title => compare_titles(&a.movie.title, &b.movie.title),
        // Unparsable dates are None, which orders before any date
        SortKey::ReleaseDate => a
            .movie
            .parsed_release_date()
            .cmp(&b.movie.parsed_release_date()),
        SortKey::Rating => a.movie.vote_average.total_cmp(&b.movie.vote_average),
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// A sorted copy of `items`. Ties keep their relative order in both directions.
pub fn sorted_view(items: &[WatchlistItem], key: SortKey, direction: SortDirection) -> Vec<WatchlistItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}
