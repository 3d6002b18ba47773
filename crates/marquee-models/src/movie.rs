use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A movie as it appears in search results and in the watchlist.
///
/// Field names follow the upstream API so that a stored watchlist record and
/// an API payload share one JSON shape. Missing fields fall back to their
/// defaults when deserializing; strict presence checks happen in the
/// validator before a payload ever reaches this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: u64,
    /// Upstream order is preserved, duplicates included
    pub genre_ids: Vec<u64>,
    pub adult: bool,
    pub original_language: String,
    pub original_title: String,
    pub popularity: f64,
    pub video: bool,
}

impl MovieSummary {
    /// Release date parsed as `YYYY-MM-DD`, if it is one
    pub fn parsed_release_date(&self) -> Option<NaiveDate> {
        parse_release_date(&self.release_date)
    }

    pub fn release_year(&self) -> Option<i32> {
        self.parsed_release_date().map(|d| d.year())
    }
}

pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionCompany {
    pub id: u64,
    pub logo_path: Option<String>,
    pub name: String,
    pub origin_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpokenLanguage {
    pub english_name: String,
    pub iso_639_1: String,
    pub name: String,
}

/// Full detail record for a single movie.
///
/// `budget` and `revenue` use `0` for "unknown".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: u64,
    pub adult: bool,
    pub original_language: String,
    pub original_title: String,
    pub popularity: f64,
    pub video: bool,
    /// Minutes
    pub runtime: Option<u32>,
    pub budget: u64,
    pub revenue: u64,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub status: String,
    pub tagline: Option<String>,
    pub genres: Vec<Genre>,
    pub production_companies: Vec<ProductionCompany>,
    pub production_countries: Vec<ProductionCountry>,
    pub spoken_languages: Vec<SpokenLanguage>,
}

impl MovieDetail {
    /// Project onto the summary shape, deriving `genre_ids` from `genres`
    pub fn to_summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            overview: self.overview.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
            adult: self.adult,
            original_language: self.original_language.clone(),
            original_title: self.original_title.clone(),
            popularity: self.popularity,
            video: self.video,
        }
    }

    /// Runtime as `"2h 16m"`, or `"Unknown"` when absent or zero
    pub fn formatted_runtime(&self) -> String {
        match self.runtime {
            Some(minutes) if minutes > 0 => format!("{}h {}m", minutes / 60, minutes % 60),
            _ => "Unknown".to_string(),
        }
    }

    pub fn release_year(&self) -> Option<i32> {
        parse_release_date(&self.release_date).map(|d| d.year())
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

/// Whole-dollar amount with thousands separators; `0` renders as `"Unknown"`
pub fn format_currency(amount: u64) -> String {
    if amount == 0 {
        return "Unknown".to_string();
    }
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}", grouped)
}
