use serde_json::{json, Value};

pub fn movie_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": "Overview",
        "poster_path": "/poster.jpg",
        "backdrop_path": null,
        "release_date": "1999-03-31",
        "vote_average": 8.2,
        "vote_count": 24000,
        "genre_ids": [28, 878],
        "adult": false,
        "original_language": "en",
        "original_title": title,
        "popularity": 71.3,
        "video": false
    })
}

pub fn search_json(results: Vec<Value>) -> Value {
    let total = results.len();
    json!({
        "page": 1,
        "results": results,
        "total_pages": 1,
        "total_results": total
    })
}

pub fn cast_json(id: u64, name: &str, order: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "character": format!("Role {}", order),
        "profile_path": null,
        "order": order,
        "known_for_department": "Acting"
    })
}

pub fn crew_json(id: u64, name: &str, job: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "job": job,
        "department": "Directing",
        "profile_path": "/crew.jpg"
    })
}

pub fn detail_json(id: u64, title: &str) -> Value {
    let mut raw = movie_json(id, title);
    let object = raw.as_object_mut().expect("movie fixture is an object");
    object.remove("genre_ids");
    let extra = json!({
        "runtime": 136,
        "budget": 63000000,
        "revenue": 463517383,
        "homepage": "https://www.warnerbros.com/movies/matrix",
        "imdb_id": "tt0133093",
        "status": "Released",
        "tagline": "Welcome to the Real World.",
        "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
        "production_companies": [{"id": 79, "logo_path": null, "name": "Village Roadshow Pictures", "origin_country": "US"}],
        "production_countries": [{"iso_3166_1": "US", "name": "United States of America"}],
        "spoken_languages": [{"english_name": "English", "iso_639_1": "en", "name": "English"}]
    });
    if let Value::Object(fields) = extra {
        object.extend(fields);
    }
    raw
}
