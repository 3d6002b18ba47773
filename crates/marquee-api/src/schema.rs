//! Declarative shape descriptions for every TMDB resource the client reads.
//!
//! A [`Schema`] is plain data. [`crate::validate`] walks it against an untyped
//! `serde_json::Value`; nothing here knows about the typed models.

use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String,
    /// Any JSON number
    Number,
    /// A non-negative JSON number with no fractional part
    Integer,
    Boolean,
    /// `null` or the inner schema. Only nullable fields may be `null`.
    Nullable(Box<Schema>),
    Array(Box<Schema>),
    /// Every listed field is required; unlisted fields are ignored
    Object(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
}

impl Schema {
    pub fn nullable(inner: Schema) -> Self {
        Schema::Nullable(Box::new(inner))
    }

    pub fn array(element: Schema) -> Self {
        Schema::Array(Box::new(element))
    }

    pub fn object(fields: impl IntoIterator<Item = (&'static str, Schema)>) -> Self {
        Schema::Object(
            fields
                .into_iter()
                .map(|(name, schema)| Field { name, schema })
                .collect(),
        )
    }

    /// Name used in mismatch reports
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::String => "string",
            Schema::Number => "number",
            Schema::Integer => "integer",
            Schema::Boolean => "boolean",
            Schema::Nullable(inner) => match inner.as_ref() {
                Schema::String => "string or null",
                Schema::Number => "number or null",
                Schema::Integer => "integer or null",
                Schema::Boolean => "boolean or null",
                Schema::Array(_) => "array or null",
                Schema::Object(_) => "object or null",
                Schema::Nullable(_) => "nullable",
            },
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
        }
    }

    pub fn field(&self, name: &str) -> Option<&Schema> {
        match self {
            Schema::Object(fields) => fields.iter().find(|f| f.name == name).map(|f| &f.schema),
            _ => None,
        }
    }

    /// Copy of an object schema without the named fields. Non-objects are returned unchanged.
    pub fn omit(&self, names: &[&str]) -> Schema {
        match self {
            Schema::Object(fields) => Schema::Object(
                fields
                    .iter()
                    .filter(|f| !names.contains(&f.name))
                    .cloned()
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Copy of an object schema with extra fields appended
    pub fn extend(&self, extra: impl IntoIterator<Item = (&'static str, Schema)>) -> Schema {
        match self {
            Schema::Object(fields) => {
                let mut fields = fields.clone();
                fields.extend(extra.into_iter().map(|(name, schema)| Field { name, schema }));
                Schema::Object(fields)
            }
            other => other.clone(),
        }
    }
}

fn paged(item: Schema) -> Schema {
    Schema::object([
        ("page", Schema::Integer),
        ("results", Schema::array(item)),
        ("total_pages", Schema::Integer),
        ("total_results", Schema::Integer),
    ])
}

pub fn movie_summary() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::object([
            ("id", Schema::Integer),
            ("title", Schema::String),
            ("overview", Schema::String),
            ("poster_path", Schema::nullable(Schema::String)),
            ("backdrop_path", Schema::nullable(Schema::String)),
            ("release_date", Schema::String),
            ("vote_average", Schema::Number),
            ("vote_count", Schema::Integer),
            ("genre_ids", Schema::array(Schema::Integer)),
            ("adult", Schema::Boolean),
            ("original_language", Schema::String),
            ("original_title", Schema::String),
            ("popularity", Schema::Number),
            ("video", Schema::Boolean),
        ])
    })
}

pub fn movie_list() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| paged(movie_summary().clone()))
}

pub fn genre() -> Schema {
    Schema::object([("id", Schema::Integer), ("name", Schema::String)])
}

pub fn production_company() -> Schema {
    Schema::object([
        ("id", Schema::Integer),
        ("logo_path", Schema::nullable(Schema::String)),
        ("name", Schema::String),
        ("origin_country", Schema::String),
    ])
}

pub fn production_country() -> Schema {
    Schema::object([("iso_3166_1", Schema::String), ("name", Schema::String)])
}

pub fn spoken_language() -> Schema {
    Schema::object([
        ("english_name", Schema::String),
        ("iso_639_1", Schema::String),
        ("name", Schema::String),
    ])
}

/// Summary fields minus `genre_ids`, plus the detail-only fields
pub fn movie_detail() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        movie_summary().omit(&["genre_ids"]).extend([
            ("runtime", Schema::nullable(Schema::Integer)),
            ("budget", Schema::Integer),
            ("revenue", Schema::Integer),
            ("homepage", Schema::nullable(Schema::String)),
            ("imdb_id", Schema::nullable(Schema::String)),
            ("status", Schema::String),
            ("tagline", Schema::nullable(Schema::String)),
            ("genres", Schema::array(genre())),
            ("production_companies", Schema::array(production_company())),
            ("production_countries", Schema::array(production_country())),
            ("spoken_languages", Schema::array(spoken_language())),
        ])
    })
}

pub fn cast_member() -> Schema {
    Schema::object([
        ("id", Schema::Integer),
        ("name", Schema::String),
        ("character", Schema::String),
        ("profile_path", Schema::nullable(Schema::String)),
        ("order", Schema::Integer),
    ])
}

pub fn crew_member() -> Schema {
    Schema::object([
        ("id", Schema::Integer),
        ("name", Schema::String),
        ("job", Schema::String),
        ("department", Schema::String),
        ("profile_path", Schema::nullable(Schema::String)),
    ])
}

// Credits carry an `id` upstream but it is not required
pub fn credits() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::object([
            ("cast", Schema::array(cast_member())),
            ("crew", Schema::array(crew_member())),
        ])
    })
}

pub fn video() -> Schema {
    Schema::object([
        ("id", Schema::String),
        ("key", Schema::String),
        ("name", Schema::String),
        ("site", Schema::String),
        ("type", Schema::String),
        ("official", Schema::Boolean),
        ("published_at", Schema::String),
    ])
}

pub fn video_list() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| Schema::object([("results", Schema::array(video()))]))
}

pub fn review() -> Schema {
    Schema::object([
        ("id", Schema::String),
        ("author", Schema::String),
        (
            "author_details",
            Schema::object([
                ("name", Schema::String),
                ("username", Schema::String),
                ("avatar_path", Schema::nullable(Schema::String)),
                ("rating", Schema::nullable(Schema::Number)),
            ]),
        ),
        ("content", Schema::String),
        ("created_at", Schema::String),
        ("updated_at", Schema::String),
        ("url", Schema::String),
    ])
}

pub fn review_list() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| paged(review()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_replaces_genre_ids_with_genres() {
        let detail = movie_detail();
        assert!(detail.field("genre_ids").is_none());
        assert!(detail.field("title").is_some());
        assert_eq!(detail.field("genres"), Some(&Schema::array(genre())));
        assert_eq!(detail.field("runtime"), Some(&Schema::nullable(Schema::Integer)));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Schema::Integer.kind(), "integer");
        assert_eq!(Schema::nullable(Schema::String).kind(), "string or null");
        assert_eq!(movie_summary().kind(), "object");
    }

    #[test]
    fn test_omit_on_non_object_is_identity() {
        assert_eq!(Schema::String.omit(&["x"]), Schema::String);
    }
}
