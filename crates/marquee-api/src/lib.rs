pub mod decode;
pub mod error;
pub mod image;
pub mod schema;
pub mod tmdb;
pub mod transport;
pub mod validate;

#[cfg(test)]
mod fixtures;

pub use decode::{decode_credits, decode_search_results, decode_strict};
pub use error::{ApiError, ApiResult, SchemaMismatch};
pub use image::{image_url, ImageSize};
pub use schema::Schema;
pub use tmdb::{TmdbClient, TmdbSettings};
pub use tmdb::client::{DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use validate::validate;
