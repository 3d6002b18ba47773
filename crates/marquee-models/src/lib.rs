pub mod credits;
pub mod movie;
pub mod page;
pub mod review;
pub mod video;
pub mod watchlist;

pub use credits::{CastMember, Credits, CrewMember};
pub use movie::{
    format_currency, parse_release_date, Genre, MovieDetail, MovieSummary, ProductionCompany,
    ProductionCountry, SpokenLanguage,
};
pub use page::Page;
pub use review::{Review, ReviewAuthorDetails};
pub use video::{Video, VideoList};
pub use watchlist::{DateAdded, WatchlistItem};
