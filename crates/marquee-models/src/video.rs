use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: String,
    /// Identifier on the hosting platform
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    pub official: bool,
    pub published_at: String,
}

impl Video {
    /// Only YouTube trailers can be linked to
    pub fn is_trailer(&self) -> bool {
        self.video_type == "Trailer" && self.site == "YouTube"
    }

    pub fn watch_url(&self) -> Option<String> {
        if self.site == "YouTube" {
            Some(format!("https://www.youtube.com/watch?v={}", self.key))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VideoList {
    pub results: Vec<Video>,
}

impl VideoList {
    pub fn trailer(&self) -> Option<&Video> {
        self.results.iter().find(|v| v.is_trailer())
    }
}
