/// Image sizes the client renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Poster,
    /// Wide
    Backdrop,
    /// Cast photo
    Profile,
}

impl ImageSize {
    pub fn token(&self) -> &'static str {
        match self {
            ImageSize::Poster => "w500",
            ImageSize::Backdrop => "w1280",
            ImageSize::Profile => "w185",
        }
    }
}

/// `<base>/<size><path>`, or `None` when there is no image and a placeholder is needed
pub fn image_url(base: &str, path: Option<&str>, size: ImageSize) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!("{}/{}{}", base.trim_end_matches('/'), size.token(), path))
}
