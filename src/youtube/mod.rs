pub mod client;
pub mod types;
pub mod url;

pub use client::YouTubeClient;
pub use types::{ApiStatus, Comment, VideoInfo, VideoSearchResult};
pub use url::extract_video_id;
