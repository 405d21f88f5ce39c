pub mod config;
pub mod continent;
pub mod feed;
pub mod flatten;
pub mod normalize;
pub mod pipeline;
pub mod table;
pub mod views;

/// Album value for performed songs with no catalog match.
pub const NON_ALBUM: &str = "-Other-";

/// Application name for XDG paths
pub const APP_NAME: &str = "setstats";
