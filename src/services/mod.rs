pub mod blogger;
pub mod images;
