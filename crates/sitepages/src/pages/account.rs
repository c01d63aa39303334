//! Account area pages

/// The account favourites page shows the same content as `/favourites`
pub use super::favourites::favourites;

// vim: ts=4
