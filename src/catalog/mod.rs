pub mod catalog;

pub use catalog::{tag_genre, Catalog, CatalogError, MovieAttributes};
