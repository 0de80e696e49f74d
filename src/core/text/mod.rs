pub mod text_catalog;

pub use text_catalog::TextCatalog;
