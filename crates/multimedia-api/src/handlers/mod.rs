pub mod assets;
pub mod page_options;
