pub mod loader;
pub mod screener;
