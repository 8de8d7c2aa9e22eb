pub mod http;

pub use http::HttpCatalogAdapter;
