pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{NewProduct, Product, ProductChanges};
pub use repository::{ProductRepository, SeaOrmProductRepository};
pub use service::ProductService;
