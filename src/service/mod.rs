//! CrudService: the generic handler pattern, shared by every collection.

mod crud;
pub mod secret;
mod validation;
pub use crud::CrudService;
pub use validation::RequestValidator;
