//! Routers: pet CRUD plus the common operational endpoints.

pub mod common;
pub mod crud;

pub use common::{common_routes, common_routes_with_ready};
pub use crud::crud_routes;
