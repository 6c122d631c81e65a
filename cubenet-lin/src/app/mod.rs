mod lin_app;

pub use lin_app::{AppError, LinApp, LinOperation};
