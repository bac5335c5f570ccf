pub mod errors;
pub mod routes;
pub mod session;
pub mod startup;
pub mod views;

pub use startup::run;
