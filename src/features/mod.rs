pub mod cases;
pub mod error;
pub mod health;
