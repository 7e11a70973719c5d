pub mod health;
pub mod security;
