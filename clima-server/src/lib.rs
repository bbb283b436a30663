pub mod state;
pub mod web;
