#![doc = "shopping-list-core: core logic library for shopping-list."]

//! This crate contains the cart aggregation engine, the shopping list renderers
//! (plain text and paginated PDF) and the orchestration that ties a cart source to
//! a downloadable artifact. Delivery (HTTP, files on disk) lives with the caller.
//!
//! # Usage
//! Add this as a dependency wherever a shopping list has to be produced from a cart,
//! then call [`export::export`] with a [`contract::CartSource`] implementation.

pub mod aggregate;
pub mod cart;
pub mod config;
pub mod contract;
pub mod export;
pub mod render;
