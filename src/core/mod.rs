//! Core business logic - framework-agnostic menu, ordering and back-office operations.
//!
//! Nothing in here knows about Discord. Database-backed operations take a
//! `&DatabaseConnection`; the catalog, offer, order and rendering modules are pure.

/// Staff roles and permission checks
pub mod access;
/// Menu tree, filtering and view models
pub mod catalog;
/// Customer directory
pub mod customer;
/// Trailing-edge debouncer for async tasks
pub mod debounce;
/// Menu administration (categories, sub-categories, items)
pub mod menu_admin;
/// Special offer evaluation
pub mod offer;
/// Order basket and checkout handoff
pub mod order;
/// Phone number normalization and masking
pub mod phone;
/// Discord message rendering
pub mod render;
/// SMS templates, audiences and queue
pub mod sms;
/// Item sizes and price keys
pub mod variant;
