//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **image_host**: reqwest uploads to a Cloudinary-style image host
//! - **analytics**: reqwest captures to a PostHog-style analytics service
//!
//! Adapters are thin translators between domain types and wire or row
//! representations. They contain no business logic.

pub mod analytics;
pub mod image_host;
pub mod persistence;
