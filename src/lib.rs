pub mod api;
pub mod archive;
pub mod config;
pub mod feed;
pub mod humanize;
pub mod observability;
pub mod pipeline;
pub mod publication;
