mod database {
    pub mod actions;
    pub mod error;
    pub mod form;
    pub mod ingest;
    pub mod schema;
}
mod recommendation {
    pub mod deck;
    pub mod gesture;
    pub mod session;
    pub mod steps;
}
mod client {
    pub mod autocomplete;
    pub mod source;
}
mod server {
    pub mod handlers;
    pub mod routes;
}
mod config;
mod constants;

mod cache {
    pub mod cache;
}

pub use cache::cache::*;
pub use client::{autocomplete::*, source::*};
pub use config::*;
pub use constants::*;
pub use database::*;
pub use recommendation::{deck::*, gesture::*, session::*, steps::*};
pub use server::routes::*;
