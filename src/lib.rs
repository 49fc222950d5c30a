//! Web page listing the running Docker containers, with their compose
//! stack, image, addresses, published ports and quick access links.

pub mod config;
pub mod container;
mod docker;
pub mod errors;
mod http_client;
mod hyper_client;
pub mod image;
pub mod page;
pub mod projector;
pub mod server;
pub mod snapshot;

pub use config::Config;
pub use docker::{Docker, Protocol, DEFAULT_DOCKER_HOST};
pub use projector::{DisplayRow, Projector};
pub use snapshot::{ContainerSnapshot, ContainerSource};
