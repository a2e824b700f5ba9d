#![allow(dead_code)]

pub mod jetan;
pub mod rest_server;
pub mod service;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{Context, Error, anyhow};
        pub type Result<T> = anyhow::Result<T, Error>;
        pub use itertools::Itertools;

        pub use std::collections::{BTreeSet, HashMap};
    }
}

pub mod prelude {
    pub use super::jetan::prelude::*;
    pub use super::rest_server::*;
    pub use super::service::*;
    pub use super::utils::prelude::*;
}
