//! Wire types shared between the inventory counter backend and its clients.

pub mod model;
pub mod requests;
