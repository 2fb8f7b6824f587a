pub mod server;

pub use server::{build_state, run, serve};
