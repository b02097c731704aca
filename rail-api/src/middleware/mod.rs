pub mod pacing;

pub use pacing::pacing_middleware;
