pub mod fingerprint;
pub mod queries;
pub mod types;

pub use fingerprint::fingerprint;
pub use queries::*;
pub use types::*;
