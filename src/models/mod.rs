pub mod depth_policy;
pub mod history;
pub mod outline;
