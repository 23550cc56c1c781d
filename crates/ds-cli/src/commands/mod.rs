pub mod baseline;
pub mod capture;
pub mod compare;
pub mod config;
pub mod dispatch;
pub mod periods;
pub mod sectors;
pub mod shared;
