pub mod board;
pub mod cfs;
pub mod core;
pub mod curriculum;
pub mod periods;
pub mod scales;
pub mod settings;
pub mod subjects;
