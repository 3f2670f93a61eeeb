pub mod fs_ops;
pub mod paths;
pub mod random;
