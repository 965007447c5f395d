pub mod build;
pub mod install;
pub mod update;
