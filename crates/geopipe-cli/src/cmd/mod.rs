pub mod config;
pub mod kinds;
pub mod presets;
pub mod run;
