pub mod app;
pub mod cli;
pub mod comparison;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod demand;
pub mod efficiency;
pub mod emissions;
pub mod format;
pub mod gas;
pub mod grid_feed;
pub mod hvac;
pub mod i18n;
pub mod input;
pub mod load;
pub mod quantity;
pub mod series;
pub mod ui_cli;
pub mod units;
