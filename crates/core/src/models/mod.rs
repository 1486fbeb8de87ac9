pub mod card;
pub mod chart;
pub mod filters;
pub mod item;
pub mod settings;
pub mod state;
