pub mod card_service;
pub mod chart_service;
pub mod fetch_service;
pub mod filter_service;
pub mod format_service;
pub mod search_service;
pub mod text_render_service;
pub mod transform_service;
