pub mod frappe;
pub mod payload;
pub mod traits;
