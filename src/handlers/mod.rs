pub mod form_handler;
pub mod list_handler;
pub mod submit_handler;
