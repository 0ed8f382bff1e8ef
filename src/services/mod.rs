pub mod field_codec;
pub mod harvest;
pub mod invoice_store;
pub mod listing;
pub mod render;
