pub mod store_key;
pub mod waitlist_entry;
pub mod write_item;
