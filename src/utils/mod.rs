pub mod date_arg;
pub mod shift_cache;
