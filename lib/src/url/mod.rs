mod validate;
mod find;

pub use validate::is_url_char;
pub use find::*;
