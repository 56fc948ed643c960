mod plugin;
mod markdown;
mod raw_html;
mod linkify;
mod external_links;
mod highlight;

pub use plugin::*;
pub use markdown::*;
pub use raw_html::*;
pub use linkify::*;
pub use external_links::*;
pub use highlight::*;
