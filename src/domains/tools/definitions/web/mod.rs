//! Web tools.

pub mod basic_auth;
pub mod slugify_string;
pub mod url_codec;

pub use basic_auth::BasicAuthGeneratorTool;
pub use slugify_string::SlugifyStringTool;
pub use url_codec::UrlEncoderDecoderTool;
