pub mod crypto;
pub mod html;
pub mod time;
pub mod token;
