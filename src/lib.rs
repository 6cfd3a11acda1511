pub mod error;
pub mod msg;


pub use error::Error;
pub use msg::codec::CompressionCodec;
pub use msg::{Message, MessageBuilder};

pub type Result<T> = std::result::Result<T, error::Error>;
