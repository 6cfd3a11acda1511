use thiserror::Error as ThisError;

#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum Error {
  /// 格納されているチェックサムと再計算したチェックサムが一致しない。
  #[error("message is corrupt: stored crc = {stored:#010X}, computed crc = {computed:#010X}")]
  CorruptRecord { stored: u32, computed: u32 },

  #[error("unknown compression codec: {id}")]
  UnknownCodec { id: u8 },
  #[error("unknown compression codec name: {name:?}")]
  UnknownCodecName { name: String },

  #[error("malformed message: {message}")]
  MalformedRecord { message: String },

  #[error("underlying I/O layer error: {message}")]
  Io { kind: std::io::ErrorKind, message: String },
}

impl Error {
  pub(crate) fn malformed<S: Into<String>>(message: S) -> Error {
    Error::MalformedRecord { message: message.into() }
  }
}

impl From<std::io::Error> for Error {
  fn from(err: std::io::Error) -> Error {
    Error::Io { kind: err.kind(), message: err.to_string() }
  }
}
