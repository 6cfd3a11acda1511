use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::Error;
use crate::msg::layout::{COMPRESSION_CODEC_MASK, NO_COMPRESSION_CODEC};
use crate::Result;

#[cfg(test)]
mod test;

/// メッセージの payload に適用された圧縮方式を表す列挙型です。このクレートは識別子を読み書きするのみで、
/// 実際の圧縮/展開は行いません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
  NoCompression,
  Gzip,
  Snappy,
  Lz4,
}

impl CompressionCodec {
  /// attributes に格納される 2 ビットの識別子からコーデックを参照します。
  pub fn from_id(id: u8) -> Result<CompressionCodec> {
    match id {
      NO_COMPRESSION_CODEC => Ok(CompressionCodec::NoCompression),
      1 => Ok(CompressionCodec::Gzip),
      2 => Ok(CompressionCodec::Snappy),
      3 => Ok(CompressionCodec::Lz4),
      unexpected => Err(Error::UnknownCodec { id: unexpected }),
    }
  }

  pub fn id(&self) -> u8 {
    let id = match self {
      CompressionCodec::NoCompression => NO_COMPRESSION_CODEC,
      CompressionCodec::Gzip => 1,
      CompressionCodec::Snappy => 2,
      CompressionCodec::Lz4 => 3,
    };
    debug_assert!(id & !COMPRESSION_CODEC_MASK == 0);
    id
  }

  /// 設定ファイルなどで使用されるコーデック名。
  pub fn name(&self) -> &'static str {
    match self {
      CompressionCodec::NoCompression => "none",
      CompressionCodec::Gzip => "gzip",
      CompressionCodec::Snappy => "snappy",
      CompressionCodec::Lz4 => "lz4",
    }
  }

  pub fn is_compressed(&self) -> bool {
    *self != CompressionCodec::NoCompression
  }
}

impl Default for CompressionCodec {
  fn default() -> Self {
    CompressionCodec::NoCompression
  }
}

impl Display for CompressionCodec {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for CompressionCodec {
  type Err = Error;

  fn from_str(name: &str) -> Result<CompressionCodec> {
    match name.trim().to_ascii_lowercase().as_str() {
      "none" => Ok(CompressionCodec::NoCompression),
      "gzip" => Ok(CompressionCodec::Gzip),
      "snappy" => Ok(CompressionCodec::Snappy),
      "lz4" => Ok(CompressionCodec::Lz4),
      _ => Err(Error::UnknownCodecName { name: name.to_string() }),
    }
  }
}
