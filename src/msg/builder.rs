use std::borrow::Cow;
use std::convert::TryFrom;
use std::io::Write;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::error::Error;
use crate::msg::codec::CompressionCodec;
use crate::msg::layout::*;
use crate::msg::Message;
use crate::Result;

/// 新しいメッセージを構築するためのビルダーです。
///
/// `build()` はすべてのフィールドをバッファに書き込んだ後に、その内容から CRC32 を計算して先頭のチェックサム
/// フィールドに一度だけ書き戻します。構築されたメッセージは常に `is_valid()` が `true` となります。
#[derive(Debug, Clone)]
pub struct MessageBuilder<'a> {
  source: &'a [u8],
  payload_offset: usize,
  /// `None` の場合は `payload_offset` から `source` の末尾まで。
  payload_size: Option<usize>,
  key: Option<&'a [u8]>,
  attributes: u8,
}

impl<'a> MessageBuilder<'a> {
  /// `source` 全体を payload とし、key なし、圧縮なしのビルダーを作成します。
  pub fn new(source: &'a [u8]) -> MessageBuilder<'a> {
    MessageBuilder { source, payload_offset: 0, payload_size: None, key: None, attributes: 0 }
  }

  /// `None` を指定した場合、メッセージは key を持たない (key length = -1)。
  pub fn key(mut self, key: Option<&'a [u8]>) -> Self {
    self.key = key;
    self
  }

  /// attributes の圧縮コーデックのビットのみを置き換えます。予約ビットはそのまま残ります。
  pub fn codec(mut self, codec: CompressionCodec) -> Self {
    self.attributes = (self.attributes & !COMPRESSION_CODEC_MASK) | (codec.id() & COMPRESSION_CODEC_MASK);
    self
  }

  /// attributes のバイト値をそのまま設定します。
  pub fn attributes(mut self, attributes: u8) -> Self {
    self.attributes = attributes;
    self
  }

  /// payload として使用する `source` 内の範囲を指定します。
  pub fn payload_range(mut self, offset: usize, size: Option<usize>) -> Self {
    self.payload_offset = offset;
    self.payload_size = size;
    self
  }

  pub fn build(&self) -> Result<Message<'static>> {
    let payload = self.payload()?;
    let key = self.key.unwrap_or(&[]);
    let key_size = match self.key {
      Some(key) => to_size_field(key.len(), "key")?,
      None => NULL_KEY_SIZE,
    };
    let payload_size = to_size_field(payload.len(), "payload")?;
    let size = MESSAGE_OVERHEAD
      .checked_add(key.len())
      .and_then(|size| size.checked_add(payload.len()))
      .ok_or_else(|| Error::malformed("total message size overflows"))?;

    let mut buffer = Vec::<u8>::with_capacity(size);
    buffer.write_u32::<BigEndian>(0)?;
    buffer.write_u8(CURRENT_MAGIC_VALUE)?;
    buffer.write_u8(self.attributes)?;
    buffer.write_i32::<BigEndian>(key_size)?;
    buffer.write_all(key)?;
    buffer.write_i32::<BigEndian>(payload_size)?;
    buffer.write_all(payload)?;
    debug_assert_eq!(size, buffer.len());

    let crc = crc32fast::hash(&buffer[MAGIC_OFFSET..]);
    BigEndian::write_u32(&mut buffer[CRC_OFFSET..CRC_OFFSET + CRC_LENGTH], crc);
    log::trace!("message built: size={}, key_size={}, payload_size={}, crc={:#010X}", size, key_size, payload_size, crc);

    Ok(Message { buffer: Cow::Owned(buffer) })
  }

  fn payload(&self) -> Result<&'a [u8]> {
    let source: &'a [u8] = self.source;
    let begin = self.payload_offset;
    let end = match self.payload_size {
      Some(size) => begin.checked_add(size),
      None => Some(source.len()),
    };
    match end {
      Some(end) if begin <= end && end <= source.len() => Ok(&source[begin..end]),
      _ => Err(Error::malformed(format!(
        "payload range out of bounds: offset={}, size={:?}, source length={}",
        begin,
        self.payload_size,
        source.len()
      ))),
    }
  }
}

fn to_size_field(length: usize, field: &str) -> Result<i32> {
  i32::try_from(length).map_err(|_| Error::malformed(format!("too large {}: {} bytes", field, length)))
}
