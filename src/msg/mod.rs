use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::io::Write;

use byteorder::{BigEndian, ByteOrder};

use crate::error::Error;
use crate::Result;

pub use builder::MessageBuilder;
use codec::CompressionCodec;
use layout::*;

mod builder;
pub mod codec;
pub mod layout;


/// チェックサムで自己検証可能な 1 レコード分のバイナリを表すビューです。
///
/// 大きなバッファ (バッチなど) の一部を借用してラップすることも、新しく構築したバッファを所有することもできます。
/// 構築後にバイト列が変更されることはありません。`key()` や `payload()` はコピーを行わず、このメッセージが参照
/// するバッファを借用します。
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Message<'a> {
  buffer: Cow<'a, [u8]>,
}

impl Message<'static> {
  /// key なし、圧縮なしのメッセージを構築します。
  pub fn new(payload: &[u8]) -> Result<Message<'static>> {
    MessageBuilder::new(payload).build()
  }

  pub fn with_key(key: &[u8], payload: &[u8]) -> Result<Message<'static>> {
    MessageBuilder::new(payload).key(Some(key)).build()
  }

  pub fn with_codec(key: Option<&[u8]>, payload: &[u8], codec: CompressionCodec) -> Result<Message<'static>> {
    MessageBuilder::new(payload).key(key).codec(codec).build()
  }

  /// `bytes` の `offset` から `size` バイトを payload としてメッセージを構築します。`size` が `None` の場合は
  /// `bytes` の末尾までを payload とします。範囲が `bytes` に収まらない場合は `MalformedRecord` となります。
  pub fn with_range(
    bytes: &[u8],
    key: Option<&[u8]>,
    codec: CompressionCodec,
    offset: usize,
    size: Option<usize>,
  ) -> Result<Message<'static>> {
    MessageBuilder::new(bytes).key(key).codec(codec).payload_range(offset, size).build()
  }

  /// 所有するバッファをメッセージとしてラップします。
  pub fn from_vec(buffer: Vec<u8>) -> Result<Message<'static>> {
    verify_structure(&buffer)?;
    Ok(Message { buffer: Cow::Owned(buffer) })
  }
}

impl<'a> Message<'a> {
  /// 既存のバッファ領域をコピーせずにメッセージとしてラップします。
  ///
  /// 領域の構造 (key と payload の長さが領域に収まっていること) のみを検査し、チェックサムは検証しません。
  /// 破損したメッセージであっても内容を参照できるようにするためで、内容を信頼する前に `ensure_valid()` を呼び出す
  /// 必要があります。
  pub fn from_slice(buffer: &'a [u8]) -> Result<Message<'a>> {
    verify_structure(buffer)?;
    Ok(Message { buffer: Cow::Borrowed(buffer) })
  }

  /// 先頭に格納されているチェックサム。
  pub fn checksum(&self) -> u32 {
    BigEndian::read_u32(&self.buffer[CRC_OFFSET..CRC_OFFSET + CRC_LENGTH])
  }

  /// magic から末尾までのバイト列に対する CRC32 を計算します。
  pub fn compute_checksum(&self) -> u32 {
    crc32fast::hash(&self.buffer[MAGIC_OFFSET..])
  }

  pub fn is_valid(&self) -> bool {
    self.checksum() == self.compute_checksum()
  }

  /// チェックサムが一致しない場合に `CorruptRecord` を返します。
  pub fn ensure_valid(&self) -> Result<()> {
    let stored = self.checksum();
    let computed = self.compute_checksum();
    if stored == computed {
      Ok(())
    } else {
      log::warn!("corrupt message detected: stored crc={:#010X}, computed crc={:#010X}", stored, computed);
      Err(Error::CorruptRecord { stored, computed })
    }
  }

  /// メッセージ全体のバイト長。
  pub fn size(&self) -> usize {
    self.buffer.len()
  }

  /// key length フィールドの値。key を持たない場合は -1。
  pub fn key_size(&self) -> i32 {
    BigEndian::read_i32(&self.buffer[KEY_SIZE_OFFSET..KEY_SIZE_OFFSET + KEY_SIZE_LENGTH])
  }

  pub fn has_key(&self) -> bool {
    self.key_size() >= 0
  }

  /// payload length フィールドの位置。key を持つ場合のみ key の長さ分だけ後ろにずれる。
  pub fn payload_size_offset(&self) -> usize {
    KEY_OFFSET + self.key_size().max(0) as usize
  }

  pub fn payload_size(&self) -> i32 {
    let offset = self.payload_size_offset();
    BigEndian::read_i32(&self.buffer[offset..offset + VALUE_SIZE_LENGTH])
  }

  pub fn magic(&self) -> u8 {
    self.buffer[MAGIC_OFFSET]
  }

  /// attributes のバイト値。予約ビットも含めてそのまま返します。
  pub fn attributes(&self) -> u8 {
    self.buffer[ATTRIBUTES_OFFSET]
  }

  pub fn compression_codec(&self) -> Result<CompressionCodec> {
    CompressionCodec::from_id(self.attributes() & COMPRESSION_CODEC_MASK)
  }

  /// key のバイト列を借用します。key を持たない場合は `None`。
  pub fn key(&self) -> Option<&[u8]> {
    let size = self.key_size();
    if size < 0 {
      None
    } else {
      Some(&self.buffer[KEY_OFFSET..KEY_OFFSET + size as usize])
    }
  }

  pub fn payload(&self) -> &[u8] {
    let begin = self.payload_size_offset() + VALUE_SIZE_LENGTH;
    &self.buffer[begin..begin + self.payload_size() as usize]
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.buffer
  }

  /// 借用しているバッファを複製して所有するメッセージに変換します。
  pub fn into_owned(self) -> Message<'static> {
    Message { buffer: Cow::Owned(self.buffer.into_owned()) }
  }

  pub fn into_vec(self) -> Vec<u8> {
    self.buffer.into_owned()
  }

  pub fn write_to<W: Write>(&self, buf: &mut W) -> Result<()> {
    buf.write_all(&self.buffer).map_err(Error::from)
  }
}

impl<'a> AsRef<[u8]> for Message<'a> {
  fn as_ref(&self) -> &[u8] {
    &self.buffer
  }
}

impl<'a> Debug for Message<'a> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "Message(magic = {}, attributes = {}, crc = {:#010X}, key = {:?}, payload = {:?})",
      self.magic(),
      self.attributes(),
      self.checksum(),
      self.key(),
      self.payload()
    )
  }
}

/// 各フィールドのオフセットがバッファ内に収まり、key と payload でちょうど末尾に達していることを検査します。
/// これを通過したバッファに対してはアクセサが範囲外を参照することはありません。
fn verify_structure(buffer: &[u8]) -> Result<()> {
  fn malformed(buffer: &[u8], message: String) -> Result<()> {
    log::debug!("malformed message ({} bytes): {}", buffer.len(), message);
    Err(Error::malformed(message))
  }

  if buffer.len() < MESSAGE_OVERHEAD {
    return malformed(buffer, format!("too short: {} bytes, min={}", buffer.len(), MESSAGE_OVERHEAD));
  }
  let key_size = BigEndian::read_i32(&buffer[KEY_SIZE_OFFSET..KEY_SIZE_OFFSET + KEY_SIZE_LENGTH]);
  if key_size < NULL_KEY_SIZE {
    return malformed(buffer, format!("illegal key length: {}", key_size));
  }
  let payload_size_offset = KEY_OFFSET + key_size.max(0) as usize;
  if payload_size_offset + VALUE_SIZE_LENGTH > buffer.len() {
    return malformed(buffer, format!("key length {} exceeds message size {}", key_size, buffer.len()));
  }
  let payload_size =
    BigEndian::read_i32(&buffer[payload_size_offset..payload_size_offset + VALUE_SIZE_LENGTH]);
  if payload_size < 0 {
    return malformed(buffer, format!("illegal payload length: {}", payload_size));
  }
  let end = payload_size_offset + VALUE_SIZE_LENGTH + payload_size as usize;
  if end != buffer.len() {
    return malformed(buffer, format!("payload length {} does not match message size {}", payload_size, buffer.len()));
  }
  Ok(())
}
