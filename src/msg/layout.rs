//! メッセージのバイナリレイアウトを表す定数です。マルチバイト整数はすべてビッグエンディアンで格納されます。
//!
//! ```text
//! offset 0   : u32   crc32 (offset 4 から末尾まで)
//! offset 4   : u8    magic (フォーマットバージョン)
//! offset 5   : u8    attributes (bit 0-1: 圧縮コーデック)
//! offset 6   : i32   key length (-1 は key なし)
//! offset 10  : bytes key
//! offset 10+K: i32   payload length
//! offset 14+K: bytes payload
//! ```

pub const CRC_OFFSET: usize = 0;
pub const CRC_LENGTH: usize = 4;
pub const MAGIC_OFFSET: usize = CRC_OFFSET + CRC_LENGTH;
pub const MAGIC_LENGTH: usize = 1;
pub const ATTRIBUTES_OFFSET: usize = MAGIC_OFFSET + MAGIC_LENGTH;
pub const ATTRIBUTES_LENGTH: usize = 1;
pub const KEY_SIZE_OFFSET: usize = ATTRIBUTES_OFFSET + ATTRIBUTES_LENGTH;
pub const KEY_SIZE_LENGTH: usize = 4;
pub const KEY_OFFSET: usize = KEY_SIZE_OFFSET + KEY_SIZE_LENGTH;
pub const VALUE_SIZE_LENGTH: usize = 4;

/// key と payload の中身を除いたメッセージのバイト長です。最小のメッセージサイズでもあります。
pub const MESSAGE_OVERHEAD: usize = KEY_OFFSET + VALUE_SIZE_LENGTH;

/// attributes のうち圧縮コーデックを表すビットです。
pub const COMPRESSION_CODEC_MASK: u8 = 0x03;

pub const NO_COMPRESSION_CODEC: u8 = 0;

/// 現在のフォーマットバージョン。
pub const CURRENT_MAGIC_VALUE: u8 = 2;

/// key を持たないことを示す key length の値。
pub const NULL_KEY_SIZE: i32 = -1;
