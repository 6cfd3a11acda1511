use crate::error::Error;
use crate::msg::codec::CompressionCodec;

#[test]
fn test_codec_id() {
  // 識別子と相互に変換できる
  for id in 0u8..4 {
    let codec = CompressionCodec::from_id(id).unwrap();
    assert_eq!(id, codec.id());
  }
  assert_eq!(CompressionCodec::NoCompression, CompressionCodec::default());
  assert!(!CompressionCodec::NoCompression.is_compressed());
  assert!(CompressionCodec::Snappy.is_compressed());

  // 未知の識別子はエラー
  assert_eq!(Err(Error::UnknownCodec { id: 4 }), CompressionCodec::from_id(4));
  assert_eq!(Err(Error::UnknownCodec { id: 0xFF }), CompressionCodec::from_id(0xFF));
}

#[test]
fn test_codec_name() {
  for codec in &[
    CompressionCodec::NoCompression,
    CompressionCodec::Gzip,
    CompressionCodec::Snappy,
    CompressionCodec::Lz4,
  ] {
    assert_eq!(Ok(*codec), codec.to_string().parse::<CompressionCodec>());
  }
  assert_eq!(Ok(CompressionCodec::Gzip), " GZip ".parse::<CompressionCodec>());
  assert_eq!(
    Err(Error::UnknownCodecName { name: "zstd".to_string() }),
    "zstd".parse::<CompressionCodec>()
  );
}
