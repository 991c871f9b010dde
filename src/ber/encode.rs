//! BER encoding.
//!
//! Uses a reverse buffer: content is written first, then the length and tag
//! are prepended, so nested constructions never need a second pass.
//! Callers that know the final size up front (see [`super::length`]) can
//! reserve it with [`EncodeBuf::with_capacity`] and avoid reallocation.

use super::length::{
    encode_length, integer_content_len, unsigned32_content_len, unsigned64_content_len,
};
use super::tag;
use bytes::Bytes;

/// Buffer for BER encoding that writes backwards.
pub struct EncodeBuf {
    buf: Vec<u8>,
}

impl EncodeBuf {
    /// Create a new encode buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    /// Create a new encode buffer with specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Push a single byte (prepends to front).
    pub fn push_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Push multiple bytes (prepends to front, reversed).
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    /// Push a BER length encoding.
    pub fn push_length(&mut self, len: usize) {
        let (bytes, count) = encode_length(len);
        self.buf.extend_from_slice(&bytes[..count]);
    }

    /// Push a BER tag.
    pub fn push_tag(&mut self, tag: u8) {
        self.buf.push(tag);
    }

    /// Get the current length of encoded data.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Capacity reserved for the output.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Encode a constructed type (SEQUENCE, PDU, etc).
    ///
    /// Calls the closure to encode contents, then wraps with length and tag.
    /// Because the buffer grows backwards, the closure must push fields in
    /// reverse wire order.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let start_len = self.len();
        f(self);
        let content_len = self.len() - start_len;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    /// Encode a SEQUENCE.
    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// Encode a primitive TLV with arbitrary tag and raw content.
    pub fn push_primitive(&mut self, tag: u8, content: &[u8]) {
        self.push_bytes(content);
        self.push_length(content.len());
        self.push_tag(tag);
    }

    /// Encode an INTEGER.
    pub fn push_integer(&mut self, value: i32) {
        let len = integer_content_len(value);
        self.push_primitive(tag::universal::INTEGER, &value.to_be_bytes()[4 - len..]);
    }

    /// Encode a 64-bit unsigned integer (Counter64).
    pub fn push_integer64(&mut self, value: u64) {
        let len = unsigned64_content_len(value);
        let mut bytes = [0u8; 9];
        bytes[1..].copy_from_slice(&value.to_be_bytes());
        self.push_primitive(tag::application::COUNTER64, &bytes[9 - len..]);
    }

    /// Encode an unsigned 32-bit integer with a specific tag.
    pub fn push_unsigned32(&mut self, tag: u8, value: u32) {
        let len = unsigned32_content_len(value);
        self.push_primitive(tag, &u64::from(value).to_be_bytes()[8 - len..]);
    }

    /// Encode an OCTET STRING.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_primitive(tag::universal::OCTET_STRING, data);
    }

    /// Encode a NULL.
    pub fn push_null(&mut self) {
        self.push_primitive(tag::universal::NULL, &[]);
    }

    /// Encode an OBJECT IDENTIFIER.
    pub fn push_oid(&mut self, oid: &crate::oid::Oid) {
        let ber = oid.to_ber_smallvec();
        self.push_primitive(tag::universal::OBJECT_IDENTIFIER, &ber);
    }

    /// Encode an IP address.
    pub fn push_ip_address(&mut self, addr: [u8; 4]) {
        self.push_primitive(tag::application::IP_ADDRESS, &addr);
    }

    /// Finalize and return the encoded bytes in wire order.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}

impl Default for EncodeBuf {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(f: impl FnOnce(&mut EncodeBuf)) -> Vec<u8> {
        let mut buf = EncodeBuf::new();
        f(&mut buf);
        buf.finish().to_vec()
    }

    #[test]
    fn test_encode_integer() {
        assert_eq!(encoded(|b| b.push_integer(0)), vec![0x02, 0x01, 0x00]);
        assert_eq!(encoded(|b| b.push_integer(127)), vec![0x02, 0x01, 0x7F]);
        assert_eq!(encoded(|b| b.push_integer(128)), vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(encoded(|b| b.push_integer(-1)), vec![0x02, 0x01, 0xFF]);
        assert_eq!(encoded(|b| b.push_integer(-128)), vec![0x02, 0x01, 0x80]);
        assert_eq!(encoded(|b| b.push_integer(-129)), vec![0x02, 0x02, 0xFF, 0x7F]);
        assert_eq!(
            encoded(|b| b.push_integer(i32::MIN)),
            vec![0x02, 0x04, 0x80, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_encode_unsigned32() {
        let tag = tag::application::GAUGE32;
        assert_eq!(encoded(|b| b.push_unsigned32(tag, 0)), vec![tag, 0x01, 0x00]);
        assert_eq!(encoded(|b| b.push_unsigned32(tag, 127)), vec![tag, 0x01, 0x7F]);
        assert_eq!(encoded(|b| b.push_unsigned32(tag, 128)), vec![tag, 0x02, 0x00, 0x80]);
        assert_eq!(encoded(|b| b.push_unsigned32(tag, 256)), vec![tag, 0x02, 0x01, 0x00]);
        assert_eq!(
            encoded(|b| b.push_unsigned32(tag, u32::MAX)),
            vec![tag, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_encode_counter64() {
        assert_eq!(encoded(|b| b.push_integer64(0)), vec![0x46, 0x01, 0x00]);
        assert_eq!(
            encoded(|b| b.push_integer64(u64::MAX)),
            vec![0x46, 0x09, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_encode_null() {
        assert_eq!(encoded(|b| b.push_null()), vec![0x05, 0x00]);
    }

    #[test]
    fn test_encode_octet_string() {
        assert_eq!(
            encoded(|b| b.push_octet_string(b"public")),
            vec![0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c']
        );
    }

    #[test]
    fn test_encode_sequence() {
        let bytes = encoded(|buf| {
            buf.push_sequence(|buf| {
                // Reverse buffer: push in reverse order for forward output
                buf.push_integer(2);
                buf.push_integer(1);
            })
        });
        assert_eq!(bytes, vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02]);
    }

    #[test]
    fn test_long_form_length_header() {
        let data = vec![0xAB; 200];
        let bytes = encoded(|b| b.push_octet_string(&data));
        assert_eq!(&bytes[..3], &[0x04, 0x81, 200]);
        assert_eq!(bytes.len(), 203);
    }

    #[test]
    fn test_with_capacity_is_kept() {
        let buf = EncodeBuf::with_capacity(42);
        assert!(buf.capacity() >= 42);
        assert!(buf.is_empty());
    }
}
