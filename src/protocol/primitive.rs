use crate::error::{Error, Result};
use simdutf8::basic::from_utf8;

/// Read 1-byte integer
pub fn read_int_1(data: &[u8]) -> Result<(u8, &[u8])> {
    match data.split_first() {
        Some((&byte, rest)) => Ok((byte, rest)),
        None => Err(Error::UnexpectedEof),
    }
}

/// Read unsigned LEB128 integer
///
/// At most 10 bytes are consumed; an encoding that does not fit in `u64` is rejected.
pub fn read_varint(data: &[u8]) -> Result<(u64, &[u8])> {
    let mut value = 0u64;
    let mut rest = data;
    for i in 0..10 {
        let (byte, next) = read_int_1(rest)?;
        rest = next;
        let payload = u64::from(byte & 0x7F);
        if i == 9 && payload > 1 {
            return Err(Error::InvalidPacket);
        }
        value |= payload << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, rest));
        }
    }
    Err(Error::InvalidPacket)
}

/// Read fixed-length string
pub fn read_string_fix(data: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    if data.len() < len {
        return Err(Error::UnexpectedEof);
    }
    Ok(data.split_at(len))
}

/// Read varint-length-prefixed string
pub fn read_string_varint(data: &[u8]) -> Result<(&[u8], &[u8])> {
    let (len, rest) = read_varint(data)?;
    let len = usize::try_from(len).map_err(|_| Error::UnexpectedEof)?;
    read_string_fix(rest, len)
}

/// Read varint-length-prefixed string and validate it as UTF-8
pub fn read_str_varint(data: &[u8]) -> Result<(&str, &[u8])> {
    let (bytes, rest) = read_string_varint(data)?;
    Ok((from_utf8(bytes)?, rest))
}

/// Write unsigned LEB128 integer
pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Write varint-length-prefixed string
pub fn write_string_varint(out: &mut Vec<u8>, s: &str) {
    write_varint(out, s.len() as u64);
    out.extend_from_slice(s.as_bytes());
}
