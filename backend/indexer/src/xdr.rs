//! Minimal reader for the base64 XDR `ScVal`s the RPC returns as event
//! topics and values.
//!
//! Only the shapes the registry publishes are understood: integers,
//! symbols, strings, addresses, and the maps `#[contracttype]` structs
//! encode to. Anything else decodes to `None`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Value};

const SCV_BOOL: u32 = 0;
const SCV_VOID: u32 = 1;
const SCV_U32: u32 = 3;
const SCV_I32: u32 = 4;
const SCV_U64: u32 = 5;
const SCV_I64: u32 = 6;
const SCV_TIMEPOINT: u32 = 7;
const SCV_DURATION: u32 = 8;
const SCV_U128: u32 = 9;
const SCV_I128: u32 = 10;
const SCV_BYTES: u32 = 13;
const SCV_STRING: u32 = 14;
const SCV_SYMBOL: u32 = 15;
const SCV_VEC: u32 = 16;
const SCV_MAP: u32 = 17;
const SCV_ADDRESS: u32 = 18;

const SC_ADDRESS_ACCOUNT: u32 = 0;
const SC_ADDRESS_CONTRACT: u32 = 1;
const PUBLIC_KEY_ED25519: u32 = 0;

// Strkey version bytes.
const STRKEY_ACCOUNT: u8 = 6 << 3;
const STRKEY_CONTRACT: u8 = 2 << 3;

/// Nesting limit for vecs and maps.
const MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScVal {
    Bool(bool),
    Void,
    U64(u64),
    I64(i64),
    U128(u128),
    I128(i128),
    Bytes(Vec<u8>),
    String(String),
    Symbol(String),
    Vec(Vec<ScVal>),
    Map(Vec<(ScVal, ScVal)>),
    /// Strkey form (`G...` account or `C...` contract).
    Address(String),
}

impl ScVal {
    /// Decode a base64 XDR value. The whole buffer must be consumed.
    pub fn from_base64(raw: &str) -> Option<Self> {
        let bytes = STANDARD.decode(raw).ok()?;
        let mut reader = Reader {
            bytes: &bytes,
            pos: 0,
        };
        let val = reader.scval(0)?;
        (reader.pos == bytes.len()).then_some(val)
    }

    /// JSON view: maps with symbol keys become objects, 64-bit and larger
    /// integers become decimal strings, addresses become strkeys.
    pub fn to_json(&self) -> Value {
        match self {
            ScVal::Bool(b) => Value::Bool(*b),
            ScVal::Void => Value::Null,
            ScVal::U64(n) => Value::String(n.to_string()),
            ScVal::I64(n) => Value::String(n.to_string()),
            ScVal::U128(n) => Value::String(n.to_string()),
            ScVal::I128(n) => Value::String(n.to_string()),
            ScVal::Bytes(b) => Value::String(hex::encode(b)),
            ScVal::String(s) | ScVal::Symbol(s) | ScVal::Address(s) => Value::String(s.clone()),
            ScVal::Vec(items) => Value::Array(items.iter().map(ScVal::to_json).collect()),
            ScVal::Map(entries) => {
                let mut map = Map::new();
                for (key, val) in entries {
                    let key = match key {
                        ScVal::Symbol(s) | ScVal::String(s) => s.clone(),
                        other => other.to_json().to_string(),
                    };
                    map.insert(key, val.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.take(N)?.try_into().ok()
    }

    fn u32(&mut self) -> Option<u32> {
        Some(u32::from_be_bytes(self.array()?))
    }

    fn u64(&mut self) -> Option<u64> {
        Some(u64::from_be_bytes(self.array()?))
    }

    /// Variable-length opaque: length word, data, zero padding to 4 bytes.
    fn opaque(&mut self) -> Option<&'a [u8]> {
        let len = self.u32()? as usize;
        let data = self.take(len)?;
        self.take((4 - len % 4) % 4)?;
        Some(data)
    }

    fn text(&mut self) -> Option<String> {
        String::from_utf8(self.opaque()?.to_vec()).ok()
    }

    /// XDR optional: a presence word, then the value.
    fn present(&mut self) -> Option<bool> {
        match self.u32()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }

    fn scval(&mut self, depth: usize) -> Option<ScVal> {
        if depth > MAX_DEPTH {
            return None;
        }
        let val = match self.u32()? {
            SCV_BOOL => ScVal::Bool(self.u32()? != 0),
            SCV_VOID => ScVal::Void,
            SCV_U32 => ScVal::U64(u64::from(self.u32()?)),
            SCV_I32 => ScVal::I64(i64::from(self.u32()? as i32)),
            SCV_U64 | SCV_TIMEPOINT | SCV_DURATION => ScVal::U64(self.u64()?),
            SCV_I64 => ScVal::I64(self.u64()? as i64),
            SCV_U128 => {
                let hi = u128::from(self.u64()?);
                let lo = u128::from(self.u64()?);
                ScVal::U128((hi << 64) | lo)
            }
            SCV_I128 => {
                let hi = i128::from(self.u64()? as i64);
                let lo = i128::from(self.u64()?);
                ScVal::I128((hi << 64) | lo)
            }
            SCV_BYTES => ScVal::Bytes(self.opaque()?.to_vec()),
            SCV_STRING => ScVal::String(self.text()?),
            SCV_SYMBOL => ScVal::Symbol(self.text()?),
            SCV_VEC => {
                let mut items = Vec::new();
                if self.present()? {
                    for _ in 0..self.u32()? {
                        items.push(self.scval(depth + 1)?);
                    }
                }
                ScVal::Vec(items)
            }
            SCV_MAP => {
                let mut entries = Vec::new();
                if self.present()? {
                    for _ in 0..self.u32()? {
                        let key = self.scval(depth + 1)?;
                        let val = self.scval(depth + 1)?;
                        entries.push((key, val));
                    }
                }
                ScVal::Map(entries)
            }
            SCV_ADDRESS => ScVal::Address(self.address()?),
            _ => return None,
        };
        Some(val)
    }

    fn address(&mut self) -> Option<String> {
        match self.u32()? {
            SC_ADDRESS_ACCOUNT => {
                if self.u32()? != PUBLIC_KEY_ED25519 {
                    return None;
                }
                Some(strkey(STRKEY_ACCOUNT, &self.array::<32>()?))
            }
            SC_ADDRESS_CONTRACT => Some(strkey(STRKEY_CONTRACT, &self.array::<32>()?)),
            _ => None,
        }
    }
}

/// Stellar strkey: base32 of version byte, payload and CRC16-XModem
/// (little-endian), unpadded.
pub fn strkey(version: u8, payload: &[u8; 32]) -> String {
    let mut raw = Vec::with_capacity(35);
    raw.push(version);
    raw.extend_from_slice(payload);
    let crc = crc16_xmodem(&raw);
    raw.extend_from_slice(&crc.to_le_bytes());
    base32(&raw)
}

fn crc16_xmodem(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |crc, byte| {
        (0..8).fold(crc ^ (u16::from(*byte) << 8), |crc, _| {
            if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            }
        })
    })
}

fn base32(data: &[u8]) -> String {
    const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let (mut buffer, mut bits) = (0u32, 0u32);
    for byte in data {
        buffer = (buffer << 8) | u32::from(*byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 31) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((buffer << (5 - bits)) & 31) as usize] as char);
    }
    out
}
