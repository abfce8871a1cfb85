//! Binary encoding of the authentication claim carried inside a password.
//!
//! The format is a tag-length-value record: each field is prefixed with a
//! varint tag of `field_number << 3 | wire_type`, using wire type 0 (varint)
//! for integers and 2 (length-delimited) for byte strings and sub-records.
//! Extras are emitted as one sub-record per pair, in lexicographic key
//! order, so a given logical claim always encodes to the same bytes.
//! Decoders skip fields they do not know, which keeps old and new password
//! revisions mutually parseable; in particular, claims without a protocol
//! field decode with `protocol = None`.

use crate::foundation::{Result, XidError};
use std::collections::BTreeMap;

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LEN: u8 = 2;
const WIRE_FIXED32: u8 = 5;

const FIELD_EXPIRY: u64 = 1;
const FIELD_EXTRA: u64 = 2;
const FIELD_SIGNATURE: u64 = 3;
const FIELD_PROTOCOL: u64 = 4;

const ENTRY_KEY: u64 = 1;
const ENTRY_VALUE: u64 = 2;

/// Protocol that the signed credentials apply to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Protocol {
    XidGsp,
    DelegationContract,
}

impl Protocol {
    fn to_wire(self) -> u64 {
        match self {
            Self::XidGsp => 0,
            Self::DelegationContract => 1,
        }
    }

    fn from_wire(value: u64) -> Result<Self> {
        match value {
            0 => Ok(Self::XidGsp),
            1 => Ok(Self::DelegationContract),
            _ => Err(XidError::MalformedCredential),
        }
    }
}

/// The claim data of a credential, without the username/application context.
///
/// All fields are optional; an empty claim encodes to zero bytes.  The
/// distinction between an absent field and a present zero/empty value is
/// preserved across encode/decode.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthClaim {
    pub expiry: Option<u64>,
    pub extra: BTreeMap<String, String>,
    pub signature: Option<Vec<u8>>,
    pub protocol: Option<Protocol>,
}

impl AuthClaim {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some(expiry) = self.expiry {
            put_tag(&mut out, FIELD_EXPIRY, WIRE_VARINT);
            put_varint(&mut out, expiry);
        }
        for (key, value) in &self.extra {
            let mut entry = Vec::new();
            put_tag(&mut entry, ENTRY_KEY, WIRE_LEN);
            put_varint(&mut entry, key.len() as u64);
            entry.extend_from_slice(key.as_bytes());
            put_tag(&mut entry, ENTRY_VALUE, WIRE_LEN);
            put_varint(&mut entry, value.len() as u64);
            entry.extend_from_slice(value.as_bytes());

            put_tag(&mut out, FIELD_EXTRA, WIRE_LEN);
            put_varint(&mut out, entry.len() as u64);
            out.extend_from_slice(&entry);
        }
        if let Some(signature) = &self.signature {
            put_tag(&mut out, FIELD_SIGNATURE, WIRE_LEN);
            put_varint(&mut out, signature.len() as u64);
            out.extend_from_slice(signature);
        }
        if let Some(protocol) = self.protocol {
            put_tag(&mut out, FIELD_PROTOCOL, WIRE_VARINT);
            put_varint(&mut out, protocol.to_wire());
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let mut claim = Self::default();
        while !reader.is_empty() {
            let tag = reader.read_varint()?;
            let field = tag >> 3;
            let wire = (tag & 0x07) as u8;
            match (field, wire) {
                (FIELD_EXPIRY, WIRE_VARINT) => claim.expiry = Some(reader.read_varint()?),
                (FIELD_EXTRA, WIRE_LEN) => {
                    let entry = reader.read_len_delimited()?;
                    let (key, value) = decode_extra_entry(entry)?;
                    claim.extra.insert(key, value);
                }
                (FIELD_SIGNATURE, WIRE_LEN) => claim.signature = Some(reader.read_len_delimited()?.to_vec()),
                (FIELD_PROTOCOL, WIRE_VARINT) => claim.protocol = Some(Protocol::from_wire(reader.read_varint()?)?),
                _ => reader.skip(wire)?,
            }
        }
        Ok(claim)
    }
}

fn decode_extra_entry(bytes: &[u8]) -> Result<(String, String)> {
    let mut reader = Reader::new(bytes);
    let mut key = String::new();
    let mut value = String::new();
    while !reader.is_empty() {
        let tag = reader.read_varint()?;
        let field = tag >> 3;
        let wire = (tag & 0x07) as u8;
        match (field, wire) {
            (ENTRY_KEY, WIRE_LEN) => key = decode_utf8(reader.read_len_delimited()?)?,
            (ENTRY_VALUE, WIRE_LEN) => value = decode_utf8(reader.read_len_delimited()?)?,
            _ => reader.skip(wire)?,
        }
    }
    Ok((key, value))
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| XidError::MalformedCredential)
}

fn put_tag(out: &mut Vec<u8>, field: u64, wire: u8) {
    put_varint(out, field << 3 | wire as u64);
}

fn put_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn read_varint(&mut self) -> Result<u64> {
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = *self.buf.get(self.pos).ok_or(XidError::MalformedCredential)?;
            self.pos += 1;
            if shift == 63 && byte > 1 {
                return Err(XidError::MalformedCredential);
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            if shift > 63 {
                return Err(XidError::MalformedCredential);
            }
        }
    }

    fn read_len_delimited(&mut self) -> Result<&'a [u8]> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| XidError::MalformedCredential)?;
        let end = self.pos.checked_add(len).ok_or(XidError::MalformedCredential)?;
        if end > self.buf.len() {
            return Err(XidError::MalformedCredential);
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, wire: u8) -> Result<()> {
        match wire {
            WIRE_VARINT => {
                self.read_varint()?;
            }
            WIRE_FIXED64 => self.advance(8)?,
            WIRE_LEN => {
                self.read_len_delimited()?;
            }
            WIRE_FIXED32 => self.advance(4)?,
            _ => return Err(XidError::MalformedCredential),
        }
        Ok(())
    }

    fn advance(&mut self, by: usize) -> Result<()> {
        let end = self.pos.checked_add(by).ok_or(XidError::MalformedCredential)?;
        if end > self.buf.len() {
            return Err(XidError::MalformedCredential);
        }
        self.pos = end;
        Ok(())
    }
}
