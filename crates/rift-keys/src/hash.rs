//! Canonical byte encoding and hashing of identity feeds.

use rift_types::AttrValue;
use xxhash_rust::xxh3::Xxh3;

// Variant tags for the value encoding. Every field is length-prefixed or
// fixed-width, so no two distinct feeds share a byte encoding.
const TAG_ABSENT: u8 = 0x00;
const TAG_INT: u8 = 0x01;
const TAG_TEXT: u8 = 0x02;
const TAG_FLAG: u8 = 0x03;
const TAG_TEXT_SET: u8 = 0x04;

/// Streaming XXH3-64 over the canonical identity feed: the entity tag, then
/// each contributing attribute as `name, value` in descriptor order.
///
/// Attribute names are part of the feed so that two identity sets holding
/// the same value under different names (say `id` vs `account_id`) hash
/// apart. Absent values encode as their own tag: an instance whose
/// discriminator is unknown hashes differently from one where it is known.
pub(crate) struct IdentityHasher {
    state: Xxh3,
}

impl IdentityHasher {
    pub(crate) fn new(entity: &str) -> Self {
        let mut hasher = IdentityHasher { state: Xxh3::new() };
        hasher.write_str(entity);
        hasher
    }

    pub(crate) fn attr(&mut self, name: &str, value: Option<&AttrValue>) {
        self.write_str(name);
        match value {
            None => self.state.update(&[TAG_ABSENT]),
            Some(AttrValue::Int(v)) => {
                self.state.update(&[TAG_INT]);
                self.state.update(&v.to_be_bytes());
            }
            Some(AttrValue::Text(v)) => {
                self.state.update(&[TAG_TEXT]);
                self.write_str(v);
            }
            Some(AttrValue::Flag(v)) => {
                self.state.update(&[TAG_FLAG, *v as u8]);
            }
            Some(AttrValue::TextSet(v)) => {
                self.state.update(&[TAG_TEXT_SET]);
                self.state.update(&(v.len() as u64).to_be_bytes());
                for item in v {
                    self.write_str(item);
                }
            }
        }
    }

    pub(crate) fn finish(self) -> u64 {
        self.state.digest()
    }

    fn write_str(&mut self, value: &str) {
        self.state.update(&(value.len() as u64).to_be_bytes());
        self.state.update(value.as_bytes());
    }
}
