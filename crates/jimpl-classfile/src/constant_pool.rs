use crate::error::{Error, Result};
use crate::reader::Reader;

/// The subset of the constant pool the parser resolves: Utf8 and Class
/// entries. Everything else is retained as an opaque placeholder so indices
/// stay valid.
#[derive(Debug)]
enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    Other(&'static str),
    /// Second slot of a long/double entry (JVMS 4.4.5).
    Unusable,
}

#[derive(Debug)]
pub(crate) struct ConstantPool {
    // Index 0 is unused; stored as `Unusable` to keep indexing direct.
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    let bytes = reader.read_bytes(len)?;
                    entries.push(Constant::Utf8(decode_modified_utf8(bytes)?));
                }
                3 | 4 => {
                    reader.skip(4)?;
                    entries.push(Constant::Other("integer/float"));
                }
                5 | 6 => {
                    reader.skip(8)?;
                    entries.push(Constant::Other("long/double"));
                    entries.push(Constant::Unusable);
                }
                7 => {
                    let name_index = reader.read_u2()?;
                    entries.push(Constant::Class { name_index });
                }
                8 | 16 | 19 | 20 => {
                    reader.skip(2)?;
                    entries.push(Constant::Other("string/method-type/module/package"));
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    entries.push(Constant::Other("ref/name-and-type/dynamic"));
                }
                15 => {
                    reader.skip(3)?;
                    entries.push(Constant::Other("method-handle"));
                }
                other => return Err(Error::InvalidConstantPoolTag(other)),
            }
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant> {
        self.entries
            .get(index as usize)
            .ok_or(Error::InvalidConstantPoolIndex(index))
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Utf8(s) => Ok(s),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Utf8",
                found: constant_kind(other),
            }),
        }
    }

    /// Resolve a `Class` entry to its internal (slash-separated) name.
    pub(crate) fn get_class_name(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            Constant::Class { name_index } => Ok(self.get_utf8(*name_index)?.to_string()),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Class",
                found: constant_kind(other),
            }),
        }
    }
}

fn constant_kind(constant: &Constant) -> &'static str {
    match constant {
        Constant::Utf8(_) => "Utf8",
        Constant::Class { .. } => "Class",
        Constant::Other(kind) => kind,
        Constant::Unusable => "unusable",
    }
}

/// Decode JVM modified UTF-8 (JVMS 4.4.7): no embedded NUL bytes, supplementary
/// characters encoded as surrogate pairs of 3-byte sequences.
fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0usize;

    while i < bytes.len() {
        let a = bytes[i];
        if a & 0x80 == 0 {
            if a == 0 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push(u16::from(a));
            i += 1;
        } else if a & 0xE0 == 0xC0 {
            let b = *bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)?;
            if b & 0xC0 != 0x80 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push((u16::from(a & 0x1F) << 6) | u16::from(b & 0x3F));
            i += 2;
        } else if a & 0xF0 == 0xE0 {
            let b = *bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)?;
            let c = *bytes.get(i + 2).ok_or(Error::InvalidModifiedUtf8)?;
            if b & 0xC0 != 0x80 || c & 0xC0 != 0x80 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push((u16::from(a & 0x0F) << 12) | (u16::from(b & 0x3F) << 6) | u16::from(c & 0x3F));
            i += 3;
        } else {
            return Err(Error::InvalidModifiedUtf8);
        }
    }

    for decoded in char::decode_utf16(units.into_iter()) {
        match decoded {
            Ok(c) => out.push(c),
            Err(_) => return Err(Error::InvalidModifiedUtf8),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::decode_modified_utf8;

    #[test]
    fn decodes_ascii_and_bmp() {
        assert_eq!(decode_modified_utf8(b"java/lang/Object").unwrap(), "java/lang/Object");
        // U+00E9 (é) as 2-byte sequence.
        assert_eq!(decode_modified_utf8(&[0xC3, 0xA9]).unwrap(), "\u{e9}");
    }

    #[test]
    fn decodes_supplementary_surrogate_pair() {
        // U+1F600 encoded as CESU-8 surrogate pair D83D DE00.
        let bytes = [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80];
        assert_eq!(decode_modified_utf8(&bytes).unwrap(), "\u{1f600}");
    }

    #[test]
    fn rejects_embedded_nul() {
        assert!(decode_modified_utf8(&[0x41, 0x00]).is_err());
    }
}
