//! Useful macros for implementing new chain types

#[macro_export]
/// Serde support that goes through `ByteFormat`: values are written as hex of their wire
macro_rules! impl_hex_serde {
    ($item:ty) => {
        impl $crate::serde::Serialize for $item {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                let s = $crate::ser::ByteFormat::serialize_hex(self)
                    .map_err(|e| <S::Error as $crate::serde::ser::Error>::custom(e.to_string()))?;
                serializer.serialize_str(&s)
            }
        }

        impl<'de> $crate::serde::Deserialize<'de> for $item {
            fn deserialize<D>(deserializer: D) -> Result<$item, D::Error>
            where
                D: $crate::serde::Deserializer<'de>,
            {
                let s: String = $crate::serde::Deserialize::deserialize(deserializer)?;
                <$item as $crate::ser::ByteFormat>::deserialize_hex(&s)
                    .map_err(|e| $crate::serde::de::Error::custom(e.to_string()))
            }
        }
    };
}

#[macro_export]
/// Declare a newtype over `Vec<u8>` whose wire form is a compact-int length followed by the
/// bytes.
macro_rules! wrap_prefixed_byte_vector {
    (
        $(#[$outer:meta])*
        $wrapper_name:ident
    ) => {
        $(#[$outer])*
        #[derive(Clone, Debug, Eq, PartialEq, Default, Hash, PartialOrd, Ord)]
        pub struct $wrapper_name(Vec<u8>);

        impl $crate::ser::ByteFormat for $wrapper_name {
            type Error = $crate::ser::SerError;

            fn serialized_length(&self) -> usize {
                self.len() + self.len_prefix() as usize
            }

            fn read_from<R>(reader: &mut R, _limit: usize) -> Result<Self, Self::Error>
            where
                R: std::io::Read,
            {
                Ok(Self::read_prefix_bytes(reader)?.into())
            }

            fn write_to<W>(&self, writer: &mut W) -> Result<usize, Self::Error>
            where
                W: std::io::Write,
            {
                Self::write_prefix_bytes(writer, &self.0)
            }
        }

        $crate::impl_hex_serde!($wrapper_name);

        impl std::convert::AsRef<[u8]> for $wrapper_name {
            fn as_ref(&self) -> &[u8] {
                &self.0[..]
            }
        }

        impl $wrapper_name {
            /// Wrap `v`
            pub fn new(v: Vec<u8>) -> Self {
                Self(v)
            }

            /// The empty value
            pub fn null() -> Self {
                Self(vec![])
            }

            /// The wrapped bytes, without the length prefix
            pub fn items(&self) -> &[u8] {
                &self.0
            }

            /// Byte count, not including the prefix
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// True when there are no bytes
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Size of the compact-int length prefix this value encodes with
            pub fn len_prefix(&self) -> u8 {
                $crate::ser::prefix_byte_len(self.len() as u64)
            }
        }

        impl From<&[u8]> for $wrapper_name {
            fn from(v: &[u8]) -> Self {
                Self(v.to_vec())
            }
        }

        impl From<Vec<u8>> for $wrapper_name {
            fn from(v: Vec<u8>) -> Self {
                Self(v)
            }
        }

        impl std::ops::Index<usize> for $wrapper_name {
            type Output = u8;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl std::ops::Index<std::ops::Range<usize>> for $wrapper_name {
            type Output = [u8];

            fn index(&self, range: std::ops::Range<usize>) -> &[u8] {
                &self.0[range]
            }
        }
    };
}

#[macro_export]
/// Make a new marked digest wrapping a `Hash256Digest`.
macro_rules! mark_hash256 {
    (
        $(#[$outer:meta])*
        $hash_name:ident
    ) => {
        $(#[$outer])*
        #[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $hash_name(pub $crate::hashes::Hash256Digest);

        impl $hash_name {
            /// Deserialize from BE hex, the format used by block explorers
            pub fn from_be_hex(be: &str) -> $crate::ser::SerResult<Self> {
                let digest = <Self as $crate::ser::ByteFormat>::deserialize_hex(be)?;
                Ok($crate::hashes::MarkedDigest::reversed(&digest))
            }

            /// Convert to BE hex, the format used by block explorers
            pub fn to_be_hex(&self) -> String {
                $crate::hex::encode($crate::hashes::MarkedDigest::reversed(self).0)
            }
        }

        impl From<$crate::hashes::Hash256Digest> for $hash_name {
            fn from(h: $crate::hashes::Hash256Digest) -> Self {
                Self(h)
            }
        }

        impl AsRef<[u8; 32]> for $hash_name {
            fn as_ref(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl $crate::ser::ByteFormat for $hash_name {
            type Error = $crate::ser::SerError;

            fn serialized_length(&self) -> usize {
                32
            }

            fn read_from<R>(reader: &mut R, _limit: usize) -> $crate::ser::SerResult<Self>
            where
                R: std::io::Read,
                Self: std::marker::Sized,
            {
                let mut buf = $crate::hashes::Hash256Digest::default();
                reader.read_exact(&mut buf)?;
                Ok(Self(buf))
            }

            fn write_to<W>(&self, writer: &mut W) -> $crate::ser::SerResult<usize>
            where
                W: std::io::Write,
            {
                writer.write_all(&self.0)?;
                Ok(32)
            }
        }

        impl $crate::hashes::MarkedDigest for $hash_name {
            type Digest = $crate::hashes::Hash256Digest;

            fn new(hash: $crate::hashes::Hash256Digest) -> Self {
                Self(hash)
            }

            fn internal(&self) -> $crate::hashes::Hash256Digest {
                self.0
            }

            fn bytes(&self) -> Vec<u8> {
                self.0.to_vec()
            }

            fn reversed(&self) -> Self {
                let mut digest = self.0;
                digest.reverse();
                Self(digest)
            }
        }

        impl std::fmt::Display for $hash_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_be_hex())
            }
        }

        $crate::impl_hex_serde!($hash_name);
    };
}
