//! Macros for declaring fixed-width identifier newtypes.

/// Implement a fixed-width byte-array newtype wrapping a `Uint`, with `ByteFormat`
/// and hex-string serde.
#[macro_export]
macro_rules! wrap_uint {
    (
        $(#[$outer:meta])*
        $name:ident, $width:expr
    ) => {
        $(#[$outer])*
        #[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name($crate::types::uint::Uint<$width>);

        impl $name {
            /// The all-zero value.
            pub const ZERO: $name = $name($crate::types::uint::Uint::ZERO);

            /// The width of the type in bytes.
            pub const WIDTH: usize = $width;

            /// Wrap a byte array.
            pub const fn from_bytes(bytes: [u8; $width]) -> Self {
                Self($crate::types::uint::Uint::from_bytes(bytes))
            }

            /// Interpret a big-endian slice, left-padding with zeros if it is
            /// narrower than the type and keeping the low-order bytes if wider.
            pub fn from_be_slice(slice: &[u8]) -> Self {
                Self($crate::types::uint::Uint::from_be_slice(slice))
            }

            /// Parse from exactly `2 * WIDTH` hex digits.
            pub fn from_hex(s: &str) -> $crate::enc::EncodingResult<Self> {
                Ok(Self($crate::types::uint::Uint::from_hex(s)?))
            }

            /// The uppercase hex rendition of the value.
            pub fn to_hex(&self) -> String {
                self.0.to_hex()
            }

            /// A reference to the underlying bytes.
            pub const fn as_bytes(&self) -> &[u8; $width] {
                self.0.as_bytes()
            }

            /// True if every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }
        }

        impl $crate::ser::ByteFormat for $name {
            type Error = $crate::ser::SerError;

            fn serialized_length(&self) -> usize {
                $width
            }

            fn read_from<R>(reader: &mut R) -> $crate::ser::SerResult<Self>
            where
                R: std::io::Read,
            {
                let mut buf = [0u8; $width];
                reader.read_exact(&mut buf)?;
                Ok(Self::from_bytes(buf))
            }

            fn write_to<W>(&self, writer: &mut W) -> $crate::ser::SerResult<usize>
            where
                W: std::io::Write,
            {
                Ok(writer.write(self.as_bytes())?)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<$name, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s: &str = serde::Deserialize::deserialize(deserializer)?;
                $name::from_hex(s).map_err(|e| serde::de::Error::custom(e.to_string()))
            }
        }
    };
}
