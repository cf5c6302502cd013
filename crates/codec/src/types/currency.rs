//! Currency codes: the native currency or a 3-character ISO-style code.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::amount::AmountError;

/// A ledger currency. The native currency occupies 20 zero bytes on the wire;
/// issued currencies place their 3 ASCII characters at bytes 12 through 14.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Currency {
    /// The native currency.
    Xrp,
    /// An issued currency named by a 3-character code.
    Iso([u8; 3]),
}

impl Currency {
    /// Parse a currency from text. Empty strings, `"0"`, and `"XRP"` name the
    /// native currency; any other 3-character ASCII code is an issued currency.
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        match s {
            "" | "0" | "XRP" => Ok(Currency::Xrp),
            _ => Self::parse_iso(s),
        }
    }

    /// Parse a currency code in a context where a code is definitely present,
    /// such as an issued amount. Here the literal `"XRP"` names a (historical)
    /// issued currency rather than the native one.
    pub fn parse_code(s: &str) -> Result<Self, AmountError> {
        match s {
            "" | "0" => Ok(Currency::Xrp),
            _ => Self::parse_iso(s),
        }
    }

    fn parse_iso(s: &str) -> Result<Self, AmountError> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
            return Err(AmountError::BadCurrency(s.to_string()));
        }
        Ok(Currency::Iso([bytes[0], bytes[1], bytes[2]]))
    }

    /// The 20-byte wire rendition of the currency.
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut buf = [0u8; 20];
        if let Currency::Iso(code) = self {
            buf[12..15].copy_from_slice(code);
        }
        buf
    }

    /// Interpret 20 wire bytes as a currency. All-zero bytes name the native
    /// currency; otherwise the code is read from bytes 12 through 14.
    ///
    /// Only the plain ISO layout is modeled. The legacy interest-bearing
    /// layout, which packs a type byte and demurrage rate into the leading
    /// bytes, is rejected as `BadCurrency`.
    pub fn from_bytes(bytes: &[u8; 20]) -> Result<Self, AmountError> {
        if bytes.iter().all(|b| *b == 0) {
            return Ok(Currency::Xrp);
        }
        let code = [bytes[12], bytes[13], bytes[14]];
        if !code.iter().all(|b| b.is_ascii_alphanumeric()) {
            return Err(AmountError::BadCurrency(hex::encode_upper(bytes)));
        }
        Ok(Currency::Iso(code))
    }

    /// True for the native currency.
    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Xrp)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Currency::Xrp => write!(f, "XRP"),
            // parse_iso admits only ASCII codes
            Currency::Iso(code) => {
                write!(f, "{}", std::str::from_utf8(code).map_err(|_| fmt::Error)?)
            }
        }
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Currency, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: &str = Deserialize::deserialize(deserializer)?;
        Currency::parse(s).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_parses_the_native_forms() {
        let cases = ["", "0", "XRP"];
        for case in cases.iter() {
            assert_eq!(Currency::parse(case).unwrap(), Currency::Xrp);
        }
    }

    #[test]
    fn it_parses_iso_codes() {
        assert_eq!(Currency::parse("USD").unwrap(), Currency::Iso(*b"USD"));
        // in an issued context "XRP" is an ordinary code
        assert_eq!(Currency::parse_code("XRP").unwrap(), Currency::Iso(*b"XRP"));
        assert!(Currency::parse("US").is_err());
        assert!(Currency::parse("USDX").is_err());
    }

    #[test]
    fn it_round_trips_wire_bytes() {
        let usd = Currency::Iso(*b"USD");
        let bytes = usd.to_bytes();
        assert_eq!(
            hex::encode_upper(bytes),
            "0000000000000000000000005553440000000000"
        );
        assert_eq!(Currency::from_bytes(&bytes).unwrap(), usd);
        assert_eq!(
            Currency::from_bytes(&[0u8; 20]).unwrap(),
            Currency::Xrp
        );
    }

    #[test]
    fn it_reads_historical_issued_xrp_bytes() {
        let mut bytes = [0u8; 20];
        bytes[12..15].copy_from_slice(b"XRP");
        assert_eq!(Currency::from_bytes(&bytes).unwrap(), Currency::Iso(*b"XRP"));
    }
}
