//! The ledger's amount value model.
//!
//! An amount is either a quantity of the native currency, counted as a signed
//! integer number of drops, or an issued-currency value held as a canonical
//! (mantissa, exponent, sign) triple plus its currency and issuer.
//!
//! Canonical form keeps a non-zero mantissa in `[10^15, 10^16 - 1]` with the
//! exponent in `[-96, 80]`. Zero is stored as a positive mantissa of zero with
//! exponent -100. Arithmetic reproduces the ledger's exact rounding: sums align
//! exponents by truncating division, products and quotients carry the fixed
//! `+7`/`+5` rounding terms of the reference arithmetic.

use std::cmp::Ordering;
use std::fmt;

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::enc::EncodingError;
use crate::types::currency::Currency;
use crate::types::uint::AccountId;

/// Decimal places carried by the native currency.
pub const XRP_PRECISION: u32 = 6;

/// Drops per whole unit of the native currency.
pub const XRP_UNIT: i64 = 1_000_000;

/// Largest representable magnitude of a native amount, in drops.
pub const NATIVE_MAX: i64 = 9_000_000_000_000_000_000;

/// Smallest canonical non-zero mantissa.
pub const MANTISSA_MIN: u64 = 1_000_000_000_000_000;

/// Largest canonical mantissa.
pub const MANTISSA_MAX: u64 = 9_999_999_999_999_999;

/// Smallest canonical exponent of a non-zero issued amount.
pub const EXPONENT_MIN: i32 = -96;

/// Largest canonical exponent of a non-zero issued amount.
pub const EXPONENT_MAX: i32 = 80;

/// The exponent stored for an issued zero.
pub const ZERO_EXPONENT: i32 = -100;

// Overflow guard for decimal accumulation into a u128.
const ACCUMULATE_CAP: u128 = (u128::MAX - 9) / 10;

/// Errors raised while parsing or combining amounts.
#[derive(Debug, Error)]
pub enum AmountError {
    /// A currency code was not the native token or 3 alphanumeric characters.
    #[error("Invalid currency: {0}")]
    BadCurrency(String),

    /// A value string matched none of the accepted numeric forms.
    #[error("Invalid amount value: {0}")]
    BadValue(String),

    /// A native amount exceeded the representable drop range.
    #[error("Native amount out of range")]
    NativeOutOfRange,

    /// An issued amount's canonical exponent left the representable range.
    #[error("Exponent {0} out of range")]
    ExponentOutOfRange(i32),

    /// Arithmetic or comparison over amounts of different currencies.
    #[error("Amounts are not comparable")]
    NotComparable,

    /// Division by a zero amount.
    #[error("Division by zero")]
    DivideByZero,

    /// Bubbled up from issuer or currency decoding.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// The numeric payload of an amount.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AmountValue {
    /// A native quantity in drops, sign embedded in the integer.
    Native(i64),
    /// A canonical issued-currency value.
    Issued {
        /// The mantissa, in `[10^15, 10^16 - 1]`, or zero.
        mantissa: u64,
        /// The base-10 exponent, or -100 for zero.
        exponent: i32,
        /// The sign. Always false for zero.
        negative: bool,
    },
}

/// An amount of some currency, optionally scoped to an issuer.
///
/// Equality compares the numeric value and the currency but ignores the
/// issuer, matching the comparison rules of ledger arithmetic.
#[derive(Debug, Copy, Clone)]
pub struct Amount {
    value: AmountValue,
    currency: Currency,
    issuer: AccountId,
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.currency == other.currency
    }
}

impl Eq for Amount {}

impl Amount {
    /// A native amount of the given number of drops.
    pub fn from_drops(drops: i64) -> Result<Self, AmountError> {
        if !(-NATIVE_MAX..=NATIVE_MAX).contains(&drops) {
            return Err(AmountError::NativeOutOfRange);
        }
        Ok(Amount {
            value: AmountValue::Native(drops),
            currency: Currency::Xrp,
            issuer: AccountId::ZERO,
        })
    }

    /// An issued amount built by canonicalizing the given mantissa and exponent.
    pub fn issued(
        mantissa: u128,
        exponent: i32,
        negative: bool,
        currency: Currency,
        issuer: AccountId,
    ) -> Result<Self, AmountError> {
        Ok(Amount {
            value: canonicalize(mantissa, exponent, negative)?,
            currency,
            issuer,
        })
    }

    /// An issued amount from parts that must already be canonical, as read off
    /// the wire. Non-canonical mantissas and out-of-range exponents are
    /// rejected rather than renormalized.
    pub fn from_canonical_parts(
        mantissa: u64,
        exponent: i32,
        negative: bool,
        currency: Currency,
        issuer: AccountId,
    ) -> Result<Self, AmountError> {
        let value = if mantissa == 0 {
            if negative {
                return Err(AmountError::BadValue("negative zero".to_string()));
            }
            AmountValue::Issued {
                mantissa: 0,
                exponent: ZERO_EXPONENT,
                negative: false,
            }
        } else {
            if !(MANTISSA_MIN..=MANTISSA_MAX).contains(&mantissa) {
                return Err(AmountError::BadValue(format!(
                    "non-canonical mantissa {}",
                    mantissa
                )));
            }
            if !(EXPONENT_MIN..=EXPONENT_MAX).contains(&exponent) {
                return Err(AmountError::ExponentOutOfRange(exponent));
            }
            AmountValue::Issued {
                mantissa,
                exponent,
                negative,
            }
        };
        Ok(Amount {
            value,
            currency,
            issuer,
        })
    }

    /// The numeric payload.
    pub fn value(&self) -> &AmountValue {
        &self.value
    }

    /// The amount's currency.
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// The amount's issuer. Meaningful only for issued amounts.
    pub fn issuer(&self) -> &AccountId {
        &self.issuer
    }

    /// True for native amounts.
    pub fn is_native(&self) -> bool {
        matches!(self.value, AmountValue::Native(_))
    }

    /// True if the numeric value is zero.
    pub fn is_zero(&self) -> bool {
        match self.value {
            AmountValue::Native(drops) => drops == 0,
            AmountValue::Issued { mantissa, .. } => mantissa == 0,
        }
    }

    /// True for strictly negative amounts.
    pub fn is_negative(&self) -> bool {
        match self.value {
            AmountValue::Native(drops) => drops < 0,
            AmountValue::Issued {
                mantissa, negative, ..
            } => negative && mantissa != 0,
        }
    }

    /// Parse an amount. A string of the form `value/currency/issuer` is the
    /// issued convenience form (not a wire format); anything else is parsed
    /// as a native decimal.
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let mut parts = s.splitn(3, '/');
        let value_s = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (Some(currency_s), Some(issuer_s)) => {
                // currency before value, so "XRP" here reads as an issued code
                let currency = Currency::parse_code(currency_s)?;
                let issuer = AccountId::parse(issuer_s)?;
                let value = parse_value(value_s)?;
                Ok(Amount {
                    value,
                    currency,
                    issuer,
                })
            }
            (None, None) => Self::parse_native(s),
            _ => Err(AmountError::BadValue(s.to_string())),
        }
    }

    /// Parse a native amount. An integer string counts drops directly; a
    /// string with a decimal point counts whole units, with at most 6
    /// fractional digits. `"-0"` parses to positive zero.
    pub fn parse_native(s: &str) -> Result<Self, AmountError> {
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let decimal = body.contains('.');
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty()
            || !all_digits(int_part)
            || frac_part.len() > XRP_PRECISION as usize
            || !all_digits(frac_part)
        {
            return Err(AmountError::BadValue(s.to_string()));
        }
        if int_part.len() > 19 {
            return Err(AmountError::NativeOutOfRange);
        }
        let mut drops: i128 = 0;
        for b in int_part.bytes() {
            drops = drops * 10 + i128::from(b - b'0');
        }
        if decimal {
            drops *= i128::from(XRP_UNIT);
            let mut frac: i128 = 0;
            for b in frac_part.bytes() {
                frac = frac * 10 + i128::from(b - b'0');
            }
            frac *= 10i128.pow(XRP_PRECISION - frac_part.len() as u32);
            drops += frac;
        }
        if negative {
            drops = -drops;
        }
        if drops.unsigned_abs() > NATIVE_MAX as u128 {
            return Err(AmountError::NativeOutOfRange);
        }
        Ok(Amount {
            value: AmountValue::Native(drops as i64),
            currency: Currency::Xrp,
            issuer: AccountId::ZERO,
        })
    }

    /// Parse a free-form human amount: a decimal number with an optional
    /// 3-letter currency code before or after it, e.g. `"USD 12.5"`,
    /// `"12.5 USD"`, or `"10"`. Without a code the amount is native.
    pub fn parse_human(s: &str) -> Result<Self, AmountError> {
        let mut rest = s.trim();
        let take_code = |t: &str| -> Option<[u8; 3]> {
            let bytes = t.as_bytes();
            if bytes.len() >= 3 && bytes[..3].iter().all(|b| b.is_ascii_alphabetic()) {
                Some([bytes[0], bytes[1], bytes[2]])
            } else {
                None
            }
        };
        let mut code = take_code(rest);
        if code.is_some() {
            rest = rest[3..].trim_start();
        }
        let (negative, body) = match rest.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, rest),
        };
        let digits_end = body
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(body.len());
        let (number, tail) = body.split_at(digits_end);
        let tail = tail.trim();
        if !tail.is_empty() {
            match (code, take_code(tail)) {
                (None, Some(c)) if tail.len() == 3 => code = Some(c),
                _ => return Err(AmountError::BadValue(s.to_string())),
            }
        }
        let (int_part, frac_part) = match number.split_once('.') {
            Some((i, f)) => (i, f),
            None => (number, ""),
        };
        if int_part.is_empty() || frac_part.contains('.') {
            return Err(AmountError::BadValue(s.to_string()));
        }
        let currency = match code {
            Some(c) => {
                let code_s = std::str::from_utf8(&c).expect("ASCII by construction");
                Currency::parse(&code_s.to_ascii_uppercase())?
            }
            None => Currency::Xrp,
        };
        let signed = |t: &str| -> String {
            if negative {
                format!("-{}", t)
            } else {
                t.to_string()
            }
        };
        if currency.is_native() {
            // human values count whole units; excess fractional digits beyond
            // drop precision are truncated
            let frac = &frac_part[..frac_part.len().min(XRP_PRECISION as usize)];
            let text = if frac.is_empty() {
                signed(&format!("{}.0", int_part))
            } else {
                signed(&format!("{}.{}", int_part, frac))
            };
            Self::parse_native(&text)
        } else {
            let value = parse_value(&if frac_part.is_empty() {
                signed(int_part)
            } else {
                signed(&format!("{}.{}", int_part, frac_part))
            })?;
            Ok(Amount {
                value,
                currency,
                issuer: AccountId::ZERO,
            })
        }
    }

    /// Render the numeric value: plain drops for native amounts; for issued
    /// amounts, `"0"` for zero, fixed-point decimal while the exponent lies in
    /// `[-25, -5]`, and `<mantissa>e<exponent>` notation outside it.
    pub fn to_text(&self) -> String {
        match self.value {
            AmountValue::Native(drops) => drops.to_string(),
            AmountValue::Issued {
                mantissa,
                exponent,
                negative,
            } => {
                if mantissa == 0 {
                    return "0".to_string();
                }
                let sign = if negative { "-" } else { "" };
                if !(-25..=-5).contains(&exponent) {
                    return format!("{}{}e{}", sign, mantissa, exponent);
                }
                // align the decimal point at offset exponent + 43 within a
                // zero-padded scratch buffer around the mantissa digits
                let buf = format!("{}{}{}", "0".repeat(27), mantissa, "0".repeat(23));
                let split = (exponent + 43) as usize;
                let int_part = buf[..split].trim_start_matches('0');
                let frac_part = buf[split..].trim_end_matches('0');
                let int_part = if int_part.is_empty() { "0" } else { int_part };
                if frac_part.is_empty() {
                    format!("{}{}", sign, int_part)
                } else {
                    format!("{}{}.{}", sign, int_part, frac_part)
                }
            }
        }
    }

    /// Render the value with its currency and, for issued amounts, issuer:
    /// `"<drops>/XRP"` or `"<value>/<currency>/<issuer address>"`.
    pub fn to_text_full(&self) -> String {
        match self.value {
            AmountValue::Native(_) => format!("{}/XRP", self.to_text()),
            AmountValue::Issued { .. } => format!(
                "{}/{}/{}",
                self.to_text(),
                self.currency,
                self.issuer.to_address()
            ),
        }
    }

    /// The amount with its sign flipped. Zero stays positive zero.
    pub fn negate(&self) -> Self {
        let value = match self.value {
            AmountValue::Native(drops) => AmountValue::Native(-drops),
            AmountValue::Issued {
                mantissa,
                exponent,
                negative,
            } => AmountValue::Issued {
                mantissa,
                exponent,
                negative: mantissa != 0 && !negative,
            },
        };
        Amount { value, ..*self }
    }

    /// The magnitude of the amount.
    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.negate()
        } else {
            *self
        }
    }

    fn is_comparable(&self, other: &Self) -> bool {
        self.is_native() == other.is_native() && self.currency == other.currency
    }

    /// The sum of two amounts of the same currency. Exponents are aligned by
    /// truncating division before the mantissas are added.
    pub fn add(&self, other: &Self) -> Result<Self, AmountError> {
        if !self.is_comparable(other) {
            return Err(AmountError::NotComparable);
        }
        if other.is_zero() {
            return Ok(*self);
        }
        if self.is_zero() {
            return Ok(*other);
        }
        match (self.value, other.value) {
            (AmountValue::Native(a), AmountValue::Native(b)) => {
                let sum = i128::from(a) + i128::from(b);
                if sum.unsigned_abs() > NATIVE_MAX as u128 {
                    return Err(AmountError::NativeOutOfRange);
                }
                Ok(Amount {
                    value: AmountValue::Native(sum as i64),
                    ..*self
                })
            }
            _ => {
                let (v1, mut o1, n1) = self.mantissa_offset();
                let (v2, mut o2, n2) = other.mantissa_offset();
                let mut v1 = signed(v1, n1);
                let mut v2 = signed(v2, n2);
                while o1 < o2 {
                    v1 /= 10;
                    o1 += 1;
                }
                while o2 < o1 {
                    v2 /= 10;
                    o2 += 1;
                }
                let sum = v1 + v2;
                Ok(Amount {
                    value: canonicalize(sum.unsigned_abs(), o1, sum < 0)?,
                    ..*self
                })
            }
        }
    }

    /// The difference of two amounts of the same currency.
    pub fn subtract(&self, other: &Self) -> Result<Self, AmountError> {
        self.add(&other.negate())
    }

    /// The product of two amounts, carrying the reference arithmetic's `+7`
    /// rounding term. The result keeps the left operand's currency, issuer,
    /// and native-ness.
    pub fn multiply(&self, other: &Self) -> Result<Self, AmountError> {
        if self.is_zero() {
            return Ok(*self);
        }
        if other.is_zero() {
            return match self.value {
                AmountValue::Native(_) => Ok(Amount {
                    value: AmountValue::Native(0),
                    ..*self
                }),
                AmountValue::Issued { .. } => Ok(Amount {
                    value: canonicalize(0, 0, false)?,
                    ..*self
                }),
            };
        }
        let (mut v1, mut o1, n1) = self.mantissa_offset();
        let (mut v2, mut o2, n2) = other.mantissa_offset();
        if self.is_native() {
            while v1 < u128::from(MANTISSA_MIN) {
                v1 *= 10;
                o1 -= 1;
            }
        }
        if other.is_native() {
            while v2 < u128::from(MANTISSA_MIN) {
                v2 *= 10;
                o2 -= 1;
            }
        }
        let value = v1 * v2 / 100_000_000_000_000u128 + 7;
        let offset = o1 + o2 + 14;
        self.rebuild(value, offset, n1 != n2)
    }

    /// The quotient of two amounts, carrying the reference arithmetic's `+5`
    /// rounding term. The result keeps the left operand's currency, issuer,
    /// and native-ness.
    pub fn divide(&self, other: &Self) -> Result<Self, AmountError> {
        if other.is_zero() {
            return Err(AmountError::DivideByZero);
        }
        if self.is_zero() {
            return Ok(*self);
        }
        let (mut v1, mut o1, n1) = self.mantissa_offset();
        let (mut v2, mut o2, n2) = other.mantissa_offset();
        if self.is_native() {
            while v1 < u128::from(MANTISSA_MIN) {
                v1 *= 10;
                o1 -= 1;
            }
        }
        if other.is_native() {
            while v2 < u128::from(MANTISSA_MIN) {
                v2 *= 10;
                o2 -= 1;
            }
        }
        let value = v1 * 100_000_000_000_000_000u128 / v2 + 5;
        let offset = o1 - o2 - 17;
        self.rebuild(value, offset, n1 != n2)
    }

    /// Compare two amounts of the same currency.
    pub fn compare(&self, other: &Self) -> Result<Ordering, AmountError> {
        if !self.is_comparable(other) {
            return Err(AmountError::NotComparable);
        }
        match (self.value, other.value) {
            (AmountValue::Native(a), AmountValue::Native(b)) => Ok(a.cmp(&b)),
            (
                AmountValue::Issued {
                    mantissa: m1,
                    exponent: e1,
                    negative: n1,
                },
                AmountValue::Issued {
                    mantissa: m2,
                    exponent: e2,
                    negative: n2,
                },
            ) => {
                let sign = |m: u64, n: bool| -> i32 {
                    if m == 0 {
                        0
                    } else if n {
                        -1
                    } else {
                        1
                    }
                };
                let (s1, s2) = (sign(m1, n1), sign(m2, n2));
                if s1 != s2 {
                    return Ok(s1.cmp(&s2));
                }
                // canonical mantissas make (exponent, mantissa) order magnitudes
                let magnitude = (e1, m1).cmp(&(e2, m2));
                Ok(if s1 < 0 { magnitude.reverse() } else { magnitude })
            }
            _ => Err(AmountError::NotComparable),
        }
    }

    // The magnitude, exponent, and sign of the value. Native amounts report
    // exponent zero.
    fn mantissa_offset(&self) -> (u128, i32, bool) {
        match self.value {
            AmountValue::Native(drops) => (drops.unsigned_abs() as u128, 0, drops < 0),
            AmountValue::Issued {
                mantissa,
                exponent,
                negative,
            } => (u128::from(mantissa), exponent, negative),
        }
    }

    // Reassemble an arithmetic result, keeping self's currency, issuer, and
    // native-ness. Native results renormalize the offset back to zero by
    // truncating division.
    fn rebuild(&self, mut value: u128, mut offset: i32, negative: bool) -> Result<Self, AmountError> {
        let value = match self.value {
            AmountValue::Native(_) => {
                while offset < 0 {
                    value /= 10;
                    offset += 1;
                }
                while offset > 0 {
                    value = value
                        .checked_mul(10)
                        .ok_or(AmountError::NativeOutOfRange)?;
                    offset -= 1;
                }
                if value > NATIVE_MAX as u128 {
                    return Err(AmountError::NativeOutOfRange);
                }
                let drops = value as i64;
                AmountValue::Native(if negative { -drops } else { drops })
            }
            AmountValue::Issued { .. } => canonicalize(value, offset, negative)?,
        };
        Ok(Amount { value, ..*self })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_text_full())
    }
}

fn signed(magnitude: u128, negative: bool) -> i128 {
    let v = magnitude as i128;
    if negative {
        -v
    } else {
        v
    }
}

/// Reduce a (magnitude, exponent, sign) triple to canonical form: the mantissa
/// scaled into `[10^15, 10^16 - 1]` by truncating division, zero forced to
/// positive with exponent -100, and the exponent bounds enforced.
fn canonicalize(
    mut mantissa: u128,
    mut exponent: i32,
    negative: bool,
) -> Result<AmountValue, AmountError> {
    if mantissa == 0 {
        return Ok(AmountValue::Issued {
            mantissa: 0,
            exponent: ZERO_EXPONENT,
            negative: false,
        });
    }
    while mantissa < u128::from(MANTISSA_MIN) {
        mantissa *= 10;
        exponent -= 1;
    }
    while mantissa > u128::from(MANTISSA_MAX) {
        mantissa /= 10;
        exponent += 1;
    }
    if !(EXPONENT_MIN..=EXPONENT_MAX).contains(&exponent) {
        return Err(AmountError::ExponentOutOfRange(exponent));
    }
    Ok(AmountValue::Issued {
        mantissa: mantissa as u64,
        exponent,
        negative,
    })
}

/// Parse an issued-currency value string: an integer, a decimal, or base-10
/// exponential notation. Digits beyond the accumulator's capacity truncate,
/// matching big-integer division semantics.
fn parse_value(s: &str) -> Result<AmountValue, AmountError> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, s),
    };
    let (body, exp_s) = match rest.split_once(|c: char| c == 'e' || c == 'E') {
        Some((b, e)) => (b, Some(e)),
        None => (rest, None),
    };
    let mut exponent: i32 = match exp_s {
        Some(e) => e
            .parse()
            .map_err(|_| AmountError::BadValue(s.to_string()))?,
        None => 0,
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::BadValue(s.to_string()));
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(AmountError::BadValue(s.to_string()));
    }
    let mut mantissa: u128 = 0;
    for b in int_part.bytes() {
        if mantissa > ACCUMULATE_CAP {
            exponent += 1;
        } else {
            mantissa = mantissa * 10 + u128::from(b - b'0');
        }
    }
    for b in frac_part.bytes() {
        if mantissa > ACCUMULATE_CAP {
            break;
        }
        mantissa = mantissa * 10 + u128::from(b - b'0');
        exponent -= 1;
    }
    canonicalize(mantissa, exponent, negative)
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value {
            AmountValue::Native(_) => serializer.serialize_str(&self.to_text()),
            AmountValue::Issued { .. } => {
                let mut st = serializer.serialize_struct("Amount", 3)?;
                st.serialize_field("value", &self.to_text())?;
                st.serialize_field("currency", &self.currency)?;
                st.serialize_field("issuer", &self.issuer.to_address())?;
                st.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Drops(String),
            Issued {
                value: String,
                currency: String,
                issuer: Option<String>,
            },
        }
        match Wire::deserialize(deserializer)? {
            Wire::Drops(s) => Amount::parse_native(&s).map_err(D::Error::custom),
            Wire::Issued {
                value,
                currency,
                issuer,
            } => {
                // currency context first, value after
                let currency = Currency::parse_code(&currency).map_err(D::Error::custom)?;
                let issuer = match issuer {
                    Some(addr) => AccountId::parse(&addr).map_err(D::Error::custom)?,
                    None => AccountId::ZERO,
                };
                let value = parse_value(&value).map_err(D::Error::custom)?;
                Ok(Amount {
                    value,
                    currency,
                    issuer,
                })
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ISSUER: &str = "rrrrrrrrrrrrrrrrrrrrBZbvji";

    fn issued(s: &str) -> Amount {
        Amount::parse(&format!("{}/USD/{}", s, ISSUER)).unwrap()
    }

    #[test]
    fn it_parses_native_amounts() {
        let cases = [
            ("0", 0i64),
            ("-0", 0),
            ("1", 1), // integer strings count drops
            ("1.0", 1_000_000),
            ("12.3", 12_300_000),
            ("-12.345678", -12_345_678),
            ("9000000000000000000", 9_000_000_000_000_000_000),
        ];
        for case in cases.iter() {
            let amount = Amount::parse(case.0).unwrap();
            assert!(amount.is_native());
            assert_eq!(*amount.value(), AmountValue::Native(case.1));
        }
    }

    #[test]
    fn it_rejects_bad_native_amounts() {
        // more than 6 fractional digits, or out of the drop range
        assert!(matches!(
            Amount::parse_native("1.2345678"),
            Err(AmountError::BadValue(_))
        ));
        assert!(matches!(
            Amount::parse_native("9000000000000000001"),
            Err(AmountError::NativeOutOfRange)
        ));
        assert!(matches!(
            Amount::parse_native("9000000000001.0"),
            Err(AmountError::NativeOutOfRange)
        ));
        assert!(matches!(
            Amount::parse_native("."),
            Err(AmountError::BadValue(_))
        ));
    }

    #[test]
    fn it_canonicalizes_issued_values() {
        let cases = [
            ("1", 1_000_000_000_000_000u64, -15, false),
            ("1.23", 1_230_000_000_000_000, -15, false),
            ("-1.23", 1_230_000_000_000_000, -15, true),
            ("12000", 1_200_000_000_000_000, -11, false),
            ("0.0001", 1_000_000_000_000_000, -19, false),
            ("87654321.12345678", 8_765_432_112_345_678, -8, false),
            ("3.14e20", 3_140_000_000_000_000, 5, false),
            ("-0", 0, ZERO_EXPONENT, false),
            ("0.0", 0, ZERO_EXPONENT, false),
        ];
        for case in cases.iter() {
            let amount = issued(case.0);
            assert_eq!(
                *amount.value(),
                AmountValue::Issued {
                    mantissa: case.1,
                    exponent: case.2,
                    negative: case.3,
                },
                "case {}",
                case.0
            );
        }
    }

    #[test]
    fn it_rejects_out_of_range_exponents() {
        assert!(matches!(
            Amount::parse(&format!("1e100/USD/{}", ISSUER)),
            Err(AmountError::ExponentOutOfRange(_))
        ));
        assert!(matches!(
            Amount::parse(&format!("1e-100/USD/{}", ISSUER)),
            Err(AmountError::ExponentOutOfRange(_))
        ));
    }

    #[test]
    fn it_renders_fixed_point_text() {
        let cases = [
            ("0", "0"),
            ("1", "1"),
            ("1.2300", "1.23"),
            ("-1.23", "-1.23"),
            ("12000", "12000"),
            ("0.0001", "0.0001"),
            ("87654321.12345678", "87654321.12345678"),
        ];
        for case in cases.iter() {
            assert_eq!(issued(case.0).to_text(), case.1, "case {}", case.0);
        }
    }

    #[test]
    fn it_renders_exponential_text_outside_the_window() {
        let cases = [
            ("3.14e20", "3140000000000000e5"),
            ("1e-26", "1000000000000000e-41"),
        ];
        for case in cases.iter() {
            assert_eq!(issued(case.0).to_text(), case.1, "case {}", case.0);
        }
    }

    #[test]
    fn it_renders_text_full() {
        assert_eq!(Amount::parse("12.3").unwrap().to_text_full(), "12300000/XRP");
        assert_eq!(
            issued("1.2300").to_text_full(),
            format!("1.23/USD/{}", ISSUER)
        );
    }

    #[test]
    fn it_adds_and_subtracts() {
        let cases = [
            ("150", "50.5", "200.5"),
            ("150", "-50.5", "99.5"),
            ("0", "1.5", "1.5"),
            ("1.5", "0", "1.5"),
            ("1.5", "-1.5", "0"),
        ];
        for case in cases.iter() {
            let sum = issued(case.0).add(&issued(case.1)).unwrap();
            assert_eq!(sum.to_text(), case.2, "case {} + {}", case.0, case.1);
            let back = sum.subtract(&issued(case.1)).unwrap();
            assert_eq!(back, issued(case.0), "case {} round trip", case.0);
        }

        let native = Amount::parse("10.0").unwrap().add(&Amount::parse("2.5").unwrap());
        assert_eq!(*native.unwrap().value(), AmountValue::Native(12_500_000));
    }

    #[test]
    fn it_refuses_mixed_currency_arithmetic() {
        let usd = issued("1");
        let native = Amount::parse("1").unwrap();
        assert!(matches!(usd.add(&native), Err(AmountError::NotComparable)));
        let eur = Amount::parse(&format!("1/EUR/{}", ISSUER)).unwrap();
        assert!(matches!(usd.compare(&eur), Err(AmountError::NotComparable)));
    }

    #[test]
    fn it_multiplies_and_divides() {
        assert_eq!(issued("2").multiply(&issued("3")).unwrap().to_text(), "6");
        assert_eq!(issued("200").divide(&issued("8")).unwrap().to_text(), "25");

        let native = Amount::parse_native("0.00001")
            .unwrap()
            .multiply(&Amount::parse_native("0.00001").unwrap())
            .unwrap();
        // 10 drops * 10 drops
        assert_eq!(*native.value(), AmountValue::Native(100));

        assert!(matches!(
            issued("1").divide(&issued("0")),
            Err(AmountError::DivideByZero)
        ));
    }

    #[test]
    fn it_compares_issued_values() {
        let cases = [
            ("1", "2", Ordering::Less),
            ("2", "1", Ordering::Greater),
            ("1", "1", Ordering::Equal),
            ("-1", "1", Ordering::Less),
            ("-2", "-1", Ordering::Less),
            ("0", "0", Ordering::Equal),
            ("0", "-1", Ordering::Greater),
            ("100", "2", Ordering::Greater),
        ];
        for case in cases.iter() {
            assert_eq!(
                issued(case.0).compare(&issued(case.1)).unwrap(),
                case.2,
                "case {} vs {}",
                case.0,
                case.1
            );
        }
    }

    #[test]
    fn it_negates_without_minus_zero() {
        let zero = issued("0");
        assert_eq!(zero.negate(), zero);
        assert!(!zero.negate().is_negative());

        let amount = issued("-1.5");
        assert_eq!(amount.negate().to_text(), "1.5");
        assert_eq!(amount.negate().negate(), amount);
        assert_eq!(amount.abs().to_text(), "1.5");

        let drops = Amount::parse("123").unwrap();
        assert_eq!(drops.negate().to_text(), "-123");
        assert_eq!(drops.negate().negate(), drops);
        assert_eq!(Amount::from_drops(0).unwrap().negate().to_text(), "0");
    }

    #[test]
    fn it_parses_human_forms() {
        let cases = [
            ("USD 12.5", "12.5/USD"),
            ("12.5 USD", "12.5/USD"),
            ("eur 0.5", "0.5/EUR"),
            ("XRP 5", "5000000/XRP"),
            ("5", "5000000/XRP"),
            ("-1.5 USD", "-1.5/USD"),
        ];
        for case in cases.iter() {
            let amount = Amount::parse_human(case.0).unwrap();
            let rendered = if amount.is_native() {
                amount.to_text_full()
            } else {
                format!("{}/{}", amount.to_text(), amount.currency())
            };
            assert_eq!(rendered, case.1, "case {}", case.0);
        }
    }

    #[test]
    fn it_round_trips_serde() {
        let native = Amount::parse("12.3").unwrap();
        let json = serde_json::to_string(&native).unwrap();
        assert_eq!(json, "\"12300000\"");
        assert_eq!(serde_json::from_str::<Amount>(&json).unwrap(), native);

        let amount = issued("1.23");
        let json = serde_json::to_value(&amount).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "value": "1.23",
                "currency": "USD",
                "issuer": ISSUER,
            })
        );
        let back: Amount = serde_json::from_value(json).unwrap();
        assert_eq!(back, amount);
        assert_eq!(back.issuer(), amount.issuer());
    }
}
