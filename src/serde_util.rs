//! Custom serde helpers for Privy wire formats.

/// Serializes integers as decimal strings.
///
/// Quantities such as `value` and fee caps can exceed what a JSON number
/// carries without precision loss, so they travel as `"1000000000000000000"`.
/// Deserialization accepts decimal strings, `0x` hex strings and JSON numbers.
pub mod decimal {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr + TryFrom<u128>,
        <T as FromStr>::Err: Display,
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => parse_quantity(&s).map_err(D::Error::custom),
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|v| T::try_from(u128::from(v)).ok())
                .ok_or_else(|| D::Error::custom(format!("Invalid quantity: {}", n))),
            other => Err(D::Error::custom(format!("Invalid quantity: {}", other))),
        }
    }

    fn parse_quantity<T>(s: &str) -> Result<T, String>
    where
        T: FromStr + TryFrom<u128>,
        <T as FromStr>::Err: Display,
    {
        match (s.parse::<T>(), s.strip_prefix("0x")) {
            (Ok(v), _) => Ok(v),
            // u128 and friends only parse decimal
            (Err(_), Some(hex)) => {
                let v = u128::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
                T::try_from(v).map_err(|_| format!("Quantity out of range: {}", s))
            }
            (Err(e), None) => Err(e.to_string()),
        }
    }
}

/// [`decimal`] for `Option` fields; `None` is skipped by the caller's
/// `skip_serializing_if`.
pub mod decimal_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr + TryFrom<u128>,
        <T as FromStr>::Err: Display,
        D: Deserializer<'de>,
    {
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => super::decimal::deserialize(value)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Serializes a `u64` as a decimal string (`chainId: "84532"`).
pub mod u64_string {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
