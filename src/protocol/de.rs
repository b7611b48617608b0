//! Red 协议中 id / seq / time 等字段在不同版本中可能是字符串也可能是数字

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrNum {
    Str(String),
    Int(i64),
    UInt(u64),
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = match Option::<StrOrNum>::deserialize(deserializer)? {
        Some(StrOrNum::Str(s)) => s,
        Some(StrOrNum::Int(i)) => i.to_string(),
        Some(StrOrNum::UInt(u)) => u.to_string(),
        None => String::new(),
    };

    Ok(s)
}

pub fn int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let i = match Option::<StrOrNum>::deserialize(deserializer)? {
        Some(StrOrNum::Str(s)) if s.is_empty() => return Ok(T::default()),
        Some(StrOrNum::Str(s)) => s.parse::<i64>().map_err(D::Error::custom)?,
        Some(StrOrNum::Int(i)) => i,
        Some(StrOrNum::UInt(u)) => i64::try_from(u).map_err(D::Error::custom)?,
        None => return Ok(T::default()),
    };

    T::try_from(i).map_err(|_| D::Error::custom(format!("integer {i} out of range")))
}

/// `null` 视为默认值
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
