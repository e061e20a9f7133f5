use ::core::fmt::Display;
use ::std::fmt;

use ::anyhow::anyhow;
use ::serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize,
};

use crate::error::{CoinwashError, Result};

/// Unique identifier for a washing machine.
/// Ids are positive and ordered, listing the fleet goes by ascending id.
#[derive(Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct MachineId {
    id: u32,
}

impl MachineId {
    pub fn new(id: u32) -> Result<Self> {
        if id == 0 {
            Err(CoinwashError::illegal_argument(anyhow!(
                "Machine id must be positive."
            )))
        } else {
            Ok(Self { id })
        }
    }

    pub fn get(&self) -> u32 {
        self.id
    }
}

impl<'de> Deserialize<'de> for MachineId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_u32(MachineIdVisitor)
    }
}

struct MachineIdVisitor;

impl Visitor<'_> for MachineIdVisitor {
    type Value = MachineId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a positive integer representing a MachineId")
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        let id = u32::try_from(value).map_err(de::Error::custom)?;
        MachineId::new(id).map_err(de::Error::custom)
    }

    fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        let id = u64::try_from(value).map_err(de::Error::custom)?;
        self.visit_u64(id)
    }
}

impl Display for MachineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.id, f)
    }
}

impl TryFrom<u32> for MachineId {
    type Error = CoinwashError;
    fn try_from(id: u32) -> Result<Self> {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::serde_json::json;

    #[test]
    fn machine_id_cannot_be_zero() {
        let result = MachineId::try_from(0);
        assert!(result.is_err_and(|e| e
            .to_string()
            .starts_with("Illegal argument: Machine id must be positive.")));
    }

    #[test]
    fn cannot_deserialize_negative_number() {
        let result: std::result::Result<MachineId, _> = serde_json::from_value(json!(-3));
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_machine_id() -> anyhow::Result<()> {
        let result: MachineId = serde_json::from_value(json!(12))?;
        assert_eq!(result, MachineId::new(12)?);
        assert_eq!(serde_json::to_value(result)?, json!(12));
        Ok(())
    }
}
