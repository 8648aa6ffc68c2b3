//! The 12 byte blob ETH-flow orders carry next to the order tuple when they
//! are placed on chain: `quoteId (i64 BE) ++ validTo (u32 BE)`.

use {
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    std::{borrow::Cow, fmt, str::FromStr},
};

pub type QuoteId = i64;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuxDataError {
    #[error("packed aux data must be 12 bytes long but got {0}")]
    InvalidLength(usize),
    #[error(transparent)]
    Hex(#[from] hex::FromHexError),
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PackedAuxData {
    pub quote_id: QuoteId,
    /// The expiry the user actually asked for. ETH-flow orders are signed with
    /// an unlimited `validTo`, so this is the only place it is kept.
    pub valid_to: u32,
}

impl PackedAuxData {
    pub const LEN: usize = 12;

    pub fn decode(blob: &[u8]) -> Result<Self, AuxDataError> {
        let blob: &[u8; Self::LEN] = blob
            .try_into()
            .map_err(|_| AuxDataError::InvalidLength(blob.len()))?;
        let [q0, q1, q2, q3, q4, q5, q6, q7, v0, v1, v2, v3] = *blob;
        Ok(Self {
            quote_id: i64::from_be_bytes([q0, q1, q2, q3, q4, q5, q6, q7]),
            valid_to: u32::from_be_bytes([v0, v1, v2, v3]),
        })
    }

    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut blob = [0u8; Self::LEN];
        blob[..8].copy_from_slice(&self.quote_id.to_be_bytes());
        blob[8..].copy_from_slice(&self.valid_to.to_be_bytes());
        blob
    }
}

impl FromStr for PackedAuxData {
    type Err = AuxDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        Self::decode(&bytes)
    }
}

impl fmt::Display for PackedAuxData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.encode()))
    }
}

impl Serialize for PackedAuxData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PackedAuxData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Cow::<str>::deserialize(deserializer)?;
        s.parse().map_err(|err| {
            de::Error::custom(format!("failed to decode {s:?} as packed aux data: {err}"))
        })
    }
}
