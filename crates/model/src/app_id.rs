use {
    alloy_primitives::B256,
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    std::{
        borrow::Cow,
        fmt::{self, Debug, Formatter},
        str::FromStr,
    },
};

/// Hash of the off-chain metadata document attached to an order. Only the
/// hash is signed; the document itself lives elsewhere.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct AppId(pub [u8; 32]);

impl Debug for AppId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AppId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<B256> for AppId {
    fn from(value: B256) -> Self {
        Self(value.0)
    }
}

impl From<AppId> for B256 {
    fn from(value: AppId) -> Self {
        B256::new(value.0)
    }
}

impl Serialize for AppId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{self:?}"))
    }
}

impl<'de> Deserialize<'de> for AppId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Cow::<str>::deserialize(deserializer)?;
        s.parse().map_err(|err| {
            de::Error::custom(format!(
                "failed to decode {s:?} as hex appdata 32 bytes: {err}"
            ))
        })
    }
}
