use {
    crate::{DomainSeparator, bytes_hex},
    alloy_primitives::{Address, B256, SignatureError, keccak256},
    anyhow::{Context as _, Result, ensure},
    serde::{Deserialize, Serialize, de},
    std::fmt::{self, Debug, Formatter},
};

/// See [`Signature`].
#[derive(
    Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize, Hash, strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SigningScheme {
    #[default]
    Eip712,
    EthSign,
    Eip1271,
    PreSign,
}

/// Signature over the order data.
/// All variants rely on the EIP-712 hash of the order data, referred to as the
/// order digest.
#[derive(Eq, PartialEq, Clone, Deserialize, Serialize, Hash)]
#[serde(into = "JsonSignature", try_from = "JsonSignature")]
pub enum Signature {
    /// The order struct is signed according to EIP-712.
    ///
    /// https://eips.ethereum.org/EIPS/eip-712
    Eip712(EcdsaSignature),
    /// The order digest is signed according to EIP-191's personal_sign
    /// signature format.
    ///
    /// https://eips.ethereum.org/EIPS/eip-191
    EthSign(EcdsaSignature),
    /// Signature verified according to EIP-1271, which facilitates a way for
    /// contracts to verify signatures using an arbitrary method. This
    /// allows smart contracts to sign and place orders. The order digest is
    /// passed to the verification method, along with this signature.
    ///
    /// https://eips.ethereum.org/EIPS/eip-1271
    Eip1271(Vec<u8>),
    /// The owner authorizes the order with an on-chain transaction that sets
    /// a flag for the order UID on the settlement contract.
    PreSign,
}

impl Default for Signature {
    fn default() -> Self {
        Self::default_with(SigningScheme::default())
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if let Signature::PreSign = self {
            return f.write_str("PreSign");
        }

        let scheme = format!("{:?}", self.scheme());
        let bytes = format!("0x{}", hex::encode(self.to_bytes()));
        f.debug_tuple(&scheme).field(&bytes).finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("unable to recover the order signer")]
    UnableToRecoverSigner(#[from] SignatureError),
    #[error("recovered signer {0} does not match the declared owner")]
    UnexpectedSigner(Address),
    #[error("on-chain signatures need an explicit owner")]
    MissingFrom,
}

impl Signature {
    pub fn default_with(scheme: SigningScheme) -> Self {
        match scheme {
            SigningScheme::Eip712 => Signature::Eip712(Default::default()),
            SigningScheme::EthSign => Signature::EthSign(Default::default()),
            SigningScheme::Eip1271 => Signature::Eip1271(Default::default()),
            SigningScheme::PreSign => Signature::PreSign,
        }
    }

    /// Recovers the owner of the signature for the struct hash under the given
    /// domain.
    ///
    /// Returns `None` for on-chain schemes, which don't support owner
    /// recovery.
    pub fn recover(
        &self,
        domain_separator: &DomainSeparator,
        struct_hash: &[u8; 32],
    ) -> Result<Option<Address>, SignatureError> {
        match self {
            Self::Eip712(signature) => signature
                .recover(EcdsaSigningScheme::Eip712, domain_separator, struct_hash)
                .map(Some),
            Self::EthSign(signature) => signature
                .recover(EcdsaSigningScheme::EthSign, domain_separator, struct_hash)
                .map(Some),
            Self::Eip1271(_) | Self::PreSign => Ok(None),
        }
    }

    /// Recovers the signer and checks it against the declared owner.
    ///
    /// For on-chain schemes nothing can be checked locally, so the declared
    /// owner is returned as is and must be present.
    pub fn verify_owner(
        &self,
        from: Option<Address>,
        domain_separator: &DomainSeparator,
        struct_hash: &[u8; 32],
    ) -> Result<Address, VerificationError> {
        match (self.recover(domain_separator, struct_hash)?, from) {
            (Some(recovered), Some(from)) if recovered == from => Ok(recovered),
            (Some(recovered), Some(_)) => Err(VerificationError::UnexpectedSigner(recovered)),
            (Some(recovered), None) => Ok(recovered),
            (None, Some(from)) => Ok(from),
            (None, None) => Err(VerificationError::MissingFrom),
        }
    }

    pub fn from_bytes(scheme: SigningScheme, bytes: &[u8]) -> Result<Self> {
        Ok(match scheme {
            SigningScheme::Eip712 | SigningScheme::EthSign => {
                let bytes: &[u8; 65] = bytes
                    .try_into()
                    .context("ECDSA signature must be 65 bytes long")?;
                let signature = EcdsaSignature::from_bytes(bytes);
                match scheme {
                    SigningScheme::Eip712 => Self::Eip712(signature),
                    _ => Self::EthSign(signature),
                }
            }
            SigningScheme::Eip1271 => Self::Eip1271(bytes.to_vec()),
            SigningScheme::PreSign => {
                ensure!(
                    bytes.is_empty() || bytes.len() == 20,
                    "presign signature bytes should be empty or an address (legacy)",
                );
                Self::PreSign
            }
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Eip712(signature) | Self::EthSign(signature) => signature.to_bytes().to_vec(),
            Self::Eip1271(signature) => signature.clone(),
            Self::PreSign => Vec::new(),
        }
    }

    pub fn scheme(&self) -> SigningScheme {
        match self {
            Signature::Eip712(_) => SigningScheme::Eip712,
            Signature::EthSign(_) => SigningScheme::EthSign,
            Signature::Eip1271(_) => SigningScheme::Eip1271,
            Signature::PreSign => SigningScheme::PreSign,
        }
    }

    /// Signature bytes in the layout the settlement contract expects inside a
    /// settlement's trade list.
    pub fn encode_for_settlement(&self, owner: Address) -> Vec<u8> {
        match self {
            Self::Eip712(signature) | Self::EthSign(signature) => signature.to_bytes().to_vec(),
            Self::Eip1271(signature) => [owner.as_slice(), signature].concat(),
            Self::PreSign => owner.to_vec(),
        }
    }
}

/// An internal type used for deriving `serde` implementations for the
/// `Signature` type.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSignature {
    signing_scheme: SigningScheme,
    #[serde(with = "bytes_hex")]
    signature: Vec<u8>,
}

impl From<Signature> for JsonSignature {
    fn from(signature: Signature) -> Self {
        Self {
            signing_scheme: signature.scheme(),
            signature: signature.to_bytes(),
        }
    }
}

impl TryFrom<JsonSignature> for Signature {
    type Error = anyhow::Error;

    fn try_from(json: JsonSignature) -> Result<Self, Self::Error> {
        Self::from_bytes(json.signing_scheme, &json.signature)
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Deserialize, Serialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EcdsaSigningScheme {
    Eip712,
    EthSign,
}

impl From<EcdsaSigningScheme> for SigningScheme {
    fn from(scheme: EcdsaSigningScheme) -> Self {
        match scheme {
            EcdsaSigningScheme::Eip712 => Self::Eip712,
            EcdsaSigningScheme::EthSign => Self::EthSign,
        }
    }
}

impl SigningScheme {
    pub fn is_ecdsa_scheme(&self) -> bool {
        self.try_to_ecdsa_scheme().is_some()
    }

    pub fn try_to_ecdsa_scheme(&self) -> Option<EcdsaSigningScheme> {
        match self {
            Self::Eip712 => Some(EcdsaSigningScheme::Eip712),
            Self::EthSign => Some(EcdsaSigningScheme::EthSign),
            Self::Eip1271 | Self::PreSign => None,
        }
    }
}

/// `keccak256("\x19\x01" ++ domainSeparator ++ structHash)`
pub fn hashed_eip712_message(
    domain_separator: &DomainSeparator,
    struct_hash: &[u8; 32],
) -> [u8; 32] {
    let mut message = [0u8; 66];
    message[0..2].copy_from_slice(&[0x19, 0x01]);
    message[2..34].copy_from_slice(&domain_separator.0);
    message[34..66].copy_from_slice(struct_hash);
    keccak256(message).0
}

/// Returns the message used for signing and recovery for the specified hash.
///
/// The signing message depends on the signature scheme that was used.
fn signing_message(
    signing_scheme: EcdsaSigningScheme,
    domain_separator: &DomainSeparator,
    struct_hash: &[u8; 32],
) -> [u8; 32] {
    let message = hashed_eip712_message(domain_separator, struct_hash);
    match signing_scheme {
        EcdsaSigningScheme::Eip712 => message,
        EcdsaSigningScheme::EthSign => {
            let mut buffer = [0u8; 60];
            buffer[..28].copy_from_slice(b"\x19Ethereum Signed Message:\n32");
            buffer[28..].copy_from_slice(&message);
            keccak256(buffer).0
        }
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Hash)]
pub struct EcdsaSignature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

impl EcdsaSignature {
    pub fn to_signature(self, scheme: EcdsaSigningScheme) -> Signature {
        match scheme {
            EcdsaSigningScheme::Eip712 => Signature::Eip712(self),
            EcdsaSigningScheme::EthSign => Signature::EthSign(self),
        }
    }

    /// r + s + v
    pub fn to_bytes(self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = self.v;
        bytes
    }

    pub fn from_bytes(bytes: &[u8; 65]) -> Self {
        EcdsaSignature {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: bytes[64],
        }
    }

    pub fn recover(
        &self,
        signing_scheme: EcdsaSigningScheme,
        domain_separator: &DomainSeparator,
        struct_hash: &[u8; 32],
    ) -> Result<Address, SignatureError> {
        let message = signing_message(signing_scheme, domain_separator, struct_hash);
        let signature = alloy_primitives::Signature::from_raw(&self.to_bytes())?;
        signature.recover_address_from_prehash(&B256::new(message))
    }

    /// Returns an arbitrary non-zero signature that can be used for recovery
    /// when you don't actually care about the owner.
    pub fn non_zero() -> Self {
        Self {
            r: B256::repeat_byte(1),
            s: B256::repeat_byte(2),
            v: 27,
        }
    }
}

impl From<alloy_primitives::Signature> for EcdsaSignature {
    fn from(signature: alloy_primitives::Signature) -> Self {
        Self::from_bytes(&signature.as_bytes())
    }
}

impl Serialize for EcdsaSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        bytes_hex::serialize(self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for EcdsaSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = bytes_hex::deserialize(deserializer)?;
        let bytes: &[u8; 65] = bytes.as_slice().try_into().map_err(|_| {
            de::Error::custom(format!(
                "ecdsa signature must be 65 bytes ordered as r, s, v but got {}",
                bytes.len()
            ))
        })?;
        Ok(EcdsaSignature::from_bytes(bytes))
    }
}
