//! Contains the order type with the serialization used by the order book API
//! and the EIP-712 hashing used by the settlement contract.

use {
    crate::{
        DomainContext,
        DomainSeparator,
        app_id::AppId,
        aux_data::QuoteId,
        signature::{
            EcdsaSignature,
            EcdsaSigningScheme,
            Signature,
            VerificationError,
            hashed_eip712_message,
        },
        u256_decimal,
    },
    alloy_primitives::{Address, B256, SignatureError, U256, keccak256},
    hex_literal::hex,
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    std::{
        fmt::{self, Debug, Display},
        str::FromStr,
    },
    strum::EnumString,
};

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("sell amount must be greater than zero")]
    ZeroSellAmount,
    #[error("buy amount must be greater than zero")]
    ZeroBuyAmount,
    #[error("a zero receiver must be given as no receiver")]
    ZeroReceiver,
}

/// The complete order data.
///
/// These are the exact fields that get signed and verified by the settlement
/// contract.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize, Hash)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    pub sell_token: Address,
    pub buy_token: Address,
    /// `None` pays out to the owner. The zero address means the same thing on
    /// chain, so it is never stored as `Some`.
    #[serde(default, deserialize_with = "deserialize_receiver")]
    pub receiver: Option<Address>,
    #[serde(with = "u256_decimal")]
    pub sell_amount: U256,
    #[serde(with = "u256_decimal")]
    pub buy_amount: U256,
    pub valid_to: u32,
    pub app_data: AppId,
    #[serde(with = "u256_decimal")]
    pub fee_amount: U256,
    pub kind: OrderKind,
    pub partially_fillable: bool,
    #[serde(default)]
    pub sell_token_balance: SellTokenSource,
    #[serde(default)]
    pub buy_token_balance: BuyTokenDestination,
}

impl OrderData {
    // See <https://github.com/cowprotocol/contracts/blob/v1.1.2/src/contracts/libraries/GPv2Order.sol#L47>
    pub const TYPE_HASH: [u8; 32] =
        hex!("d5a25ba2e97094ad7d83dc28a6572da797d6b3e7fc6663bd93efb789fc17e489");

    /// Returns the value of hashStruct() over the order data as defined by
    /// EIP-712.
    ///
    /// https://eips.ethereum.org/EIPS/eip-712#definition-of-hashstruct
    pub fn hash_struct(&self) -> [u8; 32] {
        let mut hash_data = [0u8; 416];
        hash_data[0..32].copy_from_slice(&Self::TYPE_HASH);
        // Some slots are not assigned (stay 0) because all values are extended
        // to 256 bits.
        hash_data[44..64].copy_from_slice(self.sell_token.as_slice());
        hash_data[76..96].copy_from_slice(self.buy_token.as_slice());
        hash_data[108..128].copy_from_slice(self.receiver.unwrap_or_default().as_slice());
        hash_data[128..160].copy_from_slice(&self.sell_amount.to_be_bytes::<32>());
        hash_data[160..192].copy_from_slice(&self.buy_amount.to_be_bytes::<32>());
        hash_data[220..224].copy_from_slice(&self.valid_to.to_be_bytes());
        hash_data[224..256].copy_from_slice(&self.app_data.0);
        hash_data[256..288].copy_from_slice(&self.fee_amount.to_be_bytes::<32>());
        hash_data[288..320].copy_from_slice(&self.kind.tag());
        hash_data[351] = self.partially_fillable as u8;
        hash_data[352..384].copy_from_slice(&self.sell_token_balance.tag());
        hash_data[384..416].copy_from_slice(&self.buy_token_balance.tag());
        keccak256(hash_data).0
    }

    /// The order digest: the EIP-712 signing hash of the order under the
    /// given domain.
    pub fn digest(&self, domain: &DomainContext) -> B256 {
        B256::new(hashed_eip712_message(
            domain.separator(),
            &self.hash_struct(),
        ))
    }

    pub fn uid(&self, domain: &DomainContext, owner: &Address) -> OrderUid {
        OrderUid::from_parts(self.digest(domain), *owner, self.valid_to)
    }

    /// Checks the invariants that can't be expressed in the type itself.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.sell_amount.is_zero() {
            return Err(OrderError::ZeroSellAmount);
        }
        if self.buy_amount.is_zero() {
            return Err(OrderError::ZeroBuyAmount);
        }
        if self.receiver.is_some_and(|receiver| receiver.is_zero()) {
            return Err(OrderError::ZeroReceiver);
        }
        Ok(())
    }
}

fn deserialize_receiver<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let receiver = Option::<Address>::deserialize(deserializer)?;
    Ok(receiver.filter(|receiver| !receiver.is_zero()))
}

// An order as provided to the orderbook by the frontend.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreation {
    #[serde(flatten)]
    pub data: OrderData,
    pub from: Option<Address>,
    #[serde(flatten)]
    pub signature: Signature,
    pub quote_id: Option<QuoteId>,
}

impl OrderCreation {
    /// Recovers the owner address for the specified domain, and then verifies
    /// it matches the expected address.
    ///
    /// Returns the recovered address on success, or an error if there is an
    /// issue performing the EC-recover or the recovered address does not match
    /// the expected one.
    pub fn verify_owner(&self, domain: &DomainSeparator) -> Result<Address, VerificationError> {
        self.signature
            .verify_owner(self.from, domain, &self.data.hash_struct())
    }

    /// The UID the order book assigns to this order once it is accepted.
    pub fn uid(&self, domain: &DomainContext) -> Result<OrderUid, VerificationError> {
        let owner = self.verify_owner(domain.separator())?;
        Ok(self.data.uid(domain, &owner))
    }
}

impl Default for OrderCreation {
    // Custom implementation to make sure the default order creation is valid.
    fn default() -> Self {
        Self {
            data: OrderData {
                valid_to: u32::MAX,
                ..Default::default()
            },
            from: None,
            signature: Signature::Eip712(EcdsaSignature::non_zero()),
            quote_id: None,
        }
    }
}

/// Cancellation of multiple orders.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancellations {
    pub order_uids: Vec<OrderUid>,
}

impl OrderCancellations {
    /// The EIP-712 type hash for order cancellations. Computed with:
    /// `keccak256("OrderCancellations(bytes[] orderUid)")`.
    const TYPE_HASH: [u8; 32] =
        hex!("4c89efb91ae246f78d2fe68b47db2fa1444a121a4f2dc3fda7a5a408c2e3588e");

    pub fn hash_struct(&self) -> [u8; 32] {
        let mut encoded_uids = Vec::with_capacity(32 * self.order_uids.len());
        for order_uid in &self.order_uids {
            encoded_uids.extend_from_slice(keccak256(order_uid.0).as_slice());
        }

        let array_hash = keccak256(&encoded_uids);

        let mut hash_data = [0u8; 64];
        hash_data[0..32].copy_from_slice(&Self::TYPE_HASH);
        hash_data[32..64].copy_from_slice(array_hash.as_slice());
        keccak256(hash_data).0
    }
}

/// Signed order cancellations.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOrderCancellations {
    #[serde(flatten)]
    pub data: OrderCancellations,
    pub signature: EcdsaSignature,
    pub signing_scheme: EcdsaSigningScheme,
}

impl SignedOrderCancellations {
    pub fn validate(&self, domain_separator: &DomainSeparator) -> Result<Address, SignatureError> {
        self.signature.recover(
            self.signing_scheme,
            domain_separator,
            &self.data.hash_struct(),
        )
    }
}

/// An order cancellation as provided to the orderbook by the frontend.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub struct OrderCancellation {
    pub order_uid: OrderUid,
    pub signature: EcdsaSignature,
    pub signing_scheme: EcdsaSigningScheme,
}

// EIP-712
impl OrderCancellation {
    // keccak256("OrderCancellation(bytes orderUid)")
    const TYPE_HASH: [u8; 32] =
        hex!("7b41b3a6e2b3cae020a3b2f9cdc997e0d420643957e7fea81747e984e47c88ec");

    pub fn hash_struct(&self) -> [u8; 32] {
        let mut hash_data = [0u8; 64];
        hash_data[0..32].copy_from_slice(&Self::TYPE_HASH);
        hash_data[32..64].copy_from_slice(keccak256(self.order_uid.0).as_slice());
        keccak256(hash_data).0
    }

    pub fn validate(&self, domain_separator: &DomainSeparator) -> Result<Address, SignatureError> {
        self.signature
            .recover(self.signing_scheme, domain_separator, &self.hash_struct())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[error("order uid must be 56 bytes long but got {0}")]
pub struct MalformedUid(pub usize);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UidParseError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error(transparent)]
    Malformed(#[from] MalformedUid),
}

// uid as 56 bytes: 32 for orderDigest, 20 for ownerAddress and 4 for validTo
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct OrderUid(pub [u8; 56]);

impl OrderUid {
    /// Create a UID from its parts.
    pub fn from_parts(digest: B256, owner: Address, valid_to: u32) -> Self {
        let mut uid = [0; 56];
        uid[0..32].copy_from_slice(digest.as_slice());
        uid[32..52].copy_from_slice(owner.as_slice());
        uid[52..56].copy_from_slice(&valid_to.to_be_bytes());
        Self(uid)
    }

    /// Splits an order UID into its parts.
    pub fn parts(&self) -> (B256, Address, u32) {
        let [.., a, b, c, d] = self.0;
        (
            B256::from_slice(&self.0[0..32]),
            Address::from_slice(&self.0[32..52]),
            u32::from_be_bytes([a, b, c, d]),
        )
    }
}

impl TryFrom<&[u8]> for OrderUid {
    type Error = MalformedUid;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| MalformedUid(bytes.len()))
    }
}

impl FromStr for OrderUid {
    type Err = UidParseError;

    fn from_str(s: &str) -> Result<OrderUid, UidParseError> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        Ok(OrderUid::try_from(bytes.as_slice())?)
    }
}

impl Display for OrderUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for OrderUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Default for OrderUid {
    fn default() -> Self {
        Self([0u8; 56])
    }
}

impl Serialize for OrderUid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

impl<'de> Deserialize<'de> for OrderUid {
    fn deserialize<D>(deserializer: D) -> Result<OrderUid, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor {}
        impl de::Visitor<'_> for Visitor {
            type Value = OrderUid;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an uid with orderDigest_owner_validTo")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let s = s.strip_prefix("0x").ok_or_else(|| {
                    de::Error::custom(format!(
                        "{s:?} can't be decoded as hex uid because it does not start with '0x'"
                    ))
                })?;
                s.parse().map_err(|err| {
                    de::Error::custom(format!("failed to decode {s:?} as hex uid: {err}"))
                })
            }
        }

        deserializer.deserialize_str(Visitor {})
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    #[default]
    Buy,
    Sell,
}

impl OrderKind {
    /// The lower case label whose hash identifies the kind on chain.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

/// Source from which the sellAmount should be drawn upon order fulfillment
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SellTokenSource {
    /// Direct ERC20 allowances to the Vault relayer contract
    #[default]
    Erc20,
    /// Internal balances to the Vault with GPv2 relayer approval
    Internal,
    /// ERC20 allowances to the Vault with GPv2 relayer approval
    External,
}

/// Destination for which the buyAmount should be transferred to order's
/// receiver to upon fulfillment
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum BuyTokenDestination {
    /// Pay trade proceeds as an ERC20 token transfer
    #[default]
    Erc20,
    /// Pay trade proceeds as a Vault internal balance transfer
    Internal,
}

#[cfg(test)]
pub(crate) mod tests {
    use {
        super::*,
        crate::signature::SigningScheme,
        alloy_signer::SignerSync,
        alloy_signer_local::PrivateKeySigner,
        serde_json::json,
    };

    /// The order used by the GPv2 contract test suite for its signing vectors.
    pub fn gpv2_test_order() -> OrderData {
        OrderData {
            sell_token: Address::repeat_byte(0x01),
            buy_token: Address::repeat_byte(0x02),
            receiver: Some(Address::repeat_byte(0x03)),
            sell_amount: U256::from(0x0246ddf97976680000_u128),
            buy_amount: U256::from(0xb98bc829a6f90000_u128),
            valid_to: 0xffffffff,
            app_data: AppId::default(),
            fee_amount: U256::from(0x0de0b6b3a7640000_u128),
            kind: OrderKind::Sell,
            partially_fillable: false,
            sell_token_balance: SellTokenSource::Erc20,
            buy_token_balance: BuyTokenDestination::Erc20,
        }
    }

    #[test]
    fn order_creation_serialization() {
        let owner = Address::repeat_byte(0x99);
        for (signature, signing_scheme, from, signature_bytes) in [
            (
                Signature::default_with(SigningScheme::Eip712),
                "eip712",
                Some(owner),
                "0x0000000000000000000000000000000000000000000000000000000000000000\
                   0000000000000000000000000000000000000000000000000000000000000000\
                   00",
            ),
            (
                Signature::default_with(SigningScheme::EthSign),
                "ethsign",
                None,
                "0x0000000000000000000000000000000000000000000000000000000000000000\
                   0000000000000000000000000000000000000000000000000000000000000000\
                   00",
            ),
            (Signature::PreSign, "presign", Some(owner), "0x"),
        ] {
            let order = OrderCreation {
                data: OrderData {
                    sell_token: Address::repeat_byte(0x11),
                    buy_token: Address::repeat_byte(0x22),
                    receiver: Some(Address::repeat_byte(0x33)),
                    sell_amount: U256::from(123),
                    buy_amount: U256::from(456),
                    valid_to: 1337,
                    app_data: AppId([0x44; 32]),
                    fee_amount: U256::from(789),
                    kind: OrderKind::Sell,
                    partially_fillable: false,
                    sell_token_balance: SellTokenSource::Erc20,
                    buy_token_balance: BuyTokenDestination::Erc20,
                },
                from,
                signature,
                quote_id: Some(42),
            };
            let order_json = json!({
                "sellToken": "0x1111111111111111111111111111111111111111",
                "buyToken": "0x2222222222222222222222222222222222222222",
                "receiver": "0x3333333333333333333333333333333333333333",
                "sellAmount": "123",
                "buyAmount": "456",
                "validTo": 1337,
                "appData": "0x4444444444444444444444444444444444444444444444444444444444444444",
                "feeAmount": "789",
                "kind": "sell",
                "partiallyFillable": false,
                "sellTokenBalance": "erc20",
                "buyTokenBalance": "erc20",
                "quoteId": 42,
                "signingScheme": signing_scheme,
                "signature": signature_bytes,
                "from": from.map(|_| "0x9999999999999999999999999999999999999999"),
            });

            assert_eq!(json!(order), order_json);
            assert_eq!(order, serde_json::from_value(order_json).unwrap());
        }
    }

    #[test]
    fn balances_default_to_erc20() {
        let order: OrderData = serde_json::from_value(json!({
            "sellToken": "0x1111111111111111111111111111111111111111",
            "buyToken": "0x2222222222222222222222222222222222222222",
            "sellAmount": "1000000000000000000",
            "buyAmount": "650942340000000000000",
            "validTo": 1704272801,
            "appData": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "feeAmount": "0",
            "kind": "sell",
            "partiallyFillable": false,
        }))
        .unwrap();
        assert_eq!(order.receiver, None);
        assert_eq!(order.sell_token_balance, SellTokenSource::Erc20);
        assert_eq!(order.buy_token_balance, BuyTokenDestination::Erc20);
        assert_eq!(
            order.buy_amount,
            U256::from(650_942_340_000_000_000_000_u128)
        );
    }

    // from the test `should recover signing address for all supported ECDSA-based schemes` in
    // <https://github.com/cowprotocol/contracts/blob/v1.1.2/test/GPv2Signing.test.ts#L280>.
    #[test]
    fn order_creation_signature() {
        let domain_separator = DomainSeparator(hex!(
            "74e0b11bd18120612556bae4578cfd3a254d7e2495f543c569a92ff5794d9b09"
        ));
        let expected_owner = Address::from(hex!("70997970C51812dc3A010C7d01b50e0d17dc79C8"));

        for (signing_scheme, signature) in [
            (
                SigningScheme::Eip712,
                hex!(
                    "59c0f5c151071c1320575f6da826a6c276525bbe733234bad1afb2879657d65d
                     2afe6812746f4cc97f28f3a5dfdbfc7087511695d23da5e9792cd7ed6c9ddeb7
                     1c"
                ),
            ),
            (
                SigningScheme::EthSign,
                hex!(
                    "bf3bc5a9b60d08dc05768320553ba59a6f301d985903618cfc002e8a61cb78b5
                     5d4a474a43a60193d90cda35ff2764f3913b47e5b5b87770064f549fe871afcc
                     1b"
                ),
            ),
        ] {
            let order = OrderCreation {
                data: gpv2_test_order(),
                from: Some(expected_owner),
                signature: Signature::from_bytes(signing_scheme, &signature).unwrap(),
                quote_id: None,
            };

            assert_eq!(order.verify_owner(&domain_separator).unwrap(), expected_owner);
        }
    }

    // from the test `should compute order unique identifier` in
    // <https://github.com/cowprotocol/contracts/blob/v1.1.2/test/GPv2Signing.test.ts#L143>
    #[test]
    fn compute_order_uid() {
        let domain_separator = DomainSeparator(hex!(
            "74e0b11bd18120612556bae4578cfd3a254d7e2495f543c569a92ff5794d9b09"
        ));
        let owner = Address::from(hex!("70997970C51812dc3A010C7d01b50e0d17dc79C8"));
        let order = gpv2_test_order();
        let digest = B256::new(hashed_eip712_message(
            &domain_separator,
            &order.hash_struct(),
        ));

        assert_eq!(
            OrderUid::from_parts(digest, owner, order.valid_to).0,
            hex!(
                "0e45d31fd31b28c26031cdd81b35a8938b2ccca2cc425fcf440fd3bfed1eede9
                 70997970c51812dc3a010c7d01b50e0d17dc79c8
                 ffffffff"
            ),
        );
    }

    #[test]
    fn digest_is_deterministic_and_covers_every_field() {
        let domain = DomainContext::new(1, Address::repeat_byte(0x90)).unwrap();
        let order = gpv2_test_order();
        assert_eq!(order.digest(&domain), order.digest(&domain));

        let variations = [
            OrderData {
                sell_token: Address::repeat_byte(0x04),
                ..order
            },
            OrderData {
                buy_token: Address::repeat_byte(0x04),
                ..order
            },
            OrderData {
                receiver: None,
                ..order
            },
            OrderData {
                sell_amount: order.sell_amount + U256::from(1),
                ..order
            },
            OrderData {
                buy_amount: order.buy_amount + U256::from(1),
                ..order
            },
            OrderData {
                valid_to: 0,
                ..order
            },
            OrderData {
                app_data: AppId([1; 32]),
                ..order
            },
            OrderData {
                fee_amount: U256::ZERO,
                ..order
            },
            OrderData {
                kind: OrderKind::Buy,
                ..order
            },
            OrderData {
                partially_fillable: true,
                ..order
            },
            OrderData {
                sell_token_balance: SellTokenSource::External,
                ..order
            },
            OrderData {
                buy_token_balance: BuyTokenDestination::Internal,
                ..order
            },
        ];
        for variation in variations {
            assert_ne!(variation.digest(&domain), order.digest(&domain));
        }
        let other_chain = DomainContext::new(100, Address::repeat_byte(0x90)).unwrap();
        assert_ne!(order.digest(&other_chain), order.digest(&domain));
    }

    #[test]
    fn digest_and_uid_use_the_context_separator() {
        let owner = Address::repeat_byte(0x70);
        let order = gpv2_test_order();
        let domain = DomainContext::new(31337, Address::repeat_byte(0x90)).unwrap();
        let digest = B256::new(hashed_eip712_message(
            domain.separator(),
            &order.hash_struct(),
        ));
        assert_eq!(order.digest(&domain), digest);
        assert_eq!(
            order.uid(&domain, &owner),
            OrderUid::from_parts(digest, owner, order.valid_to)
        );

        let signer = PrivateKeySigner::from_bytes(&B256::repeat_byte(0x05)).unwrap();
        let creation = OrderCreation {
            data: order,
            from: Some(signer.address()),
            signature: Signature::Eip712(signer.sign_hash_sync(&digest).unwrap().into()),
            quote_id: None,
        };
        assert_eq!(
            creation.uid(&domain).unwrap(),
            order.uid(&domain, &signer.address())
        );

        // A context can't be built for an unusable domain, so neither can a digest.
        assert!(DomainContext::new(0, Address::repeat_byte(0x90)).is_err());
        assert!(DomainContext::new(1, Address::ZERO).is_err());
    }

    #[test]
    fn zero_receiver_hashes_like_no_receiver() {
        let order = gpv2_test_order();
        assert_eq!(
            OrderData {
                receiver: None,
                ..order
            }
            .hash_struct(),
            OrderData {
                receiver: Some(Address::ZERO),
                ..order
            }
            .hash_struct(),
        );
    }

    #[test]
    fn validate_rejects_zero_amounts() {
        let order = gpv2_test_order();
        assert_eq!(order.validate(), Ok(()));
        assert_eq!(
            OrderData {
                sell_amount: U256::ZERO,
                ..order
            }
            .validate(),
            Err(OrderError::ZeroSellAmount)
        );
        assert_eq!(
            OrderData {
                buy_amount: U256::ZERO,
                ..order
            }
            .validate(),
            Err(OrderError::ZeroBuyAmount)
        );
        assert_eq!(
            OrderData {
                receiver: Some(Address::ZERO),
                ..order
            }
            .validate(),
            Err(OrderError::ZeroReceiver)
        );
    }

    #[test]
    fn zero_receiver_deserializes_as_no_receiver() {
        let mut order_json = json!({
            "sellToken": "0x1111111111111111111111111111111111111111",
            "buyToken": "0x2222222222222222222222222222222222222222",
            "receiver": "0x0000000000000000000000000000000000000000",
            "sellAmount": "1",
            "buyAmount": "1",
            "validTo": 0,
            "appData": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "feeAmount": "0",
            "kind": "sell",
            "partiallyFillable": false,
        });
        let order: OrderData = serde_json::from_value(order_json.clone()).unwrap();
        assert_eq!(order.receiver, None);
        assert_eq!(order.validate(), Ok(()));

        order_json["receiver"] = json!(null);
        let explicit_null: OrderData = serde_json::from_value(order_json).unwrap();
        assert_eq!(explicit_null, order);
    }

    #[test]
    fn order_cancellation_signature_typed_data() {
        let domain_separator = DomainSeparator(hex!(
            "f8a1143d44c67470a791201b239ff6b0ecc8910aa9682bebd08145f5fd84722b"
        ));

        let expected_owner = Address::from(hex!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));

        let eip712_signature = hex!(
            "f2c69310a4dbcd78feabfd802df296ca4650681e01872f667251916ed3e9a2e1
             4928382316607594a77c620e4bc4536e6fe145ee993a5ccc38fda929e8683023
             1b"
        );
        let ethsign_signature = hex!(
            "5fef0aed159777403f964da946b2b6c7d2ca6a931f009328c17ed481bf5fe25b
             46c8da3dfdca2657c9e6e7fbd3a1abbf52ee0ccaf610395fb2445256f5d24eb4
             1b"
        );

        for (signing_scheme, signature) in [
            (EcdsaSigningScheme::Eip712, eip712_signature),
            (EcdsaSigningScheme::EthSign, ethsign_signature),
        ] {
            let cancellation = OrderCancellation {
                order_uid: OrderUid([0x2a; 56]),
                signature: EcdsaSignature::from_bytes(&signature),
                signing_scheme,
            };
            let owner = cancellation.validate(&domain_separator).unwrap();
            assert_eq!(owner, expected_owner);
        }
    }

    #[test]
    fn order_cancellations_struct_hash() {
        // Generated with Ethers.js as a reference EIP-712 hashing impl.
        for (order_uids, struct_hash) in [
            (
                vec![],
                hex!("56acdb3034898c6c23971cb3f92c32a4739e89a13c85282547025583a93911bd"),
            ),
            (
                vec![OrderUid([0x11; 56]), OrderUid([0x22; 56])],
                hex!("405f6cb53d87901a5385a824a99c94b43146547f5ea3623f8d2f50b925e97a8b"),
            ),
        ] {
            let cancellations = OrderCancellations { order_uids };
            assert_eq!(cancellations.hash_struct(), struct_hash);
        }
    }

    #[test]
    fn signed_cancellations_recover_signer() {
        let signer = PrivateKeySigner::from_bytes(&B256::repeat_byte(0x07)).unwrap();
        let domain = DomainSeparator([0x17; 32]);
        let data = OrderCancellations {
            order_uids: vec![OrderUid([0x11; 56]), OrderUid([0x22; 56])],
        };
        let message = hashed_eip712_message(&domain, &data.hash_struct());
        let signature = signer.sign_hash_sync(&B256::new(message)).unwrap();

        let cancellations = SignedOrderCancellations {
            data,
            signature: signature.into(),
            signing_scheme: EcdsaSigningScheme::Eip712,
        };
        assert_eq!(cancellations.validate(&domain).unwrap(), signer.address());
    }

    #[test]
    fn uid_is_displayed_as_hex() {
        let mut uid = OrderUid([0u8; 56]);
        uid.0[0] = 0x01;
        uid.0[55] = 0xff;
        let expected = "0x01000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000ff";
        assert_eq!(uid.to_string(), expected);
        assert_eq!(format!("{uid:?}"), expected);
        assert_eq!(expected.parse::<OrderUid>().unwrap(), uid);
        assert_eq!(json!(uid), json!(expected));
    }

    #[test]
    fn uid_parts_round_trip() {
        let digest = B256::repeat_byte(0x42);
        let owner = Address::repeat_byte(0x13);
        for valid_to in [0, 1, 0x01020304, u32::MAX] {
            let uid = OrderUid::from_parts(digest, owner, valid_to);
            assert_eq!(uid.parts(), (digest, owner, valid_to));
        }
    }

    #[test]
    fn uid_valid_to_is_big_endian() {
        let uid = OrderUid::from_parts(B256::ZERO, Address::ZERO, 0x01020304);
        assert_eq!(uid.0[52..], [1, 2, 3, 4]);
    }

    #[test]
    fn decomposes_published_uid() {
        let uid: OrderUid = "0x8464affce2df48b60f6976e51414dbc079e9c30ef64f4c1f78c7abe2c7f96a0c\
                             29104bb91ada737a89393c78335e48ff4708727e\
                             659523a1"
            .parse()
            .unwrap();
        let (digest, owner, valid_to) = uid.parts();
        assert_eq!(
            digest,
            B256::new(hex!(
                "8464affce2df48b60f6976e51414dbc079e9c30ef64f4c1f78c7abe2c7f96a0c"
            ))
        );
        assert_eq!(
            owner,
            Address::from(hex!("29104bb91ada737a89393c78335e48ff4708727e"))
        );
        assert_eq!(valid_to, 0x659523a1);
        assert_eq!(OrderUid::from_parts(digest, owner, valid_to), uid);
    }

    #[test]
    fn uid_from_bytes_requires_exact_length() {
        assert_eq!(
            OrderUid::try_from([0u8; 56].as_slice()),
            Ok(OrderUid::default())
        );
        assert_eq!(
            OrderUid::try_from([0u8; 55].as_slice()),
            Err(MalformedUid(55))
        );
        assert_eq!(
            OrderUid::try_from([0u8; 57].as_slice()),
            Err(MalformedUid(57))
        );
        assert_eq!(
            "0x1234".parse::<OrderUid>(),
            Err(UidParseError::Malformed(MalformedUid(2)))
        );
        assert_eq!(
            "11".repeat(57).parse::<OrderUid>(),
            Err(UidParseError::Malformed(MalformedUid(57)))
        );
        assert!(matches!(
            "0x123".parse::<OrderUid>(),
            Err(UidParseError::Hex(_))
        ));
        assert!(matches!(
            "0xzz".parse::<OrderUid>(),
            Err(UidParseError::Hex(_))
        ));
    }

    #[test]
    fn uid_deserialization_requires_prefix() {
        let hex = "11".repeat(56);
        assert!(serde_json::from_value::<OrderUid>(json!(hex)).is_err());
        assert_eq!(
            serde_json::from_value::<OrderUid>(json!(format!("0x{hex}"))).unwrap(),
            OrderUid([0x11; 56])
        );

        let err = serde_json::from_value::<OrderUid>(json!("0x1234")).unwrap_err();
        assert!(
            err.to_string()
                .contains("order uid must be 56 bytes long but got 2")
        );
    }
}
