//! Bindings for the parts of the settlement contract that concern order
//! authorization, and the call data owners send to change it.

use {
    alloy::{
        primitives::{U256, keccak256},
        sol_types::SolCall,
    },
    model::order::OrderUid,
    std::sync::LazyLock,
};

alloy::sol! {
    #[sol(rpc)]
    interface IERC1271 {
        function isValidSignature(bytes32 hash, bytes signature) external view returns (bytes4 magicValue);
    }

    #[sol(rpc)]
    interface GPv2Settlement {
        function preSignature(bytes orderUid) external view returns (uint256);
        function filledAmount(bytes orderUid) external view returns (uint256);
        function setPreSignature(bytes orderUid, bool signed) external;
        function invalidateOrder(bytes orderUid) external;
    }
}

/// Value `preSignature` holds for pre-signed orders.
pub static PRE_SIGNED: LazyLock<U256> =
    LazyLock::new(|| U256::from_be_bytes(keccak256("GPv2Signing.Scheme.PreSign").0));

/// `filledAmount` of an order that was invalidated by its owner.
pub const INVALIDATED: U256 = U256::MAX;

/// Call data for `setPreSignature`. Must be sent by the order owner.
pub fn set_pre_signature(uid: &OrderUid, signed: bool) -> Vec<u8> {
    GPv2Settlement::setPreSignatureCall {
        orderUid: uid.0.to_vec().into(),
        signed,
    }
    .abi_encode()
}

/// Call data for `invalidateOrder`. Must be sent by the order owner and can't
/// be undone.
pub fn invalidate_order(uid: &OrderUid) -> Vec<u8> {
    GPv2Settlement::invalidateOrderCall {
        orderUid: uid.0.to_vec().into(),
    }
    .abi_encode()
}
