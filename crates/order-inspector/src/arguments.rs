use {
    alloy::primitives::{Address, B256, Bytes},
    clap::{Parser, Subcommand},
    model::{aux_data::PackedAuxData, order::OrderUid},
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
    },
    url::Url,
};

#[derive(Parser)]
#[clap(name = "order-inspector", about = "Hash, identify, decode and verify orders")]
pub struct Arguments {
    #[clap(long, env, default_value = "warn,order_inspector=info")]
    pub log_filter: String,

    /// Output log events as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,

    /// Chain the orders live on. Selects the settlement contract deployment
    /// unless one is given explicitly.
    #[clap(long, env, default_value = "1")]
    pub chain_id: u64,

    /// Settlement contract to hash against instead of the known deployment.
    #[clap(long, env)]
    pub settlement_contract: Option<Address>,

    /// Node used for checks that need chain state. Without it, EIP-1271 and
    /// pre-signed orders can't be verified.
    #[clap(long, env)]
    pub node_url: Option<Url>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prints the EIP-712 struct hash and digest of an order.
    Hash {
        /// JSON file with the order in the order book API format.
        #[clap(long)]
        order: PathBuf,
    },
    /// Computes the UID an order gets for the given owner.
    Uid {
        #[clap(long)]
        order: PathBuf,
        #[clap(long)]
        owner: Address,
    },
    /// Splits an order UID into digest, owner and validTo.
    DecodeUid { uid: OrderUid },
    /// Unpacks the quote id and validTo from ETH-flow aux data.
    DecodeAux { aux_data: PackedAuxData },
    /// Reconstructs the order from an `OrderPlacement` event log.
    DecodePlacement {
        /// Log topics in order, starting with the event signature.
        #[clap(long = "topic", required = true)]
        topics: Vec<B256>,
        #[clap(long)]
        data: Bytes,
    },
    /// Checks that the signature of an order creation authorizes it.
    Verify {
        /// JSON file with the order creation request body.
        #[clap(long)]
        order: PathBuf,
    },
    /// Prints the settlement call the owner sends to pre-sign an order.
    PreSignCallData {
        uid: OrderUid,
        /// Revoke an existing pre-signature instead.
        #[clap(long)]
        revoke: bool,
    },
    /// Prints the settlement call the owner sends to cancel an order on
    /// chain for good.
    InvalidateCallData { uid: OrderUid },
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            use_json_logs,
            chain_id,
            settlement_contract,
            node_url,
            command,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        writeln!(f, "chain_id: {chain_id}")?;
        display_option(f, "settlement_contract", settlement_contract)?;
        // Node URLs often embed API keys.
        display_option(f, "node_url", &node_url.as_ref().map(|_| "SECRET"))?;
        writeln!(f, "command: {command:?}")?;
        Ok(())
    }
}

pub fn display_option(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<impl Display>,
) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}
