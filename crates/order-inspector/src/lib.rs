pub mod arguments;
pub mod commands;

use {
    alloy::{
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    anyhow::{Context, Result},
    arguments::{Arguments, Command},
    model::{
        DomainContext,
        DomainRegistry,
        order::{OrderCreation, OrderData},
    },
    serde::{Serialize, de::DeserializeOwned},
    signature_validator::{Authorizer, Erc1271SignatureValidator, SettlementPreSignatures},
    std::{path::Path, sync::Arc},
    url::Url,
};

pub async fn run(args: Arguments) -> Result<()> {
    let domain = domain(&args)?;
    tracing::debug!(
        chain_id = domain.chain_id(),
        settlement = %domain.settlement_contract(),
        separator = ?domain.separator(),
        "using domain"
    );

    match &args.command {
        Command::Hash { order } => {
            let order: OrderData = read_json(order)?;
            print(&commands::hash(&order, &domain))
        }
        Command::Uid { order, owner } => {
            let order: OrderData = read_json(order)?;
            print(&commands::uid(&order, *owner, &domain))
        }
        Command::DecodeUid { uid } => print(&commands::decode_uid(uid)),
        Command::DecodeAux { aux_data } => print(&commands::decode_aux(aux_data)),
        Command::DecodePlacement { topics, data } => print(&commands::decode_placement(
            topics.clone(),
            data.clone(),
            &domain,
        )?),
        Command::PreSignCallData { uid, revoke } => {
            print(&commands::pre_sign_call_data(uid, !revoke, &domain))
        }
        Command::InvalidateCallData { uid } => {
            print(&commands::invalidate_call_data(uid, &domain))
        }
        Command::Verify { order } => {
            let order: OrderCreation = read_json(order)?;
            let chain = args.node_url.as_ref().map(|url| {
                let provider = provider(url.clone());
                let pre_signatures = Arc::new(SettlementPreSignatures::new(
                    domain.settlement_contract(),
                    provider.clone(),
                ));
                commands::ChainAccess {
                    authorizer: Authorizer::new(
                        domain,
                        Arc::new(Erc1271SignatureValidator::new(provider)),
                        pre_signatures.clone(),
                    ),
                    pre_signatures,
                }
            });
            print(&commands::verify(&order, &domain, chain.as_ref()).await?)
        }
    }
}

fn domain(args: &Arguments) -> Result<DomainContext> {
    let domain = match args.settlement_contract {
        Some(settlement) => DomainContext::new(args.chain_id, settlement)?,
        None => DomainRegistry::global().get(args.chain_id)?,
    };
    Ok(domain)
}

fn provider(url: Url) -> DynProvider {
    let rpc = ClientBuilder::default().http(url);
    ProviderBuilder::new().connect_client(rpc).erased()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn print(output: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::Address,
        clap::Parser,
        model::domain::{SETTLEMENT_CONTRACT, networks},
        std::io::Write,
    };

    #[test]
    fn resolves_domains() {
        let args =
            Arguments::try_parse_from(["order-inspector", "decode-aux", "0x000000000000000000000000"])
                .unwrap();
        let mainnet = domain(&args).unwrap();
        assert_eq!(mainnet.chain_id(), networks::MAINNET);
        assert_eq!(mainnet.settlement_contract(), SETTLEMENT_CONTRACT);

        let custom = Address::repeat_byte(0x90);
        let args = Arguments::try_parse_from([
            "order-inspector",
            "--chain-id",
            "31337",
            "--settlement-contract",
            &custom.to_string(),
            "decode-aux",
            "0x000000000000000000000000",
        ])
        .unwrap();
        assert_eq!(domain(&args).unwrap().settlement_contract(), custom);

        let args = Arguments::try_parse_from([
            "order-inspector",
            "--chain-id",
            "31337",
            "decode-aux",
            "0x000000000000000000000000",
        ])
        .unwrap();
        assert!(domain(&args).is_err());
    }

    #[test]
    fn reads_orders_from_json_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "sellToken": "0x0101010101010101010101010101010101010101",
                "buyToken": "0x0202020202020202020202020202020202020202",
                "sellAmount": "1000",
                "buyAmount": "2000",
                "validTo": 1704272801,
                "appData": "0x0000000000000000000000000000000000000000000000000000000000000000",
                "feeAmount": "0",
                "kind": "sell",
                "partiallyFillable": false
            }}"#
        )
        .unwrap();

        let order: OrderData = read_json(file.path()).unwrap();
        assert_eq!(order.sell_token, Address::repeat_byte(1));
        assert_eq!(order.valid_to, 1_704_272_801);

        let missing = file.path().with_extension("missing");
        assert!(read_json::<OrderData>(&missing).is_err());
    }
}
