use clap::{Parser, Subcommand};
use std::ffi::OsString;

// Long flags also accepted with a single dash, as in `add -block <DATA>`
const SINGLE_DASH_FLAGS: [&str; 3] = ["block", "blocks", "node-id"];

/// Rewrites `-block`, `-blocks`, and `-node-id` (also in `-flag=value` form) to
/// their `--` spelling, since clap only reads long flags after two dashes.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            let rewritten = arg.to_str().and_then(|text| {
                let flag = text.strip_prefix('-')?;
                if flag.starts_with('-') {
                    return None;
                }
                let name = flag.split('=').next().unwrap_or(flag);
                SINGLE_DASH_FLAGS
                    .contains(&name)
                    .then(|| OsString::from(format!("-{text}")))
            });
            rewritten.unwrap_or(arg)
        })
        .collect()
}

#[derive(Debug, Parser)]
#[command(name = "ledger-chain", about = "Single-node proof-of-work ledger with wallets")]
pub struct Opt {
    #[arg(
        long = "node-id",
        global = true,
        help = "Node identifier selecting the wallet file (overrides NODE_ID)"
    )]
    pub node_id: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    #[command(name = "add", about = "Seal a new block carrying DATA and append it")]
    Add {
        #[arg(long = "block", value_name = "DATA", help = "Payload stored in the block")]
        block: String,
    },
    #[command(
        name = "print",
        alias = "printchain",
        about = "Print all blocks from the tip back to genesis"
    )]
    Print {
        #[arg(long = "blocks", hide = true)]
        blocks: bool,
    },
    #[command(name = "verify", about = "Re-check every seal and link in the ledger")]
    Verify,
    #[command(name = "createwallet", about = "Create a new wallet")]
    Createwallet,
    #[command(name = "listaddresses", about = "Print local wallet addresses")]
    ListAddresses,
    #[command(name = "validateaddress", about = "Check an address checksum")]
    ValidateAddress {
        #[arg(help = "The wallet address")]
        address: String,
    },
}
