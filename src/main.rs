// Entry point for the ledger CLI
// All the real work lives in the library; here I parse arguments, run one command,
// and decide the exit code
use clap::Parser;
use data_encoding::HEXLOWER;
use ledger_chain::cli::normalize_args;
use ledger_chain::core::leading_zero_bits;
use ledger_chain::{
    validate_address, Blockchain, Command, Opt, ProofOfWork, Wallets, GLOBAL_CONFIG,
};
use log::{error, LevelFilter};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Info level by default; RUST_LOG still wins when it is set
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = match Opt::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(opt) => opt,
        Err(e) => {
            // Usage problems print the usage text and never touch the ledger or wallets
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    if let Some(node_id) = opt.node_id {
        GLOBAL_CONFIG.set_node_id(node_id);
    }

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // Seal a block on top of the current tip
        Command::Add { block } => {
            let mut blockchain = Blockchain::initialize()?;
            let sealed = blockchain.add_block(block.as_bytes())?;
            println!("Added block {}", HEXLOWER.encode(sealed.get_hash()));
            blockchain.close()?;
        }
        // Walk from the tip back to genesis
        Command::Print { .. } => {
            let blockchain = Blockchain::initialize()?;
            let settings = blockchain.get_settings();
            for block in blockchain.iterator() {
                let block = block?;
                println!("{block}");
                println!(
                    "PoW: {} ({} leading zero bits)",
                    ProofOfWork::is_valid(&block, settings),
                    leading_zero_bits(block.get_hash())
                );
                println!();
            }
        }
        Command::Verify => {
            let blockchain = Blockchain::initialize()?;
            let count = blockchain.verify_chain()?;
            println!("Ledger is valid: {count} blocks from tip to genesis");
        }
        Command::Createwallet => {
            let node_id = GLOBAL_CONFIG.get_node_id();
            let mut wallets = Wallets::create(&node_id)?;
            let address = wallets.add_wallet()?;
            wallets.save(&node_id)?;
            println!("Your new address: {address}");
        }
        Command::ListAddresses => {
            let node_id = GLOBAL_CONFIG.get_node_id();
            let wallets = Wallets::create(&node_id)?;
            if !wallets.loaded_from_file() {
                println!("No wallet file for node {node_id}");
            }
            for address in wallets.get_all_addresses() {
                println!("{address}");
            }
        }
        Command::ValidateAddress { address } => {
            println!("Address {address} valid: {}", validate_address(&address));
        }
    }
    Ok(())
}
