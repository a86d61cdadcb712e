//! Interactive CLI for a Privy delegated wallet
//!
//! Run with: cargo run --example delegated_wallet
//!
//! Requires PRIVY_APP_ID, PRIVY_APP_SECRET, PRIVY_AUTHORIZATION_PRIVATE_KEY
//! and PRIVY_WALLET_ID. NETWORK_ID defaults to base-sepolia.

use std::io::{self, Write};

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash};
use privy_evm_wallet::contracts::IERC20;
use privy_evm_wallet::{EvmWalletProvider, PrivyEvmWalletProvider, WalletConfig};

type Wallet = PrivyEvmWalletProvider<privy_evm_wallet::AlloyChainClient>;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = WalletConfig::from_env()?;
    let wallet = PrivyEvmWalletProvider::configure_with_wallet(config).await?;

    println!("\n========================================");
    println!("     Privy Delegated Wallet CLI");
    println!("========================================");
    println!("Wallet:  {}", wallet.address());
    println!(
        "Network: {} (chain {})",
        wallet.network().network_id,
        wallet.network().chain_id
    );

    loop {
        println!("\n----------------------------------------");
        println!("Select an option:");
        println!("  1. View balance");
        println!("  2. Sign message");
        println!("  3. Send ETH");
        println!("  4. Token balance");
        println!("  q. Quit");
        println!("----------------------------------------");

        let choice = prompt("Enter choice: ")?;
        match choice.as_str() {
            "1" => view_balance(&wallet).await?,
            "2" => sign_message_flow(&wallet).await?,
            "3" => send_eth_flow(&wallet).await?,
            "4" => token_balance_flow(&wallet).await?,
            "q" | "Q" => {
                println!("\nGoodbye!");
                break;
            }
            _ => println!("Invalid choice"),
        }
    }

    Ok(())
}

fn prompt(label: &str) -> eyre::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

async fn view_balance(wallet: &Wallet) -> eyre::Result<()> {
    let balance = wallet.get_balance().await?;
    println!("Balance: {} ETH", format_ether(balance));
    Ok(())
}

async fn sign_message_flow(wallet: &Wallet) -> eyre::Result<()> {
    let message = prompt("Message: ")?;
    let signature = wallet.sign_message(&message).await?;
    println!("Signature: {}", signature);
    Ok(())
}

async fn send_eth_flow(wallet: &Wallet) -> eyre::Result<()> {
    let to: Address = prompt("Recipient: ")?.parse()?;
    let amount = prompt("Amount (ETH): ")?;

    let hash = wallet.native_transfer(to, &amount).await?;
    println!("Submitted: {}", hash);

    // Only a 32-byte hash can be polled
    if let Ok(hash) = TxHash::try_from(&hash[..]) {
        println!("Waiting for confirmation...");
        let receipt = wallet.wait_for_transaction_receipt(hash).await?;
        println!(
            "Status: {:?} (block {:?}, gas used {})",
            receipt.status, receipt.block_number, receipt.gas_used
        );
    }
    Ok(())
}

async fn token_balance_flow(wallet: &Wallet) -> eyre::Result<()> {
    let token: Address = prompt("Token address: ")?.parse()?;

    let symbol = wallet.read_contract_call(token, &IERC20::symbolCall {}).await?;
    let balance = wallet
        .read_contract_call(
            token,
            &IERC20::balanceOfCall {
                account: wallet.address(),
            },
        )
        .await?;

    println!("Balance: {} {}", balance, symbol);
    Ok(())
}
