use std::sync::Arc;

use anyhow::Context;

use tallybook_core::{Money, WalletId};
use tallybook_infra::{InMemoryWalletRepository, TransferConfig, WalletRepository, WalletService};

fn print_balances<R: WalletRepository>(
    service: &WalletService<R>,
    ids: &[&WalletId],
) -> anyhow::Result<()> {
    for id in ids {
        let wallet = service
            .get_wallet(id)
            .with_context(|| format!("failed to load wallet {id}"))?;
        println!("{}: {}", wallet.owner(), wallet.balance());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tallybook_observability::init();

    let config = TransferConfig::from_env().context("invalid transfer configuration")?;
    let service = WalletService::with_config(Arc::new(InMemoryWalletRepository::new()), config);

    let alice: WalletId = "alice".parse()?;
    let bob: WalletId = "bob".parse()?;

    service
        .create_wallet(alice.clone(), "Alice Smith", Money::new(10_000)?)
        .context("failed to create Alice's wallet")?;
    service
        .create_wallet(bob.clone(), "Bob Jones", Money::new(5_000)?)
        .context("failed to create Bob's wallet")?;

    println!("Initial balances:");
    print_balances(&service, &[&alice, &bob])?;

    let amount = Money::new(2_500)?;
    println!("\nTransferring {amount} from Alice to Bob...");
    service
        .transfer(&alice, &bob, amount)
        .context("transfer failed")?;

    println!("\nFinal balances:");
    print_balances(&service, &[&alice, &bob])?;

    tracing::debug!("demo finished");
    Ok(())
}
