use anyhow::Result;
use checkout_client::{ApprovalSource, CheckoutFlow, CheckoutState, ProxyClient};
use checkout_sdk::CartItem;
use clap::Args;

use crate::prompt::Prompt;

#[derive(Args)]
pub struct PayArgs {
    /// Cart line as ID or ID:QUANTITY; repeatable
    #[arg(short, long = "item", value_parser = parse_item, default_value = "YOUR_PRODUCT_ID")]
    items: Vec<CartItem>,

    /// How many times a declined funding source may restart checkout
    #[arg(long, default_value_t = checkout_client::DEFAULT_MAX_RESTARTS)]
    max_restarts: u32,
}

impl PayArgs {
    /// Returns whether the payment was captured.
    pub async fn run(self, client: &ProxyClient, prompt: &mut Prompt) -> Result<bool> {
        let mut flow = CheckoutFlow::new(self.max_restarts);

        loop {
            if let CheckoutState::OrderCreated(id) = flow.create_order(client, &self.items).await? {
                println!("Order {id} created");
            }
            if let Some(link) = flow.approve_link() {
                println!("Approve the payment at {link}");
            }
            if flow.state().is_terminal() {
                break;
            }

            if prompt.line("Press Enter once the payment is approved...").await?.is_none() {
                println!("Checkout abandoned");
                return Ok(false);
            }
            flow.approve(client, ApprovalSource::Wallet).await?;
            if flow.state().is_terminal() {
                break;
            }
            println!(
                "Payment method declined, restarting checkout ({}/{})",
                flow.restarts(),
                self.max_restarts
            );
        }

        if let Some(message) = flow.message() {
            println!("{message}");
        }
        Ok(matches!(flow.state(), CheckoutState::Captured(_)))
    }
}

fn parse_item(raw: &str) -> Result<CartItem, String> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, qty)) => (id, qty.parse().map_err(|_| format!("invalid quantity: {qty}"))?),
        None => (raw, 1),
    };
    if id.is_empty() {
        return Err("item id must not be empty".to_owned());
    }
    Ok(CartItem {
        id: id.to_owned(),
        quantity,
    })
}
