use anyhow::{Result, bail};
use checkout_client::{ProxyClient, refund_trigger};
use checkout_sdk::CaptureId;
use clap::Args;

use crate::prompt::Prompt;

#[derive(Args)]
pub struct RefundArgs {
    /// Capture to refund; prompted for when omitted
    #[arg(long)]
    capture_id: Option<String>,
}

impl RefundArgs {
    /// Returns whether the refund went through.
    pub async fn run(self, client: &ProxyClient, prompt: &mut Prompt) -> Result<bool> {
        let capture_id = match self.capture_id {
            Some(id) => id,
            None => match prompt.line("Captured payment id: ").await? {
                Some(id) if !id.is_empty() => id,
                _ => bail!("no captured payment id given"),
            },
        };

        let notice = refund_trigger(client, &CaptureId::new(capture_id)).await;
        println!("{}", notice.message());
        Ok(notice.is_success())
    }
}
