use terraform_provider_passwordstate::{PROVIDER_NAME, PasswordStateProvider, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting PasswordState provider");

    tf_provider::serve(PROVIDER_NAME, PasswordStateProvider::new())
        .await
        .map_err(|e| anyhow::anyhow!("provider server stopped: {e}"))
}
