use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    testforge_cli::main_entry().await
}
