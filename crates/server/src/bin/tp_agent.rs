use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tp_server::main_entry().await
}
