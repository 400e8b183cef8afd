#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kanjitrack_backend::run().await
}
