#[tokio::main]
async fn main() {
    showup_backend::run().await;
}
