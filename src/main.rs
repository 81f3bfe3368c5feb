#[tokio::main]
async fn main() {
    villa_ops::run().await;
}
