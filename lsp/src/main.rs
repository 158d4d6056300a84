#[tokio::main]
async fn main() {
    abl_lsp::run().await;
}
