#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    engagement_letter_server::run().await
}
