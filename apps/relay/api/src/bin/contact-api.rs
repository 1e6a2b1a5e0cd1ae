use relay_api::Service;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    relay_api::run(Service::Contact).await
}
