use mockhr_core::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let app = App::new()?;
    app.run().await?;
    Ok(())
}
