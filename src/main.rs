#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = campus_exams::run().await {
        eprintln!("campus-exams fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
