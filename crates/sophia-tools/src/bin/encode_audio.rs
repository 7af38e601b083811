use tracing::info;

use sophia_tools::config::EncoderConfig;

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    sophia_tools::init_logging("sophia_tools=info,sophia_codec=info");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = EncoderConfig::from_env(&args)?;

    info!("Encoding {}", config.input.display());
    let report = sophia_codec::encode_file(&config.input, &config.output)?;

    println!(
        "Base64 audio saved to: {} ({} bytes -> {} chars)",
        config.output.display(),
        report.bytes_read,
        report.chars_written
    );
    Ok(())
}
