//! Basic image generation example.
//!
//! Run with: `cargo run --example generate_image`
//!
//! Requires `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) and `APP_PASSCODE`.

use chitrakar::{AuthState, Config, Session, TerminalSurface};

#[tokio::main]
async fn main() -> chitrakar::Result<()> {
    let config = Config::from_env()?;
    let passcode = config.passcode.clone().unwrap_or_default();

    let surface = TerminalSurface::new(std::io::stdout(), &config.output_dir);
    let mut session = Session::new(
        AuthState::new(config.auth_gate()),
        config.gemini_client()?,
        surface,
    );
    session.unlock(&passcode)?;

    let delivery = session
        .generate("एक जंगल में नाचती हुई एक छोटी परी", false)
        .await?
        .into_result()?;
    println!(
        "Generated image: {} bytes, original {}x{} ({})",
        delivery.download_bytes, delivery.original_width, delivery.original_height, delivery.mime_type
    );

    Ok(())
}
