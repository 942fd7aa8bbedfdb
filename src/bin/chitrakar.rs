//! CLI for Chitrakar - images from Hindi prompts.

use chitrakar::{AuthState, Config, GeminiClient, GeminiModel, Outcome, Session, TerminalSurface};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Lines, Stdin};

#[derive(Parser)]
#[command(name = "chitrakar")]
#[command(about = "Generate 16:9 animated illustrations from Hindi prompts via Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Directory for animation.png (overrides CHITRAKAR_OUTPUT_DIR)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Gemini model (overrides CHITRAKAR_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Do not save the original image next to animation.png
    #[arg(long, global = true)]
    no_original: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and generate images prompt by prompt (default)
    Interactive,

    /// Generate a single image and exit
    Generate(GenerateArgs),

    /// Print the instruction that would be sent, without calling the API
    Prompt(PromptArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Hindi prompt, or `-` to read it from stdin
    prompt: String,

    /// Render the Hindi text inside the image
    #[arg(long)]
    text: bool,

    /// Passcode; read from the first line of stdin when omitted
    #[arg(long)]
    passcode: Option<String>,
}

#[derive(Args)]
struct PromptArgs {
    /// Hindi prompt
    prompt: String,

    /// Render the Hindi text inside the image
    #[arg(long)]
    text: bool,
}

type StdinLines = Lines<BufReader<Stdin>>;
type CliSession = Session<GeminiClient, TerminalSurface<Box<dyn Write>>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Prompt(ref args)) => {
            print_prompt(args, cli.json)?;
        }
        Some(Commands::Generate(ref args)) => {
            let config = load_config(&cli)?;
            generate_once(&config, args, &cli).await?;
        }
        Some(Commands::Interactive) | None => {
            let config = load_config(&cli)?;
            run_interactive(&config, &cli).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(ref dir) = cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(ref model) = cli.model {
        config.model = model.parse::<GeminiModel>()?;
    }
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

/// Human-facing output. With `--json`, stdout carries only the report.
fn console(json_output: bool) -> Box<dyn Write> {
    if json_output {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    }
}

fn new_session(config: &Config, cli: &Cli) -> anyhow::Result<CliSession> {
    let client = config.gemini_client()?;
    let surface =
        TerminalSurface::new(console(cli.json), &config.output_dir).keep_original(!cli.no_original);
    Ok(Session::new(AuthState::new(config.auth_gate()), client, surface))
}

fn print_prompt(args: &PromptArgs, json_output: bool) -> anyhow::Result<()> {
    let prompt = chitrakar::prompt::build(&args.prompt, args.text);
    if json_output {
        let result = serde_json::json!({
            "include_text": args.text,
            "short": chitrakar::prompt::is_short(&args.prompt),
            "prompt": prompt,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{prompt}");
    }
    Ok(())
}

async fn generate_once(config: &Config, args: &GenerateArgs, cli: &Cli) -> anyhow::Result<()> {
    let mut session = new_session(config, cli)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let passcode = match args.passcode {
        Some(ref p) => p.clone(),
        None => read_line(&mut lines, "Passcode: ", cli.json)
            .await?
            .ok_or_else(|| anyhow::anyhow!("no passcode given"))?,
    };
    session.unlock(&passcode)?;

    let raw = if args.prompt == "-" {
        let mut rest = String::new();
        lines.into_inner().read_to_string(&mut rest).await?;
        rest
    } else {
        args.prompt.clone()
    };

    let outcome = session.generate(&raw, args.text).await?;
    report(&outcome, session.generator_name(), cli.json)?;
    outcome.into_result()?;
    Ok(())
}

async fn run_interactive(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let mut session = new_session(config, cli)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = console(cli.json);

    writeln!(out, "## 🔐 Authentication")?;
    while !session.is_authenticated() {
        let Some(passcode) = read_line(&mut lines, "Passcode: ", cli.json).await? else {
            anyhow::bail!("input closed before authentication");
        };
        // Wrong passcodes are reported by the session; keep asking.
        let _ = session.unlock(&passcode);
    }

    writeln!(out)?;
    writeln!(out, "🎨 Image Generator 🎨")?;
    writeln!(out, "Enter a Hindi prompt to generate a high-resolution, 16:9 animated-style image.")?;
    writeln!(out, "Commands: /text toggles rendering the text in the image, /quit exits.")?;
    writeln!(out, "उदाहरण: एक जंगल में नाचती हुई एक छोटी परी, चमकती हुई पंखों के साथ।")?;

    let mut include_text = false;
    loop {
        let label = if include_text { "💬 [text] > " } else { "💬 > " };
        let Some(line) = read_line(&mut lines, label, cli.json).await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/text" => {
                include_text = !include_text;
                let state = if include_text { "on" } else { "off" };
                tracing::debug!(include_text, "toggled text mode");
                writeln!(out, "Image with Text: {state}")?;
                continue;
            }
            _ => {}
        }

        let outcome = session.generate(&line, include_text).await?;
        report(&outcome, session.generator_name(), cli.json)?;
        if let Outcome::Failed(e) = outcome {
            if !e.is_recoverable() {
                return Err(e.into());
            }
        }
    }

    Ok(())
}

async fn read_line(
    lines: &mut StdinLines,
    label: &str,
    json_output: bool,
) -> anyhow::Result<Option<String>> {
    let mut out = console(json_output);
    write!(out, "{label}")?;
    out.flush()?;
    let line = lines.next_line().await?;
    Ok(line.map(|l| l.trim_end_matches('\r').to_string()))
}

fn report(outcome: &Outcome, provider: &str, json_output: bool) -> anyhow::Result<()> {
    if json_output {
        let result = match outcome {
            Outcome::Delivered(d) => serde_json::json!({
                "status": outcome.status(),
                "success": true,
                "provider": provider,
                "output": d.download_path.as_ref().map(|p| p.display().to_string()),
                "size_bytes": d.download_bytes,
                "mime_type": d.mime_type,
                "original_width": d.original_width,
                "original_height": d.original_height,
                "metadata": d.metadata,
            }),
            Outcome::NoImage { text } => serde_json::json!({
                "status": outcome.status(),
                "success": false,
                "provider": provider,
                "text": text,
            }),
            Outcome::Failed(e) => serde_json::json!({
                "status": outcome.status(),
                "success": false,
                "provider": provider,
                "error": e.to_string(),
            }),
            Outcome::EmptyPrompt => serde_json::json!({
                "status": outcome.status(),
                "success": false,
                "provider": provider,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Outcome::Delivered(d) = outcome {
        if let Some(duration) = d.metadata.duration_ms {
            println!("Duration: {}ms", duration);
        }
    }
    Ok(())
}
