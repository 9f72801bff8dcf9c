use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use codeform_ai::HttpTransport;
use codeform_core::{
    CodeformConfig, FormController, LibraryMode, NoticeKind, Osc52Clipboard, Settlement,
};
use codeform_relay::RelayServer;
use dotenvy::dotenv;
use log::{debug, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay endpoint and serve the form page
    Serve {
        /// Interface to listen on
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Chat completions URL to forward prompts to
        #[arg(long)]
        upstream_url: Option<String>,

        /// Model to request
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Describe a component and print the generated code
    Generate {
        /// What the component should be
        #[arg(short, long)]
        text: String,

        /// UI library to target (CSS, Tailwind CSS, MUI, AntDesign, ChakraUI, React Bootstrap)
        #[arg(short, long, default_value_t = LibraryMode::Css)]
        library: LibraryMode,

        /// API key for the completion service
        #[arg(short, long, env = "CODEFORM_API_KEY", hide_env_values = true)]
        key: Option<String>,

        /// Relay endpoint to post to
        #[arg(long)]
        relay_url: Option<String>,

        /// Output file path (optional, prints to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Copy the generated code to the clipboard (OSC 52)
        #[arg(long)]
        copy: bool,
    },

    /// List the supported UI libraries
    Libraries,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv().ok();

    let cli = Cli::parse();

    // The relay logs through tracing; everything else through env_logger.
    if matches!(cli.command, Commands::Serve { .. }) {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));
    }

    let config = CodeformConfig::from_env();

    match cli.command {
        Commands::Serve {
            bind,
            port,
            upstream_url,
            model,
        } => {
            let mut config = config;
            if let Some(bind) = bind {
                config = config.with_bind(bind);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(url) = upstream_url {
                config = config.with_upstream_url(url);
            }
            if let Some(model) = model {
                config = config.with_model(model);
            }

            let server = RelayServer::new(config).context("Failed to configure relay")?;
            server.start().await.context("Relay stopped with an error")?;
        }
        Commands::Generate {
            text,
            library,
            key,
            relay_url,
            output,
            copy,
        } => {
            let relay_url = relay_url.unwrap_or_else(|| config.relay_url.clone());
            run_generation(&config, &relay_url, text, library, key, output, copy).await?;
        }
        Commands::Libraries => {
            for mode in LibraryMode::ALL {
                println!("{}", mode);
            }
        }
    }

    Ok(())
}

async fn run_generation(
    config: &CodeformConfig,
    relay_url: &str,
    text: String,
    library: LibraryMode,
    key: Option<String>,
    output: Option<PathBuf>,
    copy: bool,
) -> Result<()> {
    let transport = HttpTransport::new(relay_url).context("Failed to create relay client")?;

    let mut form = FormController::with_config(config);
    form.set_credential(key.unwrap_or_default());
    form.set_source_text(text);
    form.set_library(library);

    if let Some(label) = form.word_count_label() {
        eprintln!("{}", label);
    }
    debug!("Posting to {}", relay_url);
    info!("Generating code with {}... (this may take a while)", library);

    let settlement = match form.submit(&transport).await {
        Ok(settlement) => settlement,
        Err(rejection) => {
            return Err(anyhow!(rejection
                .message()
                .unwrap_or("A request is already in progress")));
        }
    };

    if settlement != Settlement::Generated {
        let reason = form
            .last_notice()
            .map(|(_, message)| message.to_string())
            .unwrap_or_else(|| "No code was generated".to_string());
        return Err(anyhow!(reason));
    }

    let code = form.output().unwrap_or_default().to_string();
    match output {
        Some(out_path) => {
            tokio::fs::write(&out_path, &code)
                .await
                .context("Failed to write output file")?;
            eprintln!("Success! Output written to {:?}", out_path);
        }
        None => println!("{}", code),
    }

    if copy {
        form.copy_output(&mut Osc52Clipboard::stderr())
            .context("Failed to copy to clipboard")?;
        print_notices(&form);
    }

    Ok(())
}

fn print_notices(form: &FormController) {
    for notice in form.notices() {
        let marker = match notice.kind {
            NoticeKind::Success => "✔",
            NoticeKind::Error => "✖",
        };
        eprintln!("{} {}", marker, notice.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_parses_library_names() {
        let cli = Cli::try_parse_from([
            "codeform",
            "generate",
            "--text",
            "a login button",
            "--library",
            "React Bootstrap",
            "--key",
            "sk-test",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate { text, library, key, copy, .. } => {
                assert_eq!(text, "a login button");
                assert_eq!(library, LibraryMode::ReactBootstrap);
                assert_eq!(key.as_deref(), Some("sk-test"));
                assert!(!copy);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_generate_accepts_output_file() {
        let cli = Cli::try_parse_from([
            "codeform",
            "generate",
            "--text",
            "a card",
            "-o",
            "Card.jsx",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate { output, .. } => {
                assert_eq!(output, Some(PathBuf::from("Card.jsx")));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_unknown_library_is_rejected() {
        let parsed = Cli::try_parse_from(["codeform", "generate", "-t", "x", "-l", "bulma"]);
        assert!(parsed.is_err());
    }
}
