use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tablegraph::{Db, Options, Schema};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "tablegraph")]
#[command(about = "Synthesize a GraphQL schema from a relational database")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Reflect a database and print the synthesized type document
    PrintSchema(PrintSchemaCommand),
}

#[derive(Parser, Debug)]
struct PrintSchemaCommand {
    /// Connection URL, e.g. `sqlite:app.db` or `postgresql://localhost/app`
    #[arg(long)]
    url: String,

    /// Reflection filters and custom type mappings
    #[arg(long)]
    config: Option<PathBuf>,
}

impl PrintSchemaCommand {
    async fn run(self) -> Result<()> {
        let options = match &self.config {
            Some(path) => Options::load(path)?,
            None => Options::default(),
        };

        let db = Db::connect(&self.url).await?;
        let schema = Schema::builder().options(options).build(&db).await?;

        tracing::debug!(tables = schema.tables().len(), "schema built");
        print!("{}", schema.sdl());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::PrintSchema(cmd) => cmd.run().await,
    }
}
