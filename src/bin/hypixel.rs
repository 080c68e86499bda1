//! CLI binary for the Hypixel client.
//!
//! Usage: hypixel player 069a79f4-44e9-4726-a5be-fca90e38aaf5

#[cfg(feature = "cli")]
mod cli {
    use clap::{Parser, Subcommand};
    use hypixel_client::error::{HypixelError, Result};
    use hypixel_client::{GuildQuery, HypixelClient, Params, Request, ResourceKind, Response};

    #[derive(Parser)]
    #[command(name = "hypixel", about = "Hypixel public API client", version)]
    struct Cli {
        /// API key (overrides HYPIXEL_API_KEY env var)
        #[arg(long, global = true)]
        key: Option<String>,

        /// API base URL (overrides HYPIXEL_API_URL env var)
        #[arg(long, global = true)]
        base_url: Option<String>,

        /// Log filter, e.g. "debug" or "hypixel_client=debug" (overrides RUST_LOG)
        #[arg(long, global = true)]
        log_level: Option<String>,

        /// Output format
        #[arg(long, global = true, default_value = "json")]
        output: OutputFormat,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Clone, Copy, clap::ValueEnum)]
    enum OutputFormat {
        Table,
        Json,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Show a player's data
        Player {
            /// Player UUID
            uuid: String,
        },
        /// Show a player's online status
        Status {
            /// Player UUID
            uuid: String,
        },
        /// Look up a guild
        Guild {
            /// Guild ID
            #[arg(long)]
            id: Option<String>,
            /// UUID of a guild member
            #[arg(long)]
            player: Option<String>,
            /// Guild name
            #[arg(long)]
            name: Option<String>,
        },
        /// Show SkyBlock bazaar products
        Bazaar,
        /// Show a page of active SkyBlock auctions
        Auctions {
            #[arg(short, long, default_value = "0")]
            page: u32,
        },
        /// Fetch a static resource collection
        Resource {
            #[arg(value_enum)]
            kind: ResourceKind,
        },
        /// Send a raw GET request
        Get {
            /// Path relative to the base URL, e.g. "skyblock/profiles"
            path: String,
            /// Query parameter as key=value (repeatable)
            #[arg(short, long = "param")]
            params: Vec<String>,
            /// Do not send the API key
            #[arg(long)]
            public: bool,
        },
    }

    fn init_tracing(level: Option<&str>) {
        use tracing_subscriber::EnvFilter;

        let filter = match level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    fn make_client(key: Option<String>, base_url: Option<String>) -> Result<HypixelClient> {
        let client = match key {
            Some(k) => HypixelClient::new(k),
            None => HypixelClient::from_env()?,
        };
        Ok(match base_url {
            Some(url) => client.with_base_url(url),
            None => client,
        })
    }

    fn parse_params(raw: &[String]) -> Result<Params> {
        raw.iter()
            .map(|pair| {
                pair.split_once('=')
                    .ok_or_else(|| HypixelError::Config(format!("expected key=value, got {:?}", pair)))
            })
            .collect()
    }

    fn print_response(client: &HypixelClient, response: &Response, output: OutputFormat) -> Result<()> {
        let body: Option<serde_json::Value> = response.json().ok();

        match output {
            OutputFormat::Json => match body {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => println!("{}", response.text()),
            },
            OutputFormat::Table => {
                use comfy_table::{ContentArrangement, Table};

                let mut table = Table::new();
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(vec!["Field", "Value"]);
                table.add_row(vec!["url".to_string(), response.path.clone()]);
                table.add_row(vec!["status".to_string(), response.status.to_string()]);
                if let Some(gate) = client.rate_gate() {
                    table.add_row(vec!["quota".to_string(), gate.status().to_string()]);
                }

                match body {
                    Some(serde_json::Value::Object(fields)) => {
                        for (name, value) in &fields {
                            let mut text = value.to_string();
                            if text.len() > 60 {
                                let cut = (0..=57).rev().find(|i| text.is_char_boundary(*i)).unwrap_or(0);
                                text.truncate(cut);
                                text.push_str("...");
                            }
                            table.add_row(vec![name.clone(), text]);
                        }
                    }
                    _ => {
                        table.add_row(vec!["body".to_string(), response.text().into_owned()]);
                    }
                }
                println!("{table}");
            }
        }
        Ok(())
    }

    pub async fn run() -> Result<()> {
        let cli = Cli::parse();
        init_tracing(cli.log_level.as_deref());
        let client = make_client(cli.key, cli.base_url)?;

        let response = match cli.command {
            Commands::Player { uuid } => client.player(&uuid).await?,
            Commands::Status { uuid } => client.status(&uuid).await?,
            Commands::Guild { id, player, name } => {
                let query = match (id.as_deref(), player.as_deref(), name.as_deref()) {
                    (Some(id), None, None) => GuildQuery::Id(id),
                    (None, Some(player), None) => GuildQuery::Player(player),
                    (None, None, Some(name)) => GuildQuery::Name(name),
                    _ => {
                        return Err(HypixelError::Config(
                            "pass exactly one of --id, --player, --name".into(),
                        ))
                    }
                };
                client.guild(query).await?
            }
            Commands::Bazaar => client.skyblock_bazaar().await?,
            Commands::Auctions { page } => client.skyblock_auctions(page).await?,
            Commands::Resource { kind } => client.resource(kind).await?,
            Commands::Get {
                path,
                params,
                public,
            } => {
                let mut request = Request::get(path).with_params(parse_params(&params)?);
                if !public {
                    request = request.with_headers(client.with_auth(Default::default())?);
                }
                client.execute(request).await?
            }
        };

        print_response(&client, &response, cli.output)?;
        if !response.is_success() {
            response.error_for_status()?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
