use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use solrq::{
    EdismaxQuery, Field, FieldRef, Group, GroupQuery, RemoveQuery, Sort, SolrClient, SolrConfig,
    StandardQuery, UpdateRequest,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// Documents are schemaless on the command line
type Client = SolrClient<Value, Value>;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Query and update a Solr collection", long_about = None)]
struct Cli {
    /// Collection (core) name
    #[arg(short, long)]
    collection: String,

    /// Service root; defaults to SOLR_BASE_URL or http://localhost:8983/solr
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Standard query
    Select(QueryArgs),
    /// Relevance-ranked query over weighted fields
    Edismax {
        #[command(flatten)]
        query: QueryArgs,
        /// Query field, optionally weighted: `name` or `name^2`
        #[arg(long)]
        qf: Vec<String>,
    },
    /// Grouped query
    Group {
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long = "group-field", required = true)]
        group_field: Vec<String>,
        #[arg(long)]
        group_limit: Option<i64>,
        #[arg(long)]
        ngroups: bool,
    },
    /// Add documents from a JSON array file
    Update {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete documents matching a query
    Remove {
        #[arg(long)]
        query: String,
    },
}

#[derive(Args, Debug)]
struct QueryArgs {
    #[arg(short, long)]
    q: Option<String>,

    /// Filter query, repeatable
    #[arg(long)]
    fq: Vec<String>,

    /// `field:asc` or `field:desc`, repeatable
    #[arg(long)]
    sort: Vec<String>,

    /// Comma-separated field list
    #[arg(long, value_delimiter = ',')]
    fl: Vec<String>,

    #[arg(long)]
    start: Option<u64>,

    #[arg(long)]
    rows: Option<u64>,
}

fn field(name: &str) -> FieldRef<Value> {
    Field::<Value, Value>::dynamic(name).erase()
}

fn parse_sort(arg: &str) -> Result<Sort<Value>> {
    let (name, order) = arg
        .split_once(':')
        .with_context(|| format!("sort '{}' must look like field:asc", arg))?;
    match order {
        "asc" => Ok(Sort::asc(field(name))),
        "desc" => Ok(Sort::desc(field(name))),
        other => bail!("unknown sort order '{}'", other),
    }
}

impl QueryArgs {
    fn into_query(self) -> Result<StandardQuery<Value>> {
        let mut query = StandardQuery::new();
        query.q = self.q;
        query.fq = self.fq;
        query.start = self.start;
        query.rows = self.rows;
        query.fl = self.fl.iter().map(|name| field(name)).collect();
        for arg in &self.sort {
            query = query.sort(parse_sort(arg)?);
        }
        Ok(query)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(client: &Client, command: Command) -> Result<()> {
    match command {
        Command::Select(args) => {
            let params = client.build_standard_query(&args.into_query()?);
            print_json(&client.select(&params).await?)
        }
        Command::Edismax { query, qf } => {
            let mut edismax = EdismaxQuery::new(query.into_query()?);
            for arg in &qf {
                edismax = match arg.split_once('^') {
                    Some((name, weight)) => {
                        let weight: f64 = weight
                            .parse()
                            .with_context(|| format!("invalid weight in '{}'", arg))?;
                        edismax.qf_weighted(field(name), weight)
                    }
                    None => edismax.qf(field(arg)),
                };
            }
            let params = client.build_edismax_query(&edismax);
            print_json(&client.select(&params).await?)
        }
        Command::Group {
            query,
            group_field,
            group_limit,
            ngroups,
        } => {
            let mut fields = group_field.iter();
            let Some(first) = fields.next() else {
                bail!("at least one --group-field is required");
            };
            let mut group = fields.fold(Group::by(field(first)), |group, name| {
                group.and_by(field(name))
            });
            group.limit = group_limit;
            if ngroups {
                group = group.ngroups(true);
            }
            let params = client.build_solr_group_query(&GroupQuery::new(query.into_query()?, group));
            print_json(&client.group_query(&params).await?)
        }
        Command::Update { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let docs: Vec<Value> =
                serde_json::from_str(&contents).context("Update file must hold a JSON array")?;
            let count = docs.len();
            let docs: Vec<UpdateRequest<Value>> = docs.into_iter().map(UpdateRequest::Doc).collect();
            client.update(&docs).await?;
            println!("Updated {} documents in {}", count, client.collection());
            Ok(())
        }
        Command::Remove { query } => {
            client.remove(&RemoveQuery::query(query)).await?;
            println!("Removed matching documents from {}", client.collection());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.base_url {
        Some(url) => SolrConfig::new(url),
        None => SolrConfig::from_env(),
    };
    let client: Client = SolrClient::with_config(cli.collection, &config)
        .context("Failed to create Solr client")?;

    run(&client, cli.command).await
}
