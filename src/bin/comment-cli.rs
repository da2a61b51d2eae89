use clap::{Parser, Subcommand};
use jsonwebtoken::{EncodingKey, Header};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use comment_service::config::schema::DEFAULT_JWT_SECRET;

#[derive(Parser)]
#[command(name = "comment-cli")]
#[command(about = "Client for the comment service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Secret used to sign the bearer token for write commands.
    #[arg(short, long, env = "COMMENT_SERVICE_JWT_SECRET", default_value = DEFAULT_JWT_SECRET)]
    secret: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a bearer token signed with the secret
    Token,
    /// Call the greeting endpoint
    Hello,
    /// Fetch a comment
    Get { id: String },
    /// Create a comment
    Create {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        body: String,
    },
    /// Replace the fields of a comment
    Update {
        id: String,
        #[arg(long)]
        slug: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        body: String,
    },
    /// Delete a comment
    Delete { id: String },
}

fn mint_token(secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    jsonwebtoken::encode(
        &Header::default(),
        &json!({}),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn auth_headers(secret: &str) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("bearer {}", mint_token(secret)?))?,
    );
    Ok(headers)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let comments = format!("{}/api/v1/comment", cli.url);

    match cli.command {
        Commands::Token => {
            println!("{}", mint_token(&cli.secret)?);
        }
        Commands::Hello => {
            let res = client.get(format!("{}/hello", cli.url)).send().await?;
            println!("{}", res.text().await?);
        }
        Commands::Get { id } => {
            let res = client.get(format!("{}/{}", comments, id)).send().await?;
            print_response(res).await?;
        }
        Commands::Create { slug, author, body } => {
            let res = client
                .post(&comments)
                .headers(auth_headers(&cli.secret)?)
                .json(&json!({ "slug": slug, "Author": author, "Body": body }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Update {
            id,
            slug,
            author,
            body,
        } => {
            let res = client
                .put(format!("{}/{}", comments, id))
                .headers(auth_headers(&cli.secret)?)
                .json(&json!({ "Slug": slug, "Author": author, "Body": body }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Delete { id } => {
            let res = client
                .delete(format!("{}/{}", comments, id))
                .headers(auth_headers(&cli.secret)?)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: comment service returned status {}", status);
        if let Ok(text) = res.text().await {
            if !text.is_empty() {
                eprintln!("Response: {}", text);
            }
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
