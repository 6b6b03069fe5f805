/*
 * Responsibility
 * - terminal front end for the posts manager
 * - CLI args / env -> Gateway -> PostsManager, then one command per invocation
 * - stdout carries the rendered views; logs go to stderr
 */
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use posts_client::{
    auth::{StaticToken, TokenFile, TokenProvider},
    controller::{Editor, PostsManager, Route},
    gateway::{DEFAULT_API, Gateway},
    model::Post,
    view::{EMPTY_MESSAGE, ListView},
};

#[derive(Parser, Debug)]
#[command(name = "posts-client", version, about = "Posts manager terminal client", long_about = None)]
struct Cli {
    /// Resource server base URL
    #[arg(long, env = "POSTS_API", default_value = DEFAULT_API)]
    api: Url,

    /// File holding the access token, re-read on every request (takes precedence)
    #[arg(long, env = "POSTS_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Access token from env (no flag, keeps it out of shell history)
    #[arg(hide = true, env = "POSTS_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every post, most recently updated first
    List,
    /// Open the editor for a post id, or `new` for a blank draft
    Show { id: String },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Change the title and/or body of a post
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete a post after confirmation
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn token_provider(cli: &Cli) -> Result<Arc<dyn TokenProvider>> {
    if let Some(path) = &cli.token_file {
        return Ok(Arc::new(TokenFile::new(path)));
    }
    match &cli.token {
        Some(token) => Ok(Arc::new(StaticToken::new(token.clone()))),
        None => bail!("no access token: set POSTS_TOKEN or POSTS_TOKEN_FILE"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let tokens = token_provider(&cli)?;
    let mut manager = PostsManager::new(Gateway::new(cli.api.clone(), tokens));

    manager.load().await;
    if let Some(failure) = manager.last_failure() {
        tracing::warn!(error = %failure, "showing an empty collection");
    }

    match cli.command {
        Command::List => {}
        Command::Show { id } => {
            manager.navigate_to(&Route::Edit(id).path());
            match manager.editor() {
                Some(editor) => {
                    print_editor(&editor)?;
                    return Ok(());
                }
                None => eprintln!("post not found; showing the list"),
            }
        }
        Command::Create { title, body } => {
            manager.navigate(Route::New);
            let mut draft = open_editor(&mut manager)?;
            draft.title = title;
            draft.body = body;
            manager.save(draft).await;
        }
        Command::Edit { id, title, body } => {
            manager.navigate(Route::Edit(id.to_string()));
            let mut post = open_editor(&mut manager)?;
            if let Some(title) = title {
                post.title = title;
            }
            if let Some(body) = body {
                post.body = body;
            }
            manager.save(post).await;
        }
        Command::Delete { id, yes } => {
            manager.navigate(Route::Edit(id.to_string()));
            let post = open_editor(&mut manager)?;
            let mut confirm = |message: &str| yes || ask(message).unwrap_or(false);
            if !manager.delete(&post, &mut confirm).await {
                eprintln!("cancelled");
            }
            manager.go_back();
        }
    }

    print_list(&manager.list_view(Utc::now()));
    Ok(())
}

fn open_editor(manager: &mut PostsManager<Gateway<Arc<dyn TokenProvider>>>) -> Result<Post> {
    match manager.editor() {
        Some(editor) => Ok(editor.into_post()),
        None => bail!("post not found"),
    }
}

fn ask(message: &str) -> Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{message}? [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("reading confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_list(view: &ListView) {
    match view {
        ListView::Loading => {}
        ListView::Empty => println!("{EMPTY_MESSAGE}"),
        ListView::Rows(rows) => {
            for row in rows {
                match &row.updated {
                    Some(updated) => println!("{:<14} {}  ({updated})", row.link, row.title),
                    None => println!("{:<14} {}", row.link, row.title),
                }
            }
        }
    }
}

fn print_editor(editor: &Editor) -> Result<()> {
    let (heading, post) = match editor {
        Editor::Draft(post) => ("new post", post),
        Editor::Existing(post) => ("post", post),
    };
    let out = serde_json::to_string_pretty(post).context("rendering post")?;
    println!("{heading}\n{out}");
    Ok(())
}
