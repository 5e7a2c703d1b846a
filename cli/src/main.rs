//! `posts`: a terminal front-end for the posts API.
//!
//! Every run starts from an empty cache, so commands that act on an existing
//! post fetch the list first, exactly like a screen that loads on appear.

mod args;
mod view;

use anyhow::{Context, Result};
use posts_core::{ClientConfig, Post, PostClient};
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::from_env();
    let config = match args.url {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env(),
    };
    let client = PostClient::from_config(&config);
    tracing::debug!(base_url = client.api().base_url(), "using posts API");

    run(client, args.command).await
}

async fn run(client: PostClient, command: Command) -> Result<()> {
    let mut posts = client.subscribe();

    match command {
        Command::List => {
            client.fetch_posts().await;
            print!("{}", view::render_list(&posts.borrow_and_update()));
        }
        Command::Add { title, body } => {
            let draft = Post::draft(title, body);
            draft.validate_new()?;
            let created = client.add_post(&draft).await.context("creating post failed")?;
            println!("created {}", created.id.as_deref().unwrap_or("-"));

            client.fetch_posts().await;
            print!("{}", view::render_list(&posts.borrow_and_update()));
        }
        Command::Edit { id, title, body } => {
            client.fetch_posts().await;
            let id = view::find(&posts.borrow_and_update(), &id)?
                .require_id()?
                .to_string();

            client.update_post(&id, &title, &body).await;
            if posts.has_changed()? {
                print!("{}", view::render_list(&posts.borrow_and_update()));
            } else {
                tracing::warn!(%id, "post was not updated");
            }
        }
        Command::Delete { id } => {
            client.fetch_posts().await;
            let id = view::find(&posts.borrow_and_update(), &id)?
                .require_id()?
                .to_string();

            client.delete_post(&id).await;
            if posts.has_changed()? {
                print!("{}", view::render_list(&posts.borrow_and_update()));
            } else {
                tracing::warn!(%id, "post was not deleted");
            }
        }
        Command::Show { id } => {
            client.fetch_posts().await;
            let cached = posts.borrow_and_update();
            print!("{}", view::render_detail(view::find(&cached, &id)?)?);
        }
    }

    Ok(())
}
