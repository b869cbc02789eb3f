//! Post subcommands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use quill_core::{NewPost, PostPatch, PostQuery};
use quill_http::Attachment;

use crate::output;
use crate::session::Session;

/// Form field used when `--attach` gives no field name.
const DEFAULT_ATTACHMENT_FIELD: &str = "file";

#[derive(Args, Debug)]
pub struct PostsCommand {
    #[command(subcommand)]
    pub command: PostsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PostsSubcommand {
    /// List posts
    List(ListArgs),

    /// Fetch a single post
    Get(GetArgs),

    /// Publish a new post
    Create(CreateArgs),

    /// Edit the title or content of a post
    Update(UpdateArgs),

    /// Delete a post
    Delete(IdArgs),

    /// Like or unlike a post
    Like(IdArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Full-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Category slug
    #[arg(long)]
    pub category: Option<String>,

    /// Comma-separated tag slugs
    #[arg(long)]
    pub tags: Option<String>,

    /// Ordering field, e.g. -created_at
    #[arg(long, allow_hyphen_values = true)]
    pub ordering: Option<String>,

    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Post ID
    pub id: u64,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub content: String,

    /// Category slug
    #[arg(long)]
    pub category: Option<String>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,

    /// File to upload, as PATH or FIELD=PATH (repeatable)
    #[arg(long = "attach", value_name = "[FIELD=]PATH")]
    pub attachments: Vec<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Post ID
    pub id: u64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Post ID
    pub id: u64,
}

pub async fn handle(cmd: PostsCommand, session: &Session) -> Result<()> {
    match cmd.command {
        PostsSubcommand::List(args) => list(args, session).await,
        PostsSubcommand::Get(args) => get(args, session).await,
        PostsSubcommand::Create(args) => create(args, session).await,
        PostsSubcommand::Update(args) => update(args, session).await,
        PostsSubcommand::Delete(args) => delete(args, session).await,
        PostsSubcommand::Like(args) => like(args, session).await,
    }
}

async fn list(args: ListArgs, session: &Session) -> Result<()> {
    let api = session.api()?;
    let query = PostQuery {
        search: args.search,
        category: args.category,
        tags: args.tags,
        ordering: args.ordering,
        page: args.page,
    };

    let page = api.list_posts(&query).await.context("Failed to list posts")?;

    if page.results.is_empty() {
        output::note("No posts found.");
        return Ok(());
    }

    for post in &page.results {
        output::record(post, args.pretty)?;
    }

    eprintln!();
    output::field("Total", page.count);
    if page.has_next() {
        output::note(&format!("More results: --page {}", next_page(query.page)));
    }

    Ok(())
}

async fn get(args: GetArgs, session: &Session) -> Result<()> {
    let api = session.api()?;
    let post = api
        .get_post(args.id)
        .await
        .with_context(|| format!("Failed to fetch post {}", args.id))?;
    output::record(&post, args.pretty)
}

async fn create(args: CreateArgs, session: &Session) -> Result<()> {
    let mut post = NewPost::new(args.title, args.content);
    if let Some(category) = args.category {
        post = post.with_category(category);
    }
    if let Some(tags) = args.tags {
        post = post.with_tags(tags);
    }

    let attachments = args
        .attachments
        .iter()
        .map(|arg| read_attachment(arg))
        .collect::<Result<Vec<_>>>()?;

    let api = session.api()?;
    let created = if attachments.is_empty() {
        api.create_post(&post).await
    } else {
        api.create_post_with_attachments(&post, &attachments).await
    }
    .context("Failed to create post")?;

    output::success("Post created");
    output::field("ID", created.id);
    if let Some(slug) = &created.slug {
        output::field("Slug", slug);
    }
    if !created.tags_suggested.is_empty() {
        output::field("Suggested tags", created.tags_suggested.join(", "));
    }
    output::record(&created, false)
}

async fn update(args: UpdateArgs, session: &Session) -> Result<()> {
    let patch = PostPatch {
        title: args.title,
        content: args.content,
    };
    if patch.is_empty() {
        bail!("Nothing to update: pass --title and/or --content");
    }

    let api = session.api()?;
    let post = api
        .update_post(args.id, &patch)
        .await
        .with_context(|| format!("Failed to update post {}", args.id))?;

    output::success("Post updated");
    output::record(&post, false)
}

async fn delete(args: IdArgs, session: &Session) -> Result<()> {
    let api = session.api()?;
    api.delete_post(args.id)
        .await
        .with_context(|| format!("Failed to delete post {}", args.id))?;
    output::success(&format!("Deleted post {}", args.id));
    Ok(())
}

async fn like(args: IdArgs, session: &Session) -> Result<()> {
    let api = session.api()?;
    let accepted = api
        .like_post(args.id)
        .await
        .with_context(|| format!("Failed to like post {}", args.id))?;
    if !accepted {
        bail!("The server did not accept the like for post {}", args.id);
    }
    output::success(&format!("Toggled like on post {}", args.id));
    Ok(())
}

/// Page to suggest after `current`. Page 0 is not sent, so it reads as page 1.
fn next_page(current: Option<u32>) -> u32 {
    current.filter(|p| *p > 0).unwrap_or(1).saturating_add(1)
}

/// Parse `[FIELD=]PATH` and read the file.
fn read_attachment(arg: &str) -> Result<Attachment> {
    let (field, path) = parse_attachment_arg(arg);
    let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Not a file path: {}", path.display()))?
        .to_string();
    let mime = mime_guess::from_path(&path).first().map(|m| m.to_string());

    Ok(Attachment {
        field,
        file_name,
        mime,
        bytes,
    })
}

fn parse_attachment_arg(arg: &str) -> (String, PathBuf) {
    match arg.split_once('=') {
        Some((field, path)) if !field.is_empty() && !field.contains(['/', '\\']) => {
            (field.to_string(), Path::new(path).to_path_buf())
        }
        _ => (DEFAULT_ATTACHMENT_FIELD.to_string(), PathBuf::from(arg)),
    }
}
