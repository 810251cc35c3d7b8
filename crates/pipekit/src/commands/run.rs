//! `pipekit run`: run a pipe through the pipe API

// Internal imports (std, crate)
use pipekit_client::{GenerateOptions, PipeClient, get_text_delta};
use pipekit_config::ApplicationConfig;
use pipekit_thread::Message;

// External imports (alphabetized)
use clap::Args;
use futures::StreamExt;
use serde_json::json;
use tracing::info;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Pipe to run
    #[arg(long)]
    pub pipe_name: String,

    /// User message
    #[arg(long)]
    pub message: String,

    /// Use the chat endpoint
    #[arg(long)]
    pub chat: bool,

    /// Print the completion as it streams in
    #[arg(long)]
    pub stream: bool,

    /// Continue an existing thread
    #[arg(long)]
    pub thread_id: Option<String>,
}

impl RunArgs {
    fn options(&self) -> GenerateOptions {
        let mut options = GenerateOptions::new(vec![Message::user(&self.message)])
            .with_name(&self.pipe_name)
            .chat(self.chat);
        if let Some(thread_id) = &self.thread_id {
            options = options.with_thread_id(thread_id);
        }
        options
    }
}

pub async fn execute(config: &ApplicationConfig, args: &RunArgs) -> anyhow::Result<()> {
    info!(
        target = "command",
        event = "run_pipe",
        pipe = %args.pipe_name,
        client = %config.client.safe_description()
    );
    let client = PipeClient::from_config(&config.client, &config.logging)?;

    if !args.stream {
        let run = client.generate_text(args.options()).await?;
        return super::print_json(&run);
    }

    let mut response = client.stream_text(args.options()).await?;
    let mut completion = String::new();
    while let Some(chunk) = response.stream.next().await {
        let delta = get_text_delta(&chunk?).to_string();
        // stdout carries only the final JSON document
        eprint!("{delta}");
        completion.push_str(&delta);
    }
    eprintln!();

    super::print_json(&json!({"completion": completion, "thread_id": response.thread_id}))
}
